//! Pulls the JSON object out of a free-form model reply.

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Returns the JSON text embedded in `reply`.
///
/// Tried in order: a ```` ```json ```` fenced block, any fenced block, then the
/// span from the first `{` to the last `}`.
pub fn extract_json_block(reply: &str) -> Option<&str> {
    fenced_block(reply, JSON_FENCE)
        .or_else(|| fenced_block(reply, FENCE))
        .or_else(|| brace_span(reply))
}

fn fenced_block<'a>(text: &'a str, opening: &str) -> Option<&'a str> {
    let start = text.find(opening)? + opening.len();
    let after = &text[start..];
    // Skip the rest of the fence line (e.g. a language tag).
    let body_start = after.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after[body_start..];
    let end = body.find(FENCE)?;
    let block = body[..end].trim();
    (!block.is_empty()).then_some(block)
}

fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_fence() {
        let input = "Here you go:\n```json\n{\"key\": \"value\"}\n```\nThanks";
        assert_eq!(extract_json_block(input), Some("{\"key\": \"value\"}"));
    }

    #[test]
    fn test_bare_fence() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(extract_json_block(input), Some("{\"key\": \"value\"}"));
    }

    #[test]
    fn test_json_fence_preferred_over_earlier_plain_fence() {
        let input = "```\nnot it\n```\n```json\n{\"a\": 1}\n```";
        assert_eq!(extract_json_block(input), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_no_fences_uses_outer_braces() {
        let input = "Sure! {\"a\": {\"b\": 2}} hope that helps";
        assert_eq!(extract_json_block(input), Some("{\"a\": {\"b\": 2}}"));
    }

    #[test]
    fn test_unterminated_fence_falls_back_to_braces() {
        let input = "```json\n{\"a\": 1}";
        assert_eq!(extract_json_block(input), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_nothing_to_extract() {
        assert_eq!(extract_json_block("no json here"), None);
        assert_eq!(extract_json_block("} backwards {"), None);
    }
}
