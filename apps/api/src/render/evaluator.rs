//! Evaluates a parsed template tree against a scope chain.

use serde_json::Value;

use super::parser::{Node, Template};
use super::scope::{is_truthy, scalar_text, Scope};
use super::skills::{expand_skills, SKILLS_KEY};

const LIST_SEPARATOR: &str = ", ";

impl Template {
    /// Renders against `data`. Never fails: unknown keys render as nothing.
    pub fn render(&self, data: &Value) -> String {
        let mut out = String::new();
        render_nodes(self.nodes(), &Scope::root(data), &mut out);
        out
    }
}

fn render_nodes(nodes: &[Node], scope: &Scope<'_>, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Placeholder(key) => render_placeholder(key, scope, out),
            Node::Conditional { key, body } => {
                if is_truthy(scope.lookup(key)) {
                    render_nodes(body, scope, out);
                }
            }
            Node::Iteration {
                key,
                body,
                bare_item,
            } => render_iteration(key, body, *bare_item, scope, out),
        }
    }
}

fn render_placeholder(key: &str, scope: &Scope<'_>, out: &mut String) {
    match scope.lookup(key) {
        Some(Value::String(skills)) if key == SKILLS_KEY => out.push_str(&expand_skills(skills)),
        Some(value) => {
            if let Some(text) = scalar_text(value) {
                out.push_str(&text);
            }
        }
        None => {}
    }
}

fn render_iteration(
    key: &str,
    body: &[Node],
    bare_item: bool,
    scope: &Scope<'_>,
    out: &mut String,
) {
    // Absent or non-array values iterate zero times.
    let Some(Value::Array(items)) = scope.lookup(key) else {
        return;
    };

    let last = items.len().saturating_sub(1);
    for (index, item) in items.iter().enumerate() {
        match item {
            Value::Object(fields) => render_nodes(body, &scope.with_fields(fields), out),
            Value::String(_) | Value::Number(_) | Value::Bool(_) => {
                render_nodes(body, &scope.with_item(current_item(item)), out);
                if bare_item && index < last {
                    out.push_str(LIST_SEPARATOR);
                }
            }
            Value::Null | Value::Array(_) => render_nodes(body, scope, out),
        }
    }
}

/// The value bound to `{{{this}}}`: strings lose a leading `-` list marker.
fn current_item(item: &Value) -> Value {
    match item {
        Value::String(s) => Value::String(strip_list_marker(s).to_string()),
        other => other.clone(),
    }
}

pub(crate) fn strip_list_marker(s: &str) -> &str {
    s.strip_prefix('-').map(str::trim_start).unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_list_marker() {
        assert_eq!(strip_list_marker("- Led team"), "Led team");
        assert_eq!(strip_list_marker("-   Led"), "Led");
        assert_eq!(strip_list_marker("Led - team"), "Led - team");
        assert_eq!(strip_list_marker(" - Led"), " - Led");
    }

    #[test]
    fn test_number_elements_bind_to_this() {
        let template = Template::parse("{{#each years}}[{{{this}}}]{{/each}}");
        assert_eq!(template.render(&json!({"years": [2020, 2021]})), "[2020][2021]");
    }

    #[test]
    fn test_null_elements_render_in_outer_scope() {
        let template = Template::parse("{{#each xs}}<{{{name}}}>{{/each}}");
        assert_eq!(template.render(&json!({"xs": [null], "name": "n"})), "<n>");
    }

    #[test]
    fn test_non_array_iterates_zero_times() {
        let template = Template::parse("a{{#each summary}}x{{/each}}b");
        assert_eq!(template.render(&json!({"summary": "text"})), "ab");
    }

    #[test]
    fn test_skills_expands_only_string_values() {
        let template = Template::parse("{{{skills}}}");
        assert_eq!(template.render(&json!({"skills": 5})), "5");
        assert_eq!(
            template.render(&json!({"skills": "Rust"})),
            "<p class=\"skills-item\">Rust</p>"
        );
    }
}
