//! Skills sub-grammar: `"Category: a, b; Uncategorized; Other: c"`.

/// Placeholder key whose string value is expanded into skills markup.
pub const SKILLS_KEY: &str = "skills";

/// One `;`-separated segment of a skills string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillSegment<'a> {
    /// `Label: item, item`
    Category { label: &'a str, items: &'a str },
    /// A segment without a usable label.
    Item(&'a str),
}

/// Splits a skills string into segments. Blank segments are dropped.
///
/// A segment is split on its first `:`. When the label before it is blank
/// (`": Rust"`, `"::Foo"`) the whole trimmed segment becomes an unlabeled item.
pub fn parse_skills(skills: &str) -> Vec<SkillSegment<'_>> {
    skills
        .split(';')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.split_once(':') {
            Some((label, items)) if !label.trim().is_empty() => SkillSegment::Category {
                label: label.trim(),
                items: items.trim(),
            },
            _ => SkillSegment::Item(segment),
        })
        .collect()
}

/// Renders a skills string as the HTML fragment substituted for `{{{skills}}}`.
pub fn expand_skills(skills: &str) -> String {
    parse_skills(skills)
        .into_iter()
        .map(|segment| match segment {
            SkillSegment::Category { label, items } => format!(
                "<div class=\"skills-category\"><h4 class=\"skills-title\">{label}</h4><p class=\"skills-list\">{items}</p></div>"
            ),
            SkillSegment::Item(item) => format!("<p class=\"skills-item\">{item}</p>"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorized_and_plain_segments() {
        let segments = parse_skills("Languages: TypeScript, Python; Leadership");
        assert_eq!(
            segments,
            vec![
                SkillSegment::Category {
                    label: "Languages",
                    items: "TypeScript, Python"
                },
                SkillSegment::Item("Leadership"),
            ]
        );
    }

    #[test]
    fn test_expand_renders_both_fragment_shapes() {
        let html = expand_skills("Languages: TypeScript, Python; Leadership");
        assert_eq!(
            html,
            "<div class=\"skills-category\"><h4 class=\"skills-title\">Languages</h4>\
             <p class=\"skills-list\">TypeScript, Python</p></div>\
             <p class=\"skills-item\">Leadership</p>"
        );
    }

    #[test]
    fn test_splits_on_first_colon_only() {
        let segments = parse_skills("Tools: vim: neovim");
        assert_eq!(
            segments,
            vec![SkillSegment::Category {
                label: "Tools",
                items: "vim: neovim"
            }]
        );
    }

    #[test]
    fn test_empty_label_falls_back_to_item() {
        assert_eq!(parse_skills("::Foo"), vec![SkillSegment::Item("::Foo")]);
        assert_eq!(parse_skills("  : Rust "), vec![SkillSegment::Item(": Rust")]);
        assert_eq!(expand_skills("::Foo"), "<p class=\"skills-item\">::Foo</p>");
    }

    #[test]
    fn test_blank_segments_dropped() {
        assert!(parse_skills(" ; ;; ").is_empty());
        assert_eq!(expand_skills(""), "");
        assert_eq!(parse_skills("Rust;").len(), 1);
    }

    #[test]
    fn test_label_without_items() {
        assert_eq!(
            parse_skills("Cloud:"),
            vec![SkillSegment::Category {
                label: "Cloud",
                items: ""
            }]
        );
    }
}
