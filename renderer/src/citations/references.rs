use super::DEFAULT_SOURCES_HEADING;
use crate::models::Source;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceStyle {
    pub heading: String,
}

impl Default for ReferenceStyle {
    fn default() -> Self {
        Self {
            heading: DEFAULT_SOURCES_HEADING.to_string(),
        }
    }
}

/// Markdown block listing `sources` in the given order, or an empty string
/// when there is nothing to list.
pub fn reference_block(sources: &[Source], style: &ReferenceStyle) -> String {
    if sources.is_empty() {
        return String::new();
    }

    let mut lines = vec![format!("\n\n---\n\n### {}\n", style.heading)];
    lines.extend(
        sources
            .iter()
            .map(|source| format!("- [{}] [{}]({})", source.index, source.title, source.url)),
    );
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_produces_nothing() {
        assert_eq!(reference_block(&[], &ReferenceStyle::default()), "");
    }

    #[test]
    fn lists_entries_in_order() {
        let sources = vec![
            Source::new(1, "Alpha", "https://a"),
            Source::new(3, "Gamma", "https://c"),
        ];
        assert_eq!(
            reference_block(&sources, &ReferenceStyle::default()),
            "\n\n---\n\n### Sources\n\n- [1] [Alpha](https://a)\n- [3] [Gamma](https://c)"
        );
    }

    #[test]
    fn heading_is_configurable() {
        let style = ReferenceStyle {
            heading: "参考来源".to_string(),
        };
        let block = reference_block(&[Source::new(2, "B", "https://b")], &style);
        assert!(block.starts_with("\n\n---\n\n### 参考来源\n"));
    }
}
