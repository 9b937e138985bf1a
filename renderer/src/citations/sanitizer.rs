// Removes reference sections the model appended on its own; their urls are not trusted

use once_cell::sync::Lazy;
use regex::Regex;

static RULED_REFERENCES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\n+---\s*\n+###?\s*(?:参考来源|参考文献|Sources|References)\s*\n[\s\S]*$").unwrap()
});

static BARE_REFERENCES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\n+###?\s*(?:参考来源|参考文献|Sources|References)\s*\n[\s\S]*$").unwrap()
});

/// Cuts everything from the first reference heading to the end of the text,
/// taking a horizontal rule right before the heading along with it.
pub fn strip_generated_references(body: &str) -> String {
    let without_ruled = RULED_REFERENCES.replace(body, "");
    let stripped = BARE_REFERENCES.replace(&without_ruled, "");
    stripped.trim_end().to_string()
}
