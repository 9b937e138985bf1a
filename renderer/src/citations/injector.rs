use super::markers::citation_markers;
use crate::models::Source;

/// Rewrites each resolvable `[n]` into a citation anchor.
///
/// Markers without a matching source (or whose source has no url) stay as
/// literal text. Everything outside the rewritten markers is copied as is.
pub fn inject_citation_links(body: &str, sources: &[Source]) -> String {
    if sources.is_empty() {
        return body.to_string();
    }

    let mut out = String::with_capacity(body.len());
    let mut copied_to = 0;

    for marker in citation_markers(body) {
        let Some(source) = marker
            .index
            .and_then(|index| sources.iter().find(|s| s.index == index))
        else {
            continue;
        };
        if source.url.is_empty() {
            continue;
        }

        out.push_str(&body[copied_to..marker.range.start]);
        out.push_str(&citation_anchor(source));
        copied_to = marker.range.end;
    }

    out.push_str(&body[copied_to..]);
    out
}

pub fn citation_anchor(source: &Source) -> String {
    format!(
        r#"<a href="{}" target="_blank" rel="noopener noreferrer" class="citation" title="{}">{}</a>"#,
        escape_attribute(&source.url),
        escape_attribute(&source.title),
        source.index
    )
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
