//! Locating and cleaning each diagnosis' rationale span

use crate::options::ParseOptions;

/// Slice the rationale that follows `heading` out of `rationale_text`.
///
/// The span ends where `next_heading` starts, or at the end of the text for
/// the last item. Returns `None` when a bounding heading does not occur.
///
/// Both headings are found with first-match search from the start of the text,
/// so a name that repeats, or that is a prefix of a later name, can bind to
/// the wrong occurrence and yield a truncated or empty span.
pub fn locate<'a>(
    rationale_text: &'a str,
    heading: &str,
    next_heading: Option<&str>,
) -> Option<&'a str> {
    let start = rationale_text.find(heading)? + heading.len();
    let end = match next_heading {
        Some(next) => rationale_text.find(next)?,
        None => rationale_text.len(),
    };

    // Next heading found before this one ends
    Some(rationale_text.get(start..end).unwrap_or(""))
}

/// Turn a raw rationale span into single-spaced prose.
pub fn normalize(span: &str, options: &ParseOptions) -> String {
    let mut text = span.to_string();
    for marker in options.boilerplate_markers.iter().filter(|m| !m.is_empty()) {
        text = text.replace(marker.as_str(), "");
    }

    let without_emphasis: String = collapse_whitespace(&text)
        .chars()
        .filter(|c| *c != '*')
        .collect();
    // Dropping a lone `*` can leave a double space behind
    let cleaned = collapse_whitespace(&without_emphasis);

    match options.content_anchor.as_deref() {
        Some(anchor) => cleaned
            .find(anchor)
            .map(|start| cleaned[start..].to_string())
            .unwrap_or_default(),
        None => cleaned,
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
