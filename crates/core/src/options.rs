//! Tunable heuristics for rationale cleanup

/// Boilerplate headings the model sprinkles into rationale prose
pub const DEFAULT_BOILERPLATE_MARKERS: [&str; 2] = [
    "* **Rationale:**",
    "* **Clinical Relevance and Features:**",
];

/// Rationales are cut to start at the first occurrence of this word
pub const DEFAULT_CONTENT_ANCHOR: &str = "Clinical";

/// Options controlling how rationale spans are normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Literal substrings removed from every rationale
    pub boilerplate_markers: Vec<String>,
    /// When set, text before the first occurrence is dropped, and a rationale
    /// without it becomes empty
    pub content_anchor: Option<String>,
}

impl ParseOptions {
    pub fn with_boilerplate_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.boilerplate_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_content_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.content_anchor = Some(anchor.into());
        self
    }

    /// Keep rationales whole instead of cutting them at the anchor
    pub fn without_content_anchor(mut self) -> Self {
        self.content_anchor = None;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            boilerplate_markers: DEFAULT_BOILERPLATE_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            content_anchor: Some(DEFAULT_CONTENT_ANCHOR.to_string()),
        }
    }
}
