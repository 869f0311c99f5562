//! Titled document sections used for relevance ranking.

/// A run of body text under the most recent title-like line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    /// Accumulated body text, trimmed
    pub content: String,
    /// 1-based page where the section title appeared
    pub page_number: u32,
    /// File name of the source document
    pub document: String,
    /// Relevance score; zero until ranked
    pub score: i64,
}

impl Section {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        page_number: u32,
        document: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            page_number,
            document: document.into(),
            score: 0,
        }
    }
}
