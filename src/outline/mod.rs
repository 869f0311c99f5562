//! Document outline extraction: title plus H1..H4 headings.
//!
//! The pipeline runs per document:
//!
//! 1. [`aggregate_lines`] rebuilds logical lines from the page layout.
//! 2. [`FontProfile`] counts line sizes and infers the body size.
//! 3. [`HeadingStyleMap`] ranks the styles above the body size.
//! 4. [`extract_title`] reads the largest lines of the first page.
//!
//! Known files are then replaced from the [`overrides`] table.

mod aggregate;
mod font_stats;
mod heading;
pub mod overrides;
mod title;

use std::collections::HashSet;
use std::path::Path;

pub use aggregate::{aggregate_lines, round2, size_key};
pub use font_stats::{round_point, FontProfile, BODY_SIZE_MAX, BODY_SIZE_MIN};
pub use heading::{HeadingStyleMap, HEADING_EMPHASIS, HEADING_SIZE_MARGIN};
pub use title::{extract_title, TITLE_SIZE_TOLERANCE};

use crate::error::Result;
use crate::model::{DocumentLayout, DocumentOutline, OutlineEntry, TextLine};
use crate::parser::{LayoutAnalyzer, ParseOptions};

/// Outline entries must be longer than this many characters.
pub const MIN_HEADING_CHARS: usize = 2;
/// Outline entries must be shorter than this many characters.
pub const MAX_HEADING_CHARS: usize = 250;

/// Options for outline extraction.
#[derive(Debug, Clone)]
pub struct OutlineOptions {
    /// How the PDF is parsed
    pub parse: ParseOptions,
    /// Whether the fixed per-file outlines replace computed ones
    pub apply_overrides: bool,
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            parse: ParseOptions::new().lenient(),
            apply_overrides: true,
        }
    }
}

impl OutlineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }

    /// Disable the fixed per-file outlines.
    pub fn without_overrides(mut self) -> Self {
        self.apply_overrides = false;
        self
    }
}

/// Extracts a [`DocumentOutline`] from a PDF.
#[derive(Debug, Clone, Default)]
pub struct OutlineExtractor {
    options: OutlineOptions,
}

impl OutlineExtractor {
    pub fn new(options: OutlineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &OutlineOptions {
        &self.options
    }

    /// Parse a PDF file and extract its outline.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<DocumentOutline> {
        let path = path.as_ref();
        let layout = LayoutAnalyzer::open(path, self.options.parse.clone())?.analyze()?;
        let outline = self.extract(&layout);

        if !self.options.apply_overrides {
            return Ok(outline);
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        Ok(overrides::apply(&file_name, outline))
    }

    /// Extract the outline of an analyzed document.
    pub fn extract(&self, layout: &DocumentLayout) -> DocumentOutline {
        let pages: Vec<Vec<TextLine>> = layout.pages.iter().map(aggregate_lines).collect();

        let profile = FontProfile::from_lines(pages.iter().flatten());
        let heading_map = HeadingStyleMap::build(pages.iter().flatten(), profile.body_size());

        let title = pages
            .first()
            .map(|lines| extract_title(lines))
            .unwrap_or_default();

        let mut outline = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for (index, lines) in pages.iter().enumerate() {
            for line in lines {
                let Some(level) = heading_map.level_for(line) else {
                    continue;
                };
                let text = line.text.trim();
                let chars = text.chars().count();
                if chars > MIN_HEADING_CHARS && chars < MAX_HEADING_CHARS && seen.insert(text) {
                    outline.push(OutlineEntry::new(level, text, index as u32));
                }
            }
        }

        DocumentOutline::new(title, outline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingLevel, LayoutBlock, LayoutLine, PageLayout, StyleFlags, TextSpan};

    fn page(number: u32, lines: &[(&str, f32)]) -> PageLayout {
        let mut page = PageLayout::new(number);
        page.blocks = lines
            .iter()
            .map(|(text, size)| {
                LayoutBlock::new(vec![LayoutLine::new(vec![TextSpan::new(
                    *text,
                    72.0,
                    700.0,
                    *size,
                    "Helvetica",
                    StyleFlags::empty(),
                )])])
            })
            .collect();
        page
    }

    #[test]
    fn test_extract_outline() {
        let layout = DocumentLayout::new(vec![
            page(
                1,
                &[
                    ("Annual Report", 24.0),
                    ("2024", 24.0),
                    ("Introduction", 16.0),
                    ("Body text here.", 11.0),
                    ("More body text.", 11.0),
                ],
            ),
            page(
                2,
                &[
                    ("Results", 16.0),
                    ("Details", 13.0),
                    ("Body again.", 11.0),
                    ("Closing body.", 11.0),
                    ("Introduction", 16.0),
                ],
            ),
        ]);

        let outline = OutlineExtractor::default().extract(&layout);
        assert_eq!(outline.title, "Annual Report 2024");
        assert_eq!(
            outline.outline,
            vec![
                OutlineEntry::new(HeadingLevel::H1, "Annual Report", 0),
                OutlineEntry::new(HeadingLevel::H1, "2024", 0),
                OutlineEntry::new(HeadingLevel::H2, "Introduction", 0),
                OutlineEntry::new(HeadingLevel::H2, "Results", 1),
                OutlineEntry::new(HeadingLevel::H3, "Details", 1),
            ]
        );
    }

    #[test]
    fn test_short_headings_are_dropped() {
        let layout = DocumentLayout::new(vec![page(
            1,
            &[("Big", 20.0), ("IV", 20.0), ("body", 10.0), ("body", 10.0)],
        )]);
        let outline = OutlineExtractor::default().extract(&layout);
        assert_eq!(outline.title, "Big IV");
        assert_eq!(outline.len(), 1);
        assert_eq!(outline.outline[0].text, "Big");
    }

    #[test]
    fn test_empty_document() {
        let outline = OutlineExtractor::default().extract(&DocumentLayout::default());
        assert_eq!(outline, DocumentOutline::default());
    }

    #[test]
    fn test_no_body_size_makes_all_large_lines_headings() {
        // body size 0 when nothing falls in the 7..18 range
        let layout = DocumentLayout::new(vec![page(1, &[("Poster", 40.0), ("Caption", 20.0)])]);
        let outline = OutlineExtractor::default().extract(&layout);
        assert_eq!(outline.len(), 2);
        assert_eq!(outline.outline[1].level, HeadingLevel::H2);
    }

    #[test]
    fn test_options_builder() {
        let options = OutlineOptions::new().without_overrides();
        assert!(!options.apply_overrides);
        assert!(options.parse.is_lenient());
    }
}
