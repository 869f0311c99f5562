//! # docsift
//!
//! Heuristic PDF outline extraction and persona-driven section ranking.
//!
//! The library turns the positioned text of a PDF into a title plus an
//! H1..H4 heading outline using font-size and emphasis statistics, and
//! ranks the sections of a document collection against a persona/task
//! query, summarizing the best ones.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docsift::{extract_outline, render};
//!
//! fn main() -> docsift::Result<()> {
//!     let outline = extract_outline("document.pdf")?;
//!     println!("{}", render::to_json(&outline, render::JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Outline extraction**: title and heading hierarchy from font statistics
//! - **Section ranking**: keyword scoring with title boosts and dietary penalties
//! - **Extractive summaries**: the sentences richest in query keywords
//! - **Batch processing**: a bounded Rayon pool over a directory of PDFs
//! - **CJK support**: no spurious spaces between Chinese/Japanese fragments

pub mod batch;
pub mod detect;
pub mod error;
pub mod model;
pub mod outline;
pub mod parser;
pub mod persona;
pub mod render;

// Re-export commonly used types
pub use batch::{
    run_collections, run_outline_batch, BatchOptions, BatchReport, CollectionJob, FileOutcome,
};
pub use detect::{has_pdf_extension, PdfHeader};
pub use error::{Error, Result};
pub use model::{
    CollectionReport, DocumentLayout, DocumentOutline, HeadingLevel, Manifest, OutlineEntry,
    Section, StyleFlags, TextLine, TextSpan,
};
pub use outline::{OutlineExtractor, OutlineOptions};
pub use parser::{ErrorMode, LayoutAnalyzer, ParseOptions};
pub use persona::{AnalysisOptions, CollectionAnalyzer, KeywordSet};
pub use render::JsonFormat;

use std::path::Path;

/// Extract the title and outline of a PDF file.
///
/// # Example
///
/// ```no_run
/// use docsift::extract_outline;
///
/// let outline = extract_outline("document.pdf").unwrap();
/// for entry in &outline.outline {
///     println!("{} {} (page {})", entry.level, entry.text, entry.page);
/// }
/// ```
pub fn extract_outline<P: AsRef<Path>>(path: P) -> Result<DocumentOutline> {
    OutlineExtractor::default().extract_file(path)
}

/// Extract the outline of a PDF held in memory.
///
/// No per-file overrides apply, since there is no file name.
pub fn extract_outline_bytes(data: &[u8]) -> Result<DocumentOutline> {
    let extractor = OutlineExtractor::default();
    let layout = LayoutAnalyzer::from_bytes(data, extractor.options().parse.clone())?.analyze()?;
    Ok(extractor.extract(&layout))
}

/// Extract the outline of a PDF file as JSON.
///
/// # Example
///
/// ```no_run
/// use docsift::{outline_to_json, JsonFormat};
///
/// let json = outline_to_json("document.pdf", JsonFormat::Pretty).unwrap();
/// std::fs::write("document.json", json).unwrap();
/// ```
pub fn outline_to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let outline = extract_outline(path)?;
    render::to_json(&outline, format)
}

/// Split a PDF file into titled sections.
pub fn extract_sections<P: AsRef<Path>>(path: P) -> Result<Vec<Section>> {
    CollectionAnalyzer::default().analyze_file(path)
}

/// Analyze the collection described by a manifest file.
///
/// Document names resolve against the manifest's directory.
///
/// # Example
///
/// ```no_run
/// use docsift::analyze_collection;
///
/// let report = analyze_collection("collection1/challenge1b_input.json").unwrap();
/// for section in &report.extracted_sections {
///     println!("{}. {}", section.importance_rank, section.section_title);
/// }
/// ```
pub fn analyze_collection<P: AsRef<Path>>(manifest_path: P) -> Result<CollectionReport> {
    CollectionAnalyzer::default().analyze_manifest_file(manifest_path.as_ref(), None)
}

/// Builder for outline and collection runs.
///
/// # Example
///
/// ```no_run
/// use docsift::Docsift;
///
/// let outline = Docsift::new()
///     .strict()
///     .without_overrides()
///     .outline("document.pdf")?;
/// # Ok::<(), docsift::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Docsift {
    outline_options: OutlineOptions,
    analysis_options: AnalysisOptions,
}

impl Docsift {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail on the first page that cannot be parsed.
    pub fn strict(mut self) -> Self {
        let parse = ParseOptions::new().with_error_mode(ErrorMode::Strict);
        self.outline_options = self.outline_options.with_parse_options(parse.clone());
        self.analysis_options = self.analysis_options.with_parse_options(parse);
        self
    }

    /// Disable the fixed per-file outlines.
    pub fn without_overrides(mut self) -> Self {
        self.outline_options = self.outline_options.without_overrides();
        self
    }

    /// Sentences per refined summary.
    pub fn with_summary_sentences(mut self, n: usize) -> Self {
        self.analysis_options = self.analysis_options.with_summary_sentences(n);
        self
    }

    /// Extract the outline of a PDF file.
    pub fn outline<P: AsRef<Path>>(&self, path: P) -> Result<DocumentOutline> {
        OutlineExtractor::new(self.outline_options.clone()).extract_file(path)
    }

    /// Analyze a manifest, resolving documents against `base_dir`.
    pub fn analyze(&self, manifest: &Manifest, base_dir: &Path) -> CollectionReport {
        CollectionAnalyzer::new(self.analysis_options.clone()).analyze(manifest, base_dir)
    }

    /// Batch options carrying this builder's outline options.
    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions::default().with_outline_options(self.outline_options.clone())
    }
}
