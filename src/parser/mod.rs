//! PDF parsing module.
//!
//! [`backend`] isolates lopdf behind the [`PdfBackend`] trait; [`LayoutAnalyzer`]
//! turns page content streams into a [`crate::model::DocumentLayout`].

pub mod backend;
mod layout;
mod options;

pub use backend::{
    BackendFontInfo, ContentOp, FontMetrics, FormXObject, LopdfBackend, NoEncodings, PageId,
    PdfBackend, PdfValue, TextDecoder,
};
pub use layout::{group_lines_into_blocks, group_spans_into_lines, LayoutAnalyzer};
pub use options::{ErrorMode, ParseOptions};
