//! Document model types.
//!
//! Layout types carry positioned text out of the parser; outline, section
//! and collection types carry results to the JSON renderer.

mod collection;
mod layout;
mod outline;
mod section;

pub use collection::{
    CollectionReport, ExtractedSection, JobToBeDone, Manifest, ManifestDocument, Persona,
    ReportMetadata, SubsectionAnalysis,
};
pub use layout::{
    BoundingBox, DocumentLayout, LayoutBlock, LayoutLine, PageLayout, StyleFlags, TextLine,
    TextSpan,
};
pub use outline::{DocumentOutline, HeadingLevel, OutlineEntry};
pub use section::Section;
