//! Title extraction from the first page.

use crate::model::TextLine;

/// Lines within this many points of the largest size belong to the title.
pub const TITLE_SIZE_TOLERANCE: f32 = 0.1;

/// Join the leading run of largest-size lines of the first page.
///
/// Collection starts at the first line of maximum size and stops at the
/// first line after it that is not of that size.
pub fn extract_title(first_page: &[TextLine]) -> String {
    let Some(max_size) = first_page
        .iter()
        .map(|l| l.font_size)
        .reduce(f32::max)
    else {
        return String::new();
    };

    let mut parts: Vec<&str> = Vec::new();
    for line in first_page {
        if (line.font_size - max_size).abs() < TITLE_SIZE_TOLERANCE {
            parts.push(&line.text);
        } else if !parts.is_empty() {
            break;
        }
    }

    parts.join(" ").trim().to_string()
}
