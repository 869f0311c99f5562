//! Span aggregation: layout lines → logical [`TextLine`]s.

use crate::model::{PageLayout, TextLine};

/// Round to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Hashable key for a line size, in hundredths of a point.
pub fn size_key(size: f32) -> i64 {
    (size as f64 * 100.0).round() as i64
}

/// Reconstruct the logical lines of one page.
///
/// Fragment texts are concatenated without a separator and trimmed; lines
/// that end up empty are dropped. The line size is the mean fragment size
/// rounded to 2 decimals and the flags are those of the first fragment.
pub fn aggregate_lines(page: &PageLayout) -> Vec<TextLine> {
    let mut lines = Vec::new();

    for block in &page.blocks {
        for line in &block.lines {
            let Some(first) = line.spans.first() else {
                continue;
            };

            let text = line.joined_text("");
            let text = text.trim();
            if text.is_empty() {
                continue;
            }

            let total: f64 = line.spans.iter().map(|s| s.font_size as f64).sum();
            let avg = total / line.spans.len() as f64;

            lines.push(TextLine {
                text: text.to_string(),
                font_size: round2(avg) as f32,
                flags: first.flags,
                bbox: line.bbox(),
            });
        }
    }

    lines
}
