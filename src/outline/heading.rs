//! Heading classification by (size, emphasis) style.

use std::cmp::Ordering;

use super::aggregate::size_key;
use crate::model::{HeadingLevel, StyleFlags, TextLine};

/// Style bit treated as heading emphasis when ranking heading styles.
pub const HEADING_EMPHASIS: StyleFlags = StyleFlags::ITALIC;

/// Lines must exceed the body size by more than this to be headings.
pub const HEADING_SIZE_MARGIN: f32 = 1.0;

/// A distinct heading style: line size (hundredths of a point) and emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct HeadingStyle {
    size: i64,
    emphasized: bool,
}

impl HeadingStyle {
    fn of(line: &TextLine) -> Self {
        Self {
            size: size_key(line.font_size),
            emphasized: line.flags.intersects(HEADING_EMPHASIS),
        }
    }
}

/// Mapping from heading style to H1..H4, built once per document.
#[derive(Debug, Clone, Default)]
pub struct HeadingStyleMap {
    levels: Vec<(HeadingStyle, HeadingLevel)>,
    body_size: f32,
}

impl HeadingStyleMap {
    /// Rank the distinct styles of lines larger than `body_size + 1`.
    ///
    /// Larger sizes rank first; at equal size the emphasized style wins.
    /// Only the top four styles receive a level.
    pub fn build<'a>(lines: impl IntoIterator<Item = &'a TextLine>, body_size: f32) -> Self {
        let mut styles: Vec<HeadingStyle> = Vec::new();
        for line in lines {
            if line.font_size > body_size + HEADING_SIZE_MARGIN {
                let style = HeadingStyle::of(line);
                if !styles.contains(&style) {
                    styles.push(style);
                }
            }
        }

        styles.sort_by(|a, b| match b.size.cmp(&a.size) {
            Ordering::Equal => b.emphasized.cmp(&a.emphasized),
            other => other,
        });

        let levels = styles
            .into_iter()
            .zip(HeadingLevel::ALL)
            .collect::<Vec<_>>();

        log::debug!(
            "Body size {:.2}, {} heading style(s)",
            body_size,
            levels.len()
        );

        Self { levels, body_size }
    }

    /// Heading level of a line, or `None` for body text.
    pub fn level_for(&self, line: &TextLine) -> Option<HeadingLevel> {
        let style = HeadingStyle::of(line);
        self.levels
            .iter()
            .find(|(s, _)| *s == style)
            .map(|(_, level)| *level)
    }

    pub fn body_size(&self) -> f32 {
        self.body_size
    }

    /// Number of styles that received a level (at most 4).
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
