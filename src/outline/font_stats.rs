//! Font size statistics used to infer the body-text baseline.

use indexmap::IndexMap;

use super::aggregate::size_key;
use crate::model::{DocumentLayout, TextLine};

/// Sizes outside this open range are never considered body text.
pub const BODY_SIZE_MIN: f32 = 7.0;
pub const BODY_SIZE_MAX: f32 = 18.0;

/// Frequency of each distinct font size, in first-seen order.
///
/// Sizes are keyed in hundredths of a point so that line sizes rounded to
/// two decimals and integer span sizes share one representation.
#[derive(Debug, Clone, Default)]
pub struct FontProfile {
    counts: IndexMap<i64, usize>,
}

impl FontProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a font size observation.
    pub fn add_size(&mut self, size: f32) {
        *self.counts.entry(size_key(size)).or_insert(0) += 1;
    }

    /// Profile of aggregated line sizes.
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a TextLine>) -> Self {
        let mut profile = Self::new();
        for line in lines {
            profile.add_size(line.font_size);
        }
        profile
    }

    /// Profile of every fragment's size, rounded half-to-even to a whole point.
    pub fn from_span_sizes(layout: &DocumentLayout) -> Self {
        let mut profile = Self::new();
        for page in &layout.pages {
            for span in page.spans() {
                profile.add_size(round_point(span.font_size));
            }
        }
        profile
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of distinct sizes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Occurrences of `size`.
    pub fn count(&self, size: f32) -> usize {
        self.counts.get(&size_key(size)).copied().unwrap_or(0)
    }

    /// Most frequent size strictly between 7 and 18 points.
    ///
    /// Ties go to the size seen first; `0.0` when no size qualifies.
    pub fn body_size(&self) -> f32 {
        self.mode(|size| size > BODY_SIZE_MIN && size < BODY_SIZE_MAX)
            .unwrap_or(0.0)
    }

    /// Most frequent size overall, ties to the size seen first.
    pub fn dominant_size(&self) -> Option<f32> {
        self.mode(|_| true)
    }

    /// Sizes at or above this are title-sized for section building.
    pub fn title_threshold(&self) -> Option<f32> {
        self.dominant_size().map(|size| size + 1.0)
    }

    fn mode(&self, accept: impl Fn(f32) -> bool) -> Option<f32> {
        let mut best: Option<(f32, usize)> = None;
        for (key, count) in &self.counts {
            let size = *key as f32 / 100.0;
            if !accept(size) {
                continue;
            }
            // strict comparison keeps the earliest size on ties
            if best.map_or(true, |(_, c)| *count > c) {
                best = Some((size, *count));
            }
        }
        best.map(|(size, _)| size)
    }
}

/// Round a size to a whole point, halves to even.
pub fn round_point(size: f32) -> f32 {
    (size as f64).round_ties_even() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LayoutBlock, LayoutLine, PageLayout, StyleFlags, TextSpan};

    fn profile(sizes: &[f32]) -> FontProfile {
        let mut p = FontProfile::new();
        for s in sizes {
            p.add_size(*s);
        }
        p
    }

    #[test]
    fn test_body_size_is_restricted_mode() {
        let p = profile(&[24.0, 24.0, 24.0, 11.0, 11.0, 9.5]);
        assert_eq!(p.body_size(), 11.0);
        assert_eq!(p.dominant_size(), Some(24.0));
        assert_eq!(p.count(24.0), 3);
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn test_body_size_bounds_are_exclusive() {
        let p = profile(&[7.0, 7.0, 18.0, 18.0, 12.0]);
        assert_eq!(p.body_size(), 12.0);
        assert_eq!(profile(&[7.0, 18.0, 30.0]).body_size(), 0.0);
        assert_eq!(FontProfile::new().body_size(), 0.0);
    }

    #[test]
    fn test_ties_resolved_by_first_occurrence() {
        let p = profile(&[10.5, 12.0, 12.0, 10.5]);
        assert_eq!(p.body_size(), 10.5);
        let p = profile(&[12.0, 10.5, 10.5, 12.0]);
        assert_eq!(p.body_size(), 12.0);
    }

    #[test]
    fn test_title_threshold() {
        let p = profile(&[10.0, 10.0, 14.0]);
        assert_eq!(p.title_threshold(), Some(11.0));
        assert_eq!(FontProfile::new().title_threshold(), None);
    }

    #[test]
    fn test_round_point_halves_to_even() {
        assert_eq!(round_point(10.5), 10.0);
        assert_eq!(round_point(11.5), 12.0);
        assert_eq!(round_point(11.49), 11.0);
    }

    #[test]
    fn test_from_span_sizes() {
        let span = |size: f32| TextSpan::new("x", 0.0, 0.0, size, "F", StyleFlags::empty());
        let mut page = PageLayout::new(1);
        page.blocks = vec![LayoutBlock::new(vec![
            LayoutLine::new(vec![span(9.8), span(10.2)]),
            LayoutLine::new(vec![span(16.0)]),
        ])];
        let layout = DocumentLayout::new(vec![page]);

        let p = FontProfile::from_span_sizes(&layout);
        assert_eq!(p.count(10.0), 2);
        assert_eq!(p.title_threshold(), Some(11.0));
    }
}
