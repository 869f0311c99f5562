//! Positioned text layout: the blocks → lines → styled fragments tree that
//! the outline and section heuristics consume.

use bitflags::bitflags;

bitflags! {
    /// Style bits attached to a text fragment.
    ///
    /// Bit assignment follows the common text-layout convention:
    /// 1 superscript, 2 italic, 4 serifed, 8 monospaced, 16 bold.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u32 {
        const SUPERSCRIPT = 1 << 0;
        const ITALIC = 1 << 1;
        const SERIFED = 1 << 2;
        const MONOSPACED = 1 << 3;
        const BOLD = 1 << 4;
    }
}

/// Axis-aligned box in PDF user space (y grows upward).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// A text fragment shown with a single font and size.
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Advance width of the text in user space
    pub width: f32,
    /// Font size in points
    pub font_size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Style bits
    pub flags: StyleFlags,
}

impl TextSpan {
    /// Create a new text span.
    pub fn new(
        text: impl Into<String>,
        x: f32,
        y: f32,
        font_size: f32,
        font_name: impl Into<String>,
        flags: StyleFlags,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width: 0.0,
            font_size,
            font_name: font_name.into(),
            flags,
        }
    }

    /// Set the advance width.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Get the bottom Y coordinate (approximate, based on font size).
    pub fn bottom(&self) -> f32 {
        self.y - self.font_size * 0.2 // Approximate descender
    }

    /// Get the top Y coordinate (approximate, based on font size).
    pub fn top(&self) -> f32 {
        self.y + self.font_size * 0.8 // Approximate ascender
    }

    /// Right edge of the fragment.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(self.x, self.bottom(), self.right(), self.top())
    }

    /// Whether two fragments can be merged into one style run.
    pub fn same_style(&self, other: &TextSpan) -> bool {
        self.font_name == other.font_name
            && self.flags == other.flags
            && (self.font_size - other.font_size).abs() < 0.01
    }
}

/// A layout line: fragments sharing a baseline, ordered left to right.
#[derive(Debug, Clone, Default)]
pub struct LayoutLine {
    pub spans: Vec<TextSpan>,
}

impl LayoutLine {
    pub fn new(spans: Vec<TextSpan>) -> Self {
        Self { spans }
    }

    /// Baseline of the first fragment.
    pub fn y(&self) -> f32 {
        self.spans.first().map(|s| s.y).unwrap_or(0.0)
    }

    /// Left edge of the first fragment.
    pub fn x(&self) -> f32 {
        self.spans.first().map(|s| s.x).unwrap_or(0.0)
    }

    /// Largest fragment size on the line.
    pub fn max_font_size(&self) -> f32 {
        self.spans.iter().map(|s| s.font_size).fold(0.0, f32::max)
    }

    pub fn bbox(&self) -> BoundingBox {
        let mut spans = self.spans.iter();
        match spans.next() {
            Some(first) => spans.fold(first.bbox(), |acc, s| acc.union(&s.bbox())),
            None => BoundingBox::default(),
        }
    }

    /// Fragment texts joined with `separator`.
    pub fn joined_text(&self, separator: &str) -> String {
        self.spans
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// A layout block: consecutive lines forming one visual unit.
#[derive(Debug, Clone, Default)]
pub struct LayoutBlock {
    pub lines: Vec<LayoutLine>,
}

impl LayoutBlock {
    pub fn new(lines: Vec<LayoutLine>) -> Self {
        Self { lines }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Layout of one page.
#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    /// Page number as stored in the PDF page tree (1-indexed)
    pub number: u32,
    pub blocks: Vec<LayoutBlock>,
}

impl PageLayout {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            blocks: Vec::new(),
        }
    }

    /// Every fragment on the page, in layout order.
    pub fn spans(&self) -> impl Iterator<Item = &TextSpan> {
        self.blocks
            .iter()
            .flat_map(|b| b.lines.iter())
            .flat_map(|l| l.spans.iter())
    }
}

/// Layout of a whole document, pages in order.
#[derive(Debug, Clone, Default)]
pub struct DocumentLayout {
    pub pages: Vec<PageLayout>,
}

impl DocumentLayout {
    pub fn new(pages: Vec<PageLayout>) -> Self {
        Self { pages }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// A logical line produced by the span aggregator.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Concatenated, trimmed fragment text
    pub text: String,
    /// Average fragment size, rounded to 2 decimals
    pub font_size: f32,
    /// Flags of the first fragment
    pub flags: StyleFlags,
    pub bbox: BoundingBox,
}

impl TextLine {
    pub fn new(text: impl Into<String>, font_size: f32, flags: StyleFlags) -> Self {
        Self {
            text: text.into(),
            font_size,
            flags,
            bbox: BoundingBox::default(),
        }
    }
}
