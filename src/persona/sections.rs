//! Section building: split a document into titled runs of body text.

use std::path::Path;

use crate::model::{DocumentLayout, LayoutBlock, LayoutLine, Section, StyleFlags};
use crate::outline::{round_point, FontProfile};

/// Lines of this many characters or fewer are never titles.
pub const MIN_TITLE_CHARS: usize = 4;
/// A lone upper-case line must be shorter than this to be a title.
pub const MAX_CAPS_TITLE_CHARS: usize = 80;
/// Style bit that marks a line as a title on its own.
pub const TITLE_EMPHASIS: StyleFlags = StyleFlags::BOLD;

/// Title given to text before the first detected title: the file stem with
/// `-` and `_` read as spaces.
pub fn initial_title(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().replace(['-', '_'], " "))
        .unwrap_or_default()
}

/// Python-style `isupper`: at least one cased character and no lower-case one.
fn is_all_caps(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

/// Accumulates sections while walking a document.
struct SectionBuilder<'a> {
    document: &'a str,
    title: String,
    content: String,
    page: u32,
    sections: Vec<Section>,
}

impl<'a> SectionBuilder<'a> {
    fn new(document: &'a str, title: String) -> Self {
        Self {
            document,
            title,
            content: String::new(),
            page: 1,
            sections: Vec::new(),
        }
    }

    fn flush(&mut self) {
        let content = self.content.trim();
        if !content.is_empty() {
            self.sections.push(Section::new(
                self.title.clone(),
                content,
                self.page,
                self.document,
            ));
        }
    }

    fn start_section(&mut self, title: String, page: u32) {
        self.flush();
        self.title = title;
        self.content.clear();
        self.page = page;
    }

    fn push_line(&mut self, text: &str) {
        self.content.push_str(text);
        self.content.push('\n');
    }

    fn finish(mut self) -> Vec<Section> {
        self.flush();
        self.sections
    }
}

fn is_title_line(line: &LayoutLine, text: &str, block: &LayoutBlock, threshold: f32) -> bool {
    let Some(first) = line.spans.first() else {
        return false;
    };
    if text.chars().count() <= MIN_TITLE_CHARS {
        return false;
    }

    round_point(first.font_size) >= threshold
        || first.flags.contains(TITLE_EMPHASIS)
        || (block.lines.len() == 1
            && text.chars().count() < MAX_CAPS_TITLE_CHARS
            && is_all_caps(text))
}

/// Partition a document into sections.
///
/// `path` supplies the initial title and the document name carried by every
/// section. A document without any text yields no sections.
pub fn build_sections(layout: &DocumentLayout, path: &Path) -> Vec<Section> {
    let profile = FontProfile::from_span_sizes(layout);
    let Some(threshold) = profile.title_threshold() else {
        return Vec::new();
    };

    let document = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let mut builder = SectionBuilder::new(&document, initial_title(path));

    for (index, page) in layout.pages.iter().enumerate() {
        let page_number = index as u32 + 1;
        for block in &page.blocks {
            for line in &block.lines {
                if line.spans.is_empty() {
                    continue;
                }
                let text = line.joined_text(" ");
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }

                if is_title_line(line, text, block, threshold) {
                    builder.start_section(text.to_string(), page_number);
                } else {
                    builder.push_line(text);
                }
            }
        }
    }

    let sections = builder.finish();
    log::debug!(
        "{}: normal size {:?}, {} section(s)",
        document,
        profile.dominant_size(),
        sections.len()
    );
    sections
}
