//! Layout analysis for PDF documents.
//!
//! Interprets content-stream text operators to recover positioned, styled
//! text fragments, then groups them into lines (by baseline) and blocks (by
//! vertical spacing). The result is the [`DocumentLayout`] tree that the
//! outline and section heuristics consume.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

use unicode_normalization::UnicodeNormalization;

use super::backend::{
    decode_text_simple, derive_style_flags, get_number_from_value, BackendFontInfo, ContentOp,
    FontMetrics, LopdfBackend, PageId, PdfBackend, PdfValue, TextDecoder,
};
use super::options::ParseOptions;
use crate::error::{Error, Result};
use crate::model::{DocumentLayout, LayoutBlock, LayoutLine, PageLayout, StyleFlags, TextSpan};

/// TJ adjustments (1/1000 em) larger than this are treated as word breaks.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Deepest chain of nested form XObjects that is followed.
const MAX_FORM_DEPTH: usize = 8;

/// Layout analyzer for extracting structured text from PDF pages.
pub struct LayoutAnalyzer<B: PdfBackend = LopdfBackend> {
    backend: B,
    options: ParseOptions,
}

impl LayoutAnalyzer<LopdfBackend> {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let backend = LopdfBackend::load_file(path)?;
        Ok(Self::new(backend, options))
    }

    /// Open a PDF held in memory.
    pub fn from_bytes(data: &[u8], options: ParseOptions) -> Result<Self> {
        let backend = LopdfBackend::load_bytes(data)?;
        Ok(Self::new(backend, options))
    }
}

impl<B: PdfBackend> LayoutAnalyzer<B> {
    /// Create a new layout analyzer over any backend.
    pub fn new(backend: B, options: ParseOptions) -> Self {
        Self { backend, options }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.backend.pages().len() as u32
    }

    /// Analyze every page, in page order.
    pub fn analyze(&self) -> Result<DocumentLayout> {
        let mut pages = Vec::new();
        for page_num in self.backend.pages().keys() {
            match self.analyze_page(*page_num) {
                Ok(page) => pages.push(page),
                Err(e) if self.options.is_lenient() => {
                    log::warn!("Skipping text of page {}: {}", page_num, e);
                    pages.push(PageLayout::new(*page_num));
                }
                Err(e) => return Err(e),
            }
        }
        Ok(DocumentLayout::new(pages))
    }

    /// Analyze a single page (1-indexed).
    pub fn analyze_page(&self, page_num: u32) -> Result<PageLayout> {
        let spans = self.extract_page_spans(page_num)?;
        let lines = group_spans_into_lines(spans);
        let mut page = PageLayout::new(page_num);
        page.blocks = group_lines_into_blocks(lines);
        Ok(page)
    }

    /// Extract text spans from a page with position and font information.
    pub fn extract_page_spans(&self, page_num: u32) -> Result<Vec<TextSpan>> {
        let pages = self.backend.pages();
        let page_id = pages
            .get(&page_num)
            .ok_or(Error::PageOutOfRange(page_num, pages.len() as u32))?;

        let fonts: HashMap<Vec<u8>, BackendFontInfo> = self
            .backend
            .page_fonts(*page_id)?
            .into_iter()
            .map(|f| (f.name.clone(), f))
            .collect();

        let content = self.backend.page_content(*page_id)?;
        let ops = self.backend.decode_content(&content)?;
        let decoder = self.backend.text_decoder(*page_id);
        let scope = ResourceScope {
            owners: vec![*page_id],
            fonts,
            decoders: vec![decoder.as_ref()],
        };

        let mut state = TextState::default();
        let mut spans = Vec::new();
        self.interpret(&ops, &scope, &mut state, &mut spans);
        Ok(spans)
    }

    fn interpret(
        &self,
        ops: &[ContentOp],
        scope: &ResourceScope<'_>,
        state: &mut TextState,
        spans: &mut Vec<TextSpan>,
    ) {
        for op in ops {
            match op.operator.as_str() {
                "q" => state.save(),
                "Q" => state.restore(),
                "cm" => {
                    if let Some(m) = matrix_operands(op) {
                        state.gs.ctm = m.multiply(&state.gs.ctm);
                    }
                }
                "Do" => {
                    if let Some(PdfValue::Name(name)) = op.operands.first() {
                        self.draw_form(name, scope, state, spans);
                    }
                }
                "BT" => {
                    state.in_text = true;
                    state.text_matrix = Matrix::IDENTITY;
                    state.line_matrix = Matrix::IDENTITY;
                }
                "ET" => state.in_text = false,
                "Tf" => {
                    if let Some(PdfValue::Name(name)) = op.operands.first() {
                        state.gs.font = Some(
                            scope
                                .fonts
                                .get(name)
                                .cloned()
                                .unwrap_or_else(|| unknown_font(name)),
                        );
                    }
                    if let Some(size) = op.number(1) {
                        state.gs.font_size = size;
                    }
                }
                "Tc" => state.gs.char_spacing = op.number(0).unwrap_or(0.0),
                "Tw" => state.gs.word_spacing = op.number(0).unwrap_or(0.0),
                "Tz" => state.gs.horizontal_scale = op.number(0).unwrap_or(100.0) / 100.0,
                "TL" => state.gs.leading = op.number(0).unwrap_or(0.0),
                "Ts" => state.gs.rise = op.number(0).unwrap_or(0.0),
                "Td" => {
                    if let (Some(tx), Some(ty)) = (op.number(0), op.number(1)) {
                        state.move_line(tx, ty);
                    }
                }
                "TD" => {
                    if let (Some(tx), Some(ty)) = (op.number(0), op.number(1)) {
                        state.gs.leading = -ty;
                        state.move_line(tx, ty);
                    }
                }
                "Tm" => {
                    if let Some(m) = matrix_operands(op) {
                        state.text_matrix = m;
                        state.line_matrix = m;
                    }
                }
                "T*" => state.next_line(),
                "Tj" => {
                    if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                        let parts = [TextPart::Text(bytes)];
                        spans.extend(self.show_text(state, &parts, scope));
                    }
                }
                "TJ" => {
                    if let Some(PdfValue::Array(items)) = op.operands.first() {
                        let parts: Vec<TextPart> = items
                            .iter()
                            .filter_map(|item| match item {
                                PdfValue::Str(bytes) => Some(TextPart::Text(bytes)),
                                other => get_number_from_value(other).map(TextPart::Adjust),
                            })
                            .collect();
                        spans.extend(self.show_text(state, &parts, scope));
                    }
                }
                "'" => {
                    state.next_line();
                    if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                        let parts = [TextPart::Text(bytes)];
                        spans.extend(self.show_text(state, &parts, scope));
                    }
                }
                "\"" => {
                    state.gs.word_spacing = op.number(0).unwrap_or(state.gs.word_spacing);
                    state.gs.char_spacing = op.number(1).unwrap_or(state.gs.char_spacing);
                    state.next_line();
                    if let Some(PdfValue::Str(bytes)) = op.operands.get(2) {
                        let parts = [TextPart::Text(bytes)];
                        spans.extend(self.show_text(state, &parts, scope));
                    }
                }
                _ => {}
            }
        }
    }

    /// Interpret a form XObject's content in place of its `Do`.
    ///
    /// The form runs inside an implicit `q`/`Q` with its matrix prepended to
    /// the CTM. Its own fonts shadow the caller's.
    fn draw_form(
        &self,
        name: &[u8],
        scope: &ResourceScope<'_>,
        state: &mut TextState,
        spans: &mut Vec<TextSpan>,
    ) {
        if scope.owners.len() > MAX_FORM_DEPTH {
            log::debug!("Form XObject nesting too deep at {}", String::from_utf8_lossy(name));
            return;
        }

        let mut found = None;
        for owner in &scope.owners {
            match self.backend.form_xobject(*owner, name) {
                Ok(Some(form)) => {
                    found = Some(form);
                    break;
                }
                Ok(None) => {}
                Err(e) => {
                    log::warn!("Skipping form XObject {}: {}", String::from_utf8_lossy(name), e);
                    return;
                }
            }
        }
        let Some(form) = found else {
            return;
        };
        if scope.owners.contains(&form.id) {
            log::debug!("Form XObject {:?} invokes itself", form.id);
            return;
        }

        let ops = match self.backend.decode_content(&form.content) {
            Ok(ops) => ops,
            Err(e) => {
                log::warn!("Skipping form XObject {}: {}", String::from_utf8_lossy(name), e);
                return;
            }
        };

        let decoder = self.backend.text_decoder(form.id);
        let mut fonts = scope.fonts.clone();
        fonts.extend(form.fonts.into_iter().map(|f| (f.name.clone(), f)));
        let mut owners = vec![form.id];
        owners.extend(scope.owners.iter().copied());
        let mut decoders = vec![decoder.as_ref()];
        decoders.extend(scope.decoders.iter().copied());
        let inner = ResourceScope {
            owners,
            fonts,
            decoders,
        };

        let [a, b, c, d, e, f] = form.matrix;
        state.save();
        state.gs.ctm = Matrix::new(a, b, c, d, e, f).multiply(&state.gs.ctm);
        self.interpret(&ops, &inner, state, spans);
        state.restore();
    }

    /// Show one string (or TJ array), advancing the text matrix.
    ///
    /// Returns a span when the shown text is not blank.
    fn show_text(
        &self,
        state: &mut TextState,
        parts: &[TextPart<'_>],
        scope: &ResourceScope<'_>,
    ) -> Option<TextSpan> {
        if !state.in_text {
            return None;
        }

        let font = state.gs.font.clone();
        let default_metrics = FontMetrics::default();
        let metrics = font.as_ref().map(|f| &f.metrics).unwrap_or(&default_metrics);

        let start = state.rendering_matrix();
        let (x, y) = start.transform_point(0.0, state.gs.rise);
        let size = state.gs.font_size * start.vertical_scale();

        let mut text = String::new();
        for part in parts {
            match part {
                TextPart::Text(bytes) => {
                    let decoded = font
                        .as_ref()
                        .and_then(|f| scope.decode(&f.name, bytes))
                        .unwrap_or_else(|| decode_text_simple(bytes));
                    text.push_str(&decoded);
                    let (glyphs, spaces) = metrics.measure(bytes);
                    let codes = bytes.len() / metrics.bytes_per_code.max(1);
                    state.advance(glyphs, codes, spaces);
                }
                TextPart::Adjust(adjustment) => {
                    if -adjustment > TJ_SPACE_THRESHOLD {
                        push_word_break(&mut text);
                    }
                    state.advance_by_adjustment(*adjustment);
                }
            }
        }

        if text.trim().is_empty() {
            return None;
        }

        let (end_x, _) = state.rendering_matrix().transform_point(0.0, state.gs.rise);
        let mut flags = font.as_ref().map(|f| f.flags).unwrap_or_default();
        if state.gs.rise > 0.0 {
            flags |= StyleFlags::SUPERSCRIPT;
        }
        let font_name = font
            .map(|f| f.base_font)
            .unwrap_or_else(|| "Unknown".to_string());

        let text: String = text.nfc().collect();
        Some(TextSpan::new(text, x, y, size, font_name, flags).with_width((end_x - x).abs()))
    }
}

/// Resources visible to the content stream being interpreted, innermost
/// (form) scope first.
struct ResourceScope<'a> {
    owners: Vec<PageId>,
    fonts: HashMap<Vec<u8>, BackendFontInfo>,
    decoders: Vec<&'a dyn TextDecoder>,
}

impl ResourceScope<'_> {
    fn decode(&self, font_name: &[u8], bytes: &[u8]) -> Option<String> {
        self.decoders
            .iter()
            .find_map(|decoder| decoder.decode(font_name, bytes))
    }
}

/// A piece of a text-showing operation.
enum TextPart<'a> {
    Text(&'a [u8]),
    /// TJ position adjustment in 1/1000 em
    Adjust(f32),
}

/// Font resource referenced by `Tf` but missing from the page resources.
fn unknown_font(name: &[u8]) -> BackendFontInfo {
    let name_str = String::from_utf8_lossy(name).to_string();
    BackendFontInfo {
        name: name.to_vec(),
        flags: derive_style_flags(&name_str, None, None),
        base_font: name_str,
        metrics: FontMetrics::default(),
    }
}

fn push_word_break(text: &mut String) {
    if let Some(last) = text.chars().last() {
        if last != ' ' && last != '\u{00A0}' && !is_spaceless_script_char(last) {
            text.push(' ');
        }
    }
}

/// Read six numeric operands as a matrix.
fn matrix_operands(op: &ContentOp) -> Option<Matrix> {
    Some(Matrix::new(
        op.number(0)?,
        op.number(1)?,
        op.number(2)?,
        op.number(3)?,
        op.number(4)?,
        op.number(5)?,
    ))
}

/// Affine transform `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// `self × other`: apply `self` first, then `other`.
    fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Length of the transformed unit vector along y.
    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// The part of the graphics state that `q`/`Q` save and restore: the CTM
/// and the text state parameters.
#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Matrix,
    font: Option<BackendFontInfo>,
    font_size: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scale: f32,
    leading: f32,
    rise: f32,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            font: None,
            font_size: 12.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scale: 1.0,
            leading: 0.0,
            rise: 0.0,
        }
    }
}

/// Graphics and text state tracked while interpreting a content stream.
///
/// The text and line matrices live only inside a text object and are not
/// part of the saved state.
#[derive(Debug, Clone)]
struct TextState {
    gs: GraphicsState,
    saved: Vec<GraphicsState>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    in_text: bool,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            gs: GraphicsState::default(),
            saved: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            in_text: false,
        }
    }
}

impl TextState {
    fn save(&mut self) {
        self.saved.push(self.gs.clone());
    }

    fn restore(&mut self) {
        if let Some(gs) = self.saved.pop() {
            self.gs = gs;
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translation(tx, ty).multiply(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.gs.leading);
    }

    /// Text space → device space, ignoring font size.
    fn rendering_matrix(&self) -> Matrix {
        self.text_matrix.multiply(&self.gs.ctm)
    }

    /// Advance after showing `codes` glyphs whose widths sum to `glyphs`
    /// (1/1000 em), `spaces` of them single-byte spaces.
    fn advance(&mut self, glyphs: f32, codes: usize, spaces: usize) {
        let gs = &self.gs;
        let tx = (glyphs / 1000.0 * gs.font_size
            + gs.char_spacing * codes as f32
            + gs.word_spacing * spaces as f32)
            * gs.horizontal_scale;
        self.text_matrix = Matrix::translation(tx, 0.0).multiply(&self.text_matrix);
    }

    fn advance_by_adjustment(&mut self, adjustment: f32) {
        let tx = -adjustment / 1000.0 * self.gs.font_size * self.gs.horizontal_scale;
        self.text_matrix = Matrix::translation(tx, 0.0).multiply(&self.text_matrix);
    }
}

fn cmp_f32(a: f32, b: f32) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Group spans into lines based on Y position.
///
/// Spans are ordered top to bottom, then left to right; a span joins the
/// current line when its baseline is within 30% of its font size.
pub fn group_spans_into_lines(spans: Vec<TextSpan>) -> Vec<LayoutLine> {
    if spans.is_empty() {
        return vec![];
    }

    // PDF Y grows upward
    let mut spans = spans;
    spans.sort_by(|a, b| cmp_f32(b.y, a.y).then_with(|| cmp_f32(a.x, b.x)));

    let mut lines = Vec::new();
    let mut current_line_spans: Vec<TextSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let y_tolerance = span.font_size * 0.3;

        match current_y {
            Some(y) if (span.y - y).abs() <= y_tolerance => current_line_spans.push(span),
            _ => {
                if !current_line_spans.is_empty() {
                    lines.push(LayoutLine::new(merge_line_spans(std::mem::take(
                        &mut current_line_spans,
                    ))));
                }
                current_y = Some(span.y);
                current_line_spans.push(span);
            }
        }
    }

    if !current_line_spans.is_empty() {
        lines.push(LayoutLine::new(merge_line_spans(current_line_spans)));
    }

    lines
}

/// Order a line's spans left to right and coalesce same-style neighbours.
///
/// A space is inserted where the horizontal gap between neighbours is wider
/// than a fifth of a character, except between characters of scripts that
/// do not separate words with spaces.
fn merge_line_spans(mut spans: Vec<TextSpan>) -> Vec<TextSpan> {
    spans.sort_by(|a, b| cmp_f32(a.x, b.x));

    let mut merged: Vec<TextSpan> = Vec::with_capacity(spans.len());
    for mut span in spans {
        let Some(prev) = merged.last_mut() else {
            merged.push(span);
            continue;
        };

        let space = needs_space(prev, &span);
        if prev.same_style(&span) {
            if space {
                prev.text.push(' ');
            }
            prev.text.push_str(&span.text);
            prev.width = prev.width.max(span.right() - prev.x);
        } else {
            if space {
                span.text.insert(0, ' ');
            }
            merged.push(span);
        }
    }
    merged
}

fn needs_space(prev: &TextSpan, span: &TextSpan) -> bool {
    let gap = span.x - prev.right();

    let char_count = span.text.chars().count();
    let avg_char_width = if char_count > 0 && span.width > 0.0 {
        span.width / char_count as f32
    } else {
        span.font_size * 0.5
    };
    if gap <= avg_char_width * 0.2 {
        return false;
    }

    let prev_is_cjk = prev
        .text
        .chars()
        .last()
        .is_some_and(is_spaceless_script_char);
    let curr_is_cjk = span
        .text
        .chars()
        .next()
        .is_some_and(is_spaceless_script_char);
    if prev_is_cjk && curr_is_cjk {
        return false;
    }

    let prev_ends_with_space = prev.text.ends_with(' ') || prev.text.ends_with('\u{00A0}');
    let curr_starts_with_space = span.text.starts_with(' ') || span.text.starts_with('\u{00A0}');
    !prev_ends_with_space && !curr_starts_with_space
}

/// Group lines into blocks based on spacing, size and indentation changes.
pub fn group_lines_into_blocks(lines: Vec<LayoutLine>) -> Vec<LayoutBlock> {
    if lines.is_empty() {
        return vec![];
    }

    let avg_spacing = calculate_avg_line_spacing(&lines);
    let mut blocks = Vec::new();
    let mut current_block_lines: Vec<LayoutLine> = Vec::new();

    for line in lines {
        if let Some(prev_line) = current_block_lines.last() {
            if should_break_block(prev_line, &line, avg_spacing) {
                blocks.push(LayoutBlock::new(std::mem::take(&mut current_block_lines)));
            }
        }
        current_block_lines.push(line);
    }

    if !current_block_lines.is_empty() {
        blocks.push(LayoutBlock::new(current_block_lines));
    }

    blocks
}

fn calculate_avg_line_spacing(lines: &[LayoutLine]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[0].y() - w[1].y()).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return 12.0;
    }

    spacings.iter().sum::<f32>() / spacings.len() as f32
}

fn should_break_block(prev_line: &LayoutLine, curr_line: &LayoutLine, avg_spacing: f32) -> bool {
    // Large spacing indicates new paragraph
    let spacing = (prev_line.y() - curr_line.y()).abs();
    if spacing > avg_spacing * 1.5 {
        return true;
    }

    if (prev_line.max_font_size() - curr_line.max_font_size()).abs() > 1.0 {
        return true;
    }

    // Indentation change
    (prev_line.x() - curr_line.x()).abs() > 20.0
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions A-F
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}
