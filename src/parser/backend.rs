//! PDF backend abstraction layer.
//!
//! Provides a trait-based interface for PDF operations, isolating
//! the concrete PDF library (lopdf) from the layout analysis logic.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Encoding, Object, ObjectId};

use crate::detect::{parse_pdf_header, read_pdf_header};
use crate::error::{Error, Result};
use crate::model::StyleFlags;

/// Page identifier: (object number, generation number).
///
/// Form XObjects are addressed the same way when they scope resources.
pub type PageId = (u32, u16);

/// Glyph advance used when a font carries no width table (1/1000 em).
const DEFAULT_GLYPH_WIDTH: f32 = 500.0;

/// FontDescriptor flag bits (PDF 32000-1, Table 123).
const DESCRIPTOR_FIXED_PITCH: i64 = 1 << 0;
const DESCRIPTOR_SERIF: i64 = 1 << 1;
const DESCRIPTOR_ITALIC: i64 = 1 << 6;
const DESCRIPTOR_FORCE_BOLD: i64 = 1 << 18;

/// Glyph width table of a font, in 1/1000 text space units.
#[derive(Debug, Clone)]
pub struct FontMetrics {
    pub first_char: u32,
    pub widths: Vec<f32>,
    pub missing_width: f32,
    /// Bytes per character code (2 for composite fonts)
    pub bytes_per_code: usize,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            first_char: 0,
            widths: Vec::new(),
            missing_width: DEFAULT_GLYPH_WIDTH,
            bytes_per_code: 1,
        }
    }
}

impl FontMetrics {
    /// Advance of a single character code, in 1/1000 em.
    pub fn glyph_width(&self, code: u32) -> f32 {
        code.checked_sub(self.first_char)
            .and_then(|i| self.widths.get(i as usize))
            .copied()
            .filter(|w| *w > 0.0)
            .unwrap_or(self.missing_width)
    }

    /// Sum of glyph advances (1/1000 em) and the number of single-byte
    /// space codes in `bytes`.
    pub fn measure(&self, bytes: &[u8]) -> (f32, usize) {
        let mut width = 0.0;
        let mut spaces = 0;
        for code in bytes.chunks(self.bytes_per_code.max(1)) {
            let code = code.iter().fold(0u32, |acc, b| (acc << 8) | *b as u32);
            if self.bytes_per_code == 1 && code == 32 {
                spaces += 1;
            }
            width += self.glyph_width(code);
        }
        (width, spaces)
    }
}

/// Font information returned by the backend.
#[derive(Debug, Clone)]
pub struct BackendFontInfo {
    /// Font resource name (key in the page's font dictionary).
    pub name: Vec<u8>,
    /// Base font name (e.g., "Helvetica-Bold").
    pub base_font: String,
    /// Style bits derived from the font name and descriptor.
    pub flags: StyleFlags,
    pub metrics: FontMetrics,
}

impl BackendFontInfo {
    /// Create font info with flags derived from the base font name only.
    pub fn named(name: &[u8], base_font: impl Into<String>) -> Self {
        let base_font = base_font.into();
        let flags = derive_style_flags(&base_font, None, None);
        Self {
            name: name.to_vec(),
            base_font,
            flags,
            metrics: FontMetrics::default(),
        }
    }
}

/// A form XObject invoked by the `Do` operator.
#[derive(Debug, Clone)]
pub struct FormXObject {
    /// Object id of the form stream; nested `Do` lookups start here.
    pub id: PageId,
    /// Form space to user space, `[a b c d e f]`.
    pub matrix: [f32; 6],
    /// Decoded content stream.
    pub content: Vec<u8>,
    /// Fonts of the form's own resources. Empty when the form draws with
    /// the fonts of whatever invoked it.
    pub fonts: Vec<BackendFontInfo>,
}

/// A value from a PDF content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

/// A single operation from a PDF content stream.
#[derive(Debug, Clone)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    pub fn new(operator: impl Into<String>, operands: Vec<PdfValue>) -> Self {
        Self {
            operator: operator.into(),
            operands,
        }
    }

    /// Numeric operand at `index`.
    pub fn number(&self, index: usize) -> Option<f32> {
        self.operands.get(index).and_then(get_number_from_value)
    }
}

/// Abstract interface for PDF document access.
///
/// Implementations provide page enumeration, font info and content stream
/// decoding without exposing any concrete PDF library types.
pub trait PdfBackend {
    /// Return all pages as (page_number → PageId).
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Return font info for a given page.
    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>>;

    /// Return the raw (decompressed) content stream bytes for a page.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>>;

    /// Parse raw content stream bytes into a sequence of operations.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>>;

    /// Text decoder for the fonts of a page or form XObject.
    ///
    /// The default resolves no encodings, leaving every string to
    /// [`decode_text_simple`].
    fn text_decoder(&self, _owner: PageId) -> Box<dyn TextDecoder + '_> {
        Box::new(NoEncodings)
    }

    /// Look up the form XObject `name` in the resources of `owner`, a page
    /// or an enclosing form. Image XObjects and unknown names give `Ok(None)`.
    fn form_xobject(&self, _owner: PageId, _name: &[u8]) -> Result<Option<FormXObject>> {
        Ok(None)
    }
}

/// Decodes strings shown with the fonts of one resource dictionary.
pub trait TextDecoder {
    /// Decode `bytes` shown with font resource `font_name`, or `None` when
    /// the font's encoding did not resolve.
    fn decode(&self, font_name: &[u8], bytes: &[u8]) -> Option<String>;
}

/// A [`TextDecoder`] without any resolved encodings.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEncodings;

impl TextDecoder for NoEncodings {
    fn decode(&self, _font_name: &[u8], _bytes: &[u8]) -> Option<String> {
        None
    }
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if let Some(payload) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let utf16: Vec<u16> = payload
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

/// Helper: extract a number from a [`PdfValue`].
pub fn get_number_from_value(val: &PdfValue) -> Option<f32> {
    match val {
        PdfValue::Integer(i) => Some(*i as f32),
        PdfValue::Real(r) => Some(*r),
        _ => None,
    }
}

/// Derive style bits from a base font name plus optional descriptor data.
pub fn derive_style_flags(
    base_font: &str,
    descriptor_flags: Option<i64>,
    font_weight: Option<f32>,
) -> StyleFlags {
    // Strip a subset prefix such as "ABCDEF+".
    let name = base_font
        .split_once('+')
        .map(|(_, rest)| rest)
        .unwrap_or(base_font)
        .to_lowercase();

    let mut flags = StyleFlags::empty();
    if ["bold", "black", "heavy", "semibold", "demi"]
        .iter()
        .any(|k| name.contains(k))
    {
        flags |= StyleFlags::BOLD;
    }
    if name.contains("italic") || name.contains("oblique") {
        flags |= StyleFlags::ITALIC;
    }
    if ["courier", "mono", "consolas"].iter().any(|k| name.contains(k)) {
        flags |= StyleFlags::MONOSPACED;
    }
    if !name.contains("sans")
        && ["times", "serif", "georgia", "garamond", "cambria", "roman"]
            .iter()
            .any(|k| name.contains(k))
    {
        flags |= StyleFlags::SERIFED;
    }

    if let Some(bits) = descriptor_flags {
        if bits & DESCRIPTOR_FIXED_PITCH != 0 {
            flags |= StyleFlags::MONOSPACED;
        }
        if bits & DESCRIPTOR_SERIF != 0 {
            flags |= StyleFlags::SERIFED;
        }
        if bits & DESCRIPTOR_ITALIC != 0 {
            flags |= StyleFlags::ITALIC;
        }
        if bits & DESCRIPTOR_FORCE_BOLD != 0 {
            flags |= StyleFlags::BOLD;
        }
    }
    if font_weight.is_some_and(|w| w >= 600.0) {
        flags |= StyleFlags::BOLD;
    }

    flags
}

// ---------------------------------------------------------------------------
// LopdfBackend: implementation backed by lopdf
// ---------------------------------------------------------------------------

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

/// Font encodings resolved by lopdf for one resource dictionary.
struct LopdfTextDecoder<'a> {
    encodings: HashMap<Vec<u8>, Encoding<'a>>,
}

impl TextDecoder for LopdfTextDecoder<'_> {
    fn decode(&self, font_name: &[u8], bytes: &[u8]) -> Option<String> {
        let encoding = self.encodings.get(font_name)?;
        LopdfDocument::decode_text(encoding, bytes).ok()
    }
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        read_pdf_header(path)?;
        let doc = LopdfDocument::load(path)?;
        Self::from_document(doc)
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        parse_pdf_header(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        Self::from_document(doc)
    }

    fn from_document(doc: LopdfDocument) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        Ok(Self { doc })
    }

    /// Get PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Follow a single level of indirection.
    fn resolve<'a>(&'a self, obj: &'a Object) -> Option<&'a Object> {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).ok(),
            other => Some(other),
        }
    }

    fn resolve_dict<'a>(&'a self, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Dictionary> {
        dict.get(key)
            .ok()
            .and_then(|o| self.resolve(o))
            .and_then(|o| o.as_dict().ok())
    }

    fn resolve_number(&self, dict: &Dictionary, key: &[u8]) -> Option<f32> {
        dict.get(key)
            .ok()
            .and_then(|o| self.resolve(o))
            .and_then(object_number)
    }

    /// Resource dictionaries in scope for a page (its own first, then
    /// inherited ones) or for a form XObject.
    fn resource_dicts(&self, owner: ObjectId) -> Result<Vec<&Dictionary>> {
        if let Ok(Object::Stream(stream)) = self.doc.get_object(owner) {
            return Ok(self
                .resolve_dict(&stream.dict, b"Resources")
                .into_iter()
                .collect());
        }

        let (direct, inherited) = self
            .doc
            .get_page_resources(owner)
            .map_err(|e| Error::PdfParse(e.to_string()))?;
        Ok(direct
            .into_iter()
            .chain(
                inherited
                    .into_iter()
                    .filter_map(|id| self.doc.get_dictionary(id).ok()),
            )
            .collect())
    }

    /// Font dictionaries by resource name; the innermost definition wins.
    fn owner_fonts(&self, owner: ObjectId) -> Result<BTreeMap<Vec<u8>, &Dictionary>> {
        let mut fonts = BTreeMap::new();
        for resources in self.resource_dicts(owner)? {
            let Some(font_dict) = self.resolve_dict(resources, b"Font") else {
                continue;
            };
            for (name, value) in font_dict.iter() {
                if fonts.contains_key(name) {
                    continue;
                }
                if let Some(font) = self.resolve(value).and_then(|o| o.as_dict().ok()) {
                    fonts.insert(name.clone(), font);
                }
            }
        }
        Ok(fonts)
    }

    fn xobject_id(&self, owner: ObjectId, name: &[u8]) -> Result<Option<ObjectId>> {
        Ok(self
            .resource_dicts(owner)?
            .into_iter()
            .filter_map(|resources| self.resolve_dict(resources, b"XObject"))
            .find_map(|xobjects| xobjects.get(name).ok())
            .and_then(|o| o.as_reference().ok()))
    }

    fn font_info(&self, name: &[u8], font: &Dictionary) -> BackendFontInfo {
        let base_font = font
            .get(b"BaseFont")
            .ok()
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        let composite = font
            .get(b"Subtype")
            .ok()
            .and_then(|o| o.as_name().ok())
            .is_some_and(|s| s == b"Type0");

        // Composite fonts keep their descriptor on the descendant font.
        let descendant = if composite {
            font.get(b"DescendantFonts")
                .ok()
                .and_then(|o| self.resolve(o))
                .and_then(|o| o.as_array().ok())
                .and_then(|arr| arr.first())
                .and_then(|o| self.resolve(o))
                .and_then(|o| o.as_dict().ok())
        } else {
            None
        };
        let descriptor = self.resolve_dict(descendant.unwrap_or(font), b"FontDescriptor");

        let descriptor_flags = descriptor
            .and_then(|d| self.resolve_number(d, b"Flags"))
            .map(|f| f as i64);
        let font_weight = descriptor.and_then(|d| self.resolve_number(d, b"FontWeight"));

        let mut metrics = FontMetrics::default();
        if composite {
            metrics.bytes_per_code = 2;
            if let Some(dw) = descendant.and_then(|d| self.resolve_number(d, b"DW")) {
                metrics.missing_width = dw;
            }
        } else {
            metrics.first_char = self.resolve_number(font, b"FirstChar").unwrap_or(0.0) as u32;
            metrics.widths = font
                .get(b"Widths")
                .ok()
                .and_then(|o| self.resolve(o))
                .and_then(|o| o.as_array().ok())
                .map(|arr| {
                    arr.iter()
                        .map(|w| self.resolve(w).and_then(object_number).unwrap_or(0.0))
                        .collect()
                })
                .unwrap_or_default();
            if let Some(mw) = descriptor.and_then(|d| self.resolve_number(d, b"MissingWidth")) {
                if mw > 0.0 {
                    metrics.missing_width = mw;
                }
            }
        }

        BackendFontInfo {
            name: name.to_vec(),
            flags: derive_style_flags(&base_font, descriptor_flags, font_weight),
            base_font,
            metrics,
        }
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>> {
        Ok(self
            .owner_fonts(page)?
            .iter()
            .map(|(name, dict)| self.font_info(name, dict))
            .collect())
    }

    fn page_content(&self, page: PageId) -> Result<Vec<u8>> {
        self.doc
            .get_page_content(page)
            .map_err(|e| Error::PdfParse(e.to_string()))
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content =
            lopdf::content::Content::decode(data).map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    fn text_decoder(&self, owner: PageId) -> Box<dyn TextDecoder + '_> {
        let mut encodings = HashMap::new();
        match self.owner_fonts(owner) {
            Ok(fonts) => {
                for (name, font) in fonts {
                    match font.get_font_encoding(&self.doc) {
                        Ok(encoding) => {
                            encodings.insert(name, encoding);
                        }
                        Err(e) => log::debug!(
                            "No encoding for font {}: {}",
                            String::from_utf8_lossy(&name),
                            e
                        ),
                    }
                }
            }
            Err(e) => log::debug!("No fonts for object {:?}: {}", owner, e),
        }
        Box::new(LopdfTextDecoder { encodings })
    }

    fn form_xobject(&self, owner: PageId, name: &[u8]) -> Result<Option<FormXObject>> {
        let Some(id) = self.xobject_id(owner, name)? else {
            return Ok(None);
        };
        let Ok(Object::Stream(stream)) = self.doc.get_object(id) else {
            return Ok(None);
        };
        let is_form = stream
            .dict
            .get(b"Subtype")
            .and_then(Object::as_name)
            .is_ok_and(|s| s == b"Form");
        if !is_form {
            return Ok(None);
        }

        let content = stream
            .get_plain_content()
            .map_err(|e| Error::PdfParse(e.to_string()))?;
        let matrix = stream
            .dict
            .get(b"Matrix")
            .ok()
            .and_then(|o| self.resolve(o))
            .and_then(|o| o.as_array().ok())
            .and_then(|arr| {
                let values: Vec<f32> = arr
                    .iter()
                    .filter_map(|v| self.resolve(v).and_then(object_number))
                    .collect();
                <[f32; 6]>::try_from(values).ok()
            })
            .unwrap_or([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        let fonts = self
            .owner_fonts(id)?
            .iter()
            .map(|(font_name, dict)| self.font_info(font_name, dict))
            .collect();

        Ok(Some(FormXObject {
            id,
            matrix,
            content,
            fonts,
        }))
    }
}

/// Convert a `lopdf::Object` to [`PdfValue`].
fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}

fn object_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Stream};

    #[test]
    fn test_decode_text_simple_utf8() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
    }

    #[test]
    fn test_decode_text_simple_latin1() {
        // 0xE9 = 'é' in Latin-1
        let bytes = vec![0x48, 0x65, 0x6C, 0x6C, 0xE9];
        assert_eq!(decode_text_simple(&bytes), "Hellé");
    }

    #[test]
    fn test_decode_text_simple_utf16be() {
        // UTF-16BE BOM + "Hi"
        let bytes = vec![0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_text_simple(&bytes), "Hi");
    }

    #[test]
    fn test_get_number_from_value() {
        assert_eq!(get_number_from_value(&PdfValue::Integer(42)), Some(42.0));
        assert_eq!(get_number_from_value(&PdfValue::Real(3.5)), Some(3.5));
        assert_eq!(get_number_from_value(&PdfValue::Other), None);
    }

    #[test]
    fn test_style_flags_from_name() {
        let flags = derive_style_flags("ABCDEF+Arial-BoldItalicMT", None, None);
        assert!(flags.contains(StyleFlags::BOLD));
        assert!(flags.contains(StyleFlags::ITALIC));
        assert!(!flags.contains(StyleFlags::SERIFED));

        let flags = derive_style_flags("Times-Roman", None, None);
        assert_eq!(flags, StyleFlags::SERIFED);

        let flags = derive_style_flags("Courier", None, None);
        assert_eq!(flags, StyleFlags::MONOSPACED);

        assert_eq!(
            derive_style_flags("Helvetica", None, None),
            StyleFlags::empty()
        );
    }

    #[test]
    fn test_style_flags_from_descriptor() {
        let flags = derive_style_flags("F0", Some(DESCRIPTOR_ITALIC | DESCRIPTOR_FORCE_BOLD), None);
        assert!(flags.contains(StyleFlags::ITALIC | StyleFlags::BOLD));

        let flags = derive_style_flags("F0", None, Some(700.0));
        assert_eq!(flags, StyleFlags::BOLD);
    }

    #[test]
    fn test_font_metrics_measure() {
        let metrics = FontMetrics {
            first_char: 32,
            widths: vec![250.0, 0.0, 400.0],
            missing_width: 600.0,
            bytes_per_code: 1,
        };
        assert_eq!(metrics.glyph_width(32), 250.0);
        // zero entries fall back to the missing width
        assert_eq!(metrics.glyph_width(33), 600.0);
        assert_eq!(metrics.glyph_width(34), 400.0);
        assert_eq!(metrics.glyph_width(10), 600.0);

        let (width, spaces) = metrics.measure(b" \" ");
        assert_eq!(width, 900.0);
        assert_eq!(spaces, 2);
    }

    #[test]
    fn test_default_decoder_resolves_nothing() {
        struct NoBackend;
        impl PdfBackend for NoBackend {
            fn pages(&self) -> BTreeMap<u32, PageId> {
                BTreeMap::new()
            }
            fn page_fonts(&self, _page: PageId) -> Result<Vec<BackendFontInfo>> {
                Ok(vec![])
            }
            fn page_content(&self, _page: PageId) -> Result<Vec<u8>> {
                Ok(vec![])
            }
            fn decode_content(&self, _data: &[u8]) -> Result<Vec<ContentOp>> {
                Ok(vec![])
            }
        }

        assert_eq!(NoBackend.text_decoder((1, 0)).decode(b"F1", b"AB"), None);
        assert!(NoBackend.form_xobject((1, 0), b"Fm0").unwrap().is_none());
    }

    /// One page whose resources hold a WinAnsi font, a bare Type1 font, a
    /// form XObject with its own font, and an image.
    fn resource_doc() -> (LopdfBackend, PageId) {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let winansi_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let custom_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Symbolic",
            "Encoding" => "CustomEncoding",
        });
        let form_font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Times-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let form_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "BBox" => [0, 0, 612, 792].map(Object::Integer).to_vec(),
                "Matrix" => vec![
                    Object::Integer(1),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(1),
                    Object::Integer(10),
                    Object::Real(-20.5),
                ],
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F9" => Object::Reference(form_font_id) },
                },
            },
            b"BT /F9 12 Tf (Inside) Tj ET".to_vec(),
        ));
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 1,
                "Height" => 1,
            },
            vec![0],
        ));
        let content_id = doc.add_object(Stream::new(dictionary! {}, b"/Fm0 Do".to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "Font" => dictionary! {
                    "F1" => Object::Reference(winansi_id),
                    "F2" => Object::Reference(custom_id),
                },
                "XObject" => dictionary! {
                    "Fm0" => Object::Reference(form_id),
                    "Im0" => Object::Reference(image_id),
                },
            },
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        (LopdfBackend::from_document(doc).unwrap(), page_id)
    }

    #[test]
    fn test_winansi_decoding() {
        let (backend, page) = resource_doc();
        let decoder = backend.text_decoder(page);
        assert_eq!(
            decoder.decode(b"F1", b"\x93Hello\x94 \x96 caf\xe9").as_deref(),
            Some("\u{201C}Hello\u{201D} \u{2013} caf\u{e9}")
        );
        // named encodings lopdf cannot map are left to the fallback
        assert_eq!(decoder.decode(b"F2", b"abc"), None);
        assert_eq!(decoder.decode(b"F7", b"abc"), None);
    }

    #[test]
    fn test_form_xobject_lookup() {
        let (backend, page) = resource_doc();

        let form = backend.form_xobject(page, b"Fm0").unwrap().unwrap();
        assert_eq!(form.matrix, [1.0, 0.0, 0.0, 1.0, 10.0, -20.5]);
        assert_eq!(form.content, b"BT /F9 12 Tf (Inside) Tj ET".to_vec());
        assert_eq!(form.fonts.len(), 1);
        assert_eq!(form.fonts[0].base_font, "Times-Bold");
        assert!(form.fonts[0].flags.contains(StyleFlags::BOLD));
        assert_eq!(
            backend.text_decoder(form.id).decode(b"F9", b"\x93").as_deref(),
            Some("\u{201C}")
        );

        assert!(backend.form_xobject(page, b"Im0").unwrap().is_none());
        assert!(backend.form_xobject(page, b"Nope").unwrap().is_none());
        // the form's resources do not see the page's XObjects
        assert!(backend.form_xobject(form.id, b"Fm0").unwrap().is_none());
    }

    #[test]
    fn test_load_bytes_rejects_non_pdf() {
        assert!(matches!(
            LopdfBackend::load_bytes(b"not a pdf at all"),
            Err(Error::UnknownFormat)
        ));
    }
}
