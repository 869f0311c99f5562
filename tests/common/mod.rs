//! Test fixtures: small text-only PDFs written with lopdf.

#![allow(dead_code)]

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

/// Regular body font resource (WinAnsi encoded).
pub const REGULAR: &str = "F1";
/// Bold font resource (WinAnsi encoded).
pub const BOLD: &str = "F2";
/// Composite Identity-H font whose ToUnicode map covers [`CID_GLYPHS`].
pub const CID: &str = "F3";

/// Two-byte codes of the [`CID`] font and the characters they map to.
pub const CID_GLYPHS: &[(u16, char)] = &[
    (3, 'H'),
    (4, 'i'),
    (5, ' '),
    (6, 'a'),
    (7, 'l'),
    (8, 'o'),
];

const LEFT_MARGIN: f32 = 72.0;

struct TextItem {
    font: &'static str,
    size: f32,
    x: f32,
    y: f32,
    bytes: Vec<u8>,
    hex: bool,
}

enum PageItem {
    Text(TextItem),
    /// Lines drawn by a form XObject invoked with `Do`.
    Form { matrix: [f32; 6], items: Vec<TextItem> },
}

/// Builder for multi-page PDFs with one `Tj` per line.
#[derive(Default)]
pub struct PdfFixture {
    pages: Vec<Vec<PageItem>>,
}

impl PdfFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new page.
    pub fn page(mut self) -> Self {
        self.pages.push(Vec::new());
        self
    }

    /// Add a line in the regular font at the left margin.
    pub fn text(self, text: &str, size: f32, y: f32) -> Self {
        self.item(REGULAR, text, size, LEFT_MARGIN, y)
    }

    /// Add a line in the bold font at the left margin.
    pub fn bold(self, text: &str, size: f32, y: f32) -> Self {
        self.item(BOLD, text, size, LEFT_MARGIN, y)
    }

    /// Add body lines of `size` points, 14 points apart, starting at `y`.
    pub fn paragraph(mut self, lines: &[&str], size: f32, y: f32) -> Self {
        for (i, line) in lines.iter().enumerate() {
            self = self.text(line, size, y - 14.0 * i as f32);
        }
        self
    }

    pub fn item(self, font: &'static str, text: &str, size: f32, x: f32, y: f32) -> Self {
        self.push(PageItem::Text(TextItem {
            font,
            size,
            x,
            y,
            bytes: text.as_bytes().to_vec(),
            hex: false,
        }))
    }

    /// Add a line of already-encoded bytes, written as a hex string.
    pub fn raw(self, font: &'static str, bytes: &[u8], size: f32, y: f32) -> Self {
        self.push(PageItem::Text(TextItem {
            font,
            size,
            x: LEFT_MARGIN,
            y,
            bytes: bytes.to_vec(),
            hex: true,
        }))
    }

    /// Add `(text, size, y)` lines drawn through a form XObject with `matrix`.
    pub fn form(self, matrix: [f32; 6], font: &'static str, lines: &[(&str, f32, f32)]) -> Self {
        let items = lines
            .iter()
            .map(|(text, size, y)| TextItem {
                font,
                size: *size,
                x: LEFT_MARGIN,
                y: *y,
                bytes: text.as_bytes().to_vec(),
                hex: false,
            })
            .collect();
        self.push(PageItem::Form { matrix, items })
    }

    fn push(mut self, item: PageItem) -> Self {
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        if let Some(page) = self.pages.last_mut() {
            page.push(item);
        }
        self
    }

    pub fn build(&self) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(dictionary! {
            "Type" => Object::Name(b"Font".to_vec()),
            "Subtype" => Object::Name(b"Type1".to_vec()),
            "BaseFont" => Object::Name(b"Helvetica".to_vec()),
            "Encoding" => Object::Name(b"WinAnsiEncoding".to_vec()),
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => Object::Name(b"Font".to_vec()),
            "Subtype" => Object::Name(b"Type1".to_vec()),
            "BaseFont" => Object::Name(b"Helvetica-Bold".to_vec()),
            "Encoding" => Object::Name(b"WinAnsiEncoding".to_vec()),
        });
        let cid_id = add_cid_font(&mut doc);
        let fonts_id = doc.add_object(dictionary! {
            REGULAR => Object::Reference(regular_id),
            BOLD => Object::Reference(bold_id),
            CID => Object::Reference(cid_id),
        });

        let mut kids = Vec::new();
        for items in &self.pages {
            let mut operations = Vec::new();
            let mut xobjects = lopdf::Dictionary::new();
            for item in items {
                match item {
                    PageItem::Text(text) => operations.extend(text_operations(text)),
                    PageItem::Form { matrix, items } => {
                        let content: Content<Vec<Operation>> = Content {
                            operations: items.iter().flat_map(text_operations).collect(),
                        };
                        let form = Stream::new(
                            dictionary! {
                                "Type" => Object::Name(b"XObject".to_vec()),
                                "Subtype" => Object::Name(b"Form".to_vec()),
                                "BBox" => Object::Array(
                                    [0, 0, 612, 792].map(Object::Integer).to_vec(),
                                ),
                                "Matrix" => Object::Array(
                                    matrix.iter().map(|v| Object::Real(*v)).collect(),
                                ),
                            },
                            content.encode().expect("encode form"),
                        );
                        let name = format!("Fm{}", xobjects.len());
                        xobjects.set(name.as_bytes().to_vec(), doc.add_object(form));
                        operations.push(Operation::new(
                            "Do",
                            vec![Object::Name(name.into_bytes())],
                        ));
                    }
                }
            }

            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().expect("encode content"),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => Object::Name(b"Page".to_vec()),
                "Parent" => Object::Reference(pages_id),
                "Contents" => Object::Reference(content_id),
                "Resources" => dictionary! {
                    "Font" => Object::Reference(fonts_id),
                    "XObject" => xobjects,
                },
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => Object::Name(b"Pages".to_vec()),
            "Kids" => Object::Array(kids),
            "Count" => Object::Integer(count),
            "MediaBox" => Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ]),
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => Object::Name(b"Catalog".to_vec()),
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));
        doc
    }

    /// Write the PDF to `path`.
    pub fn save(&self, path: &Path) {
        let mut doc = self.build();
        doc.save(path).expect("save pdf");
    }

    /// Serialize the PDF to bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut doc = self.build();
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("serialize pdf");
        bytes
    }
}

fn text_operations(item: &TextItem) -> Vec<Operation> {
    let format = if item.hex {
        StringFormat::Hexadecimal
    } else {
        StringFormat::Literal
    };
    vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![
                Object::Name(item.font.as_bytes().to_vec()),
                Object::Real(item.size),
            ],
        ),
        Operation::new("Td", vec![Object::Real(item.x), Object::Real(item.y)]),
        Operation::new("Tj", vec![Object::String(item.bytes.clone(), format)]),
        Operation::new("ET", vec![]),
    ]
}

/// Type0 font over a TrueType descendant, mapped to Unicode by a ToUnicode
/// CMap only.
fn add_cid_font(doc: &mut Document) -> lopdf::ObjectId {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo\n\
         << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );
    cmap.push_str(&format!("{} beginbfchar\n", CID_GLYPHS.len()));
    for (code, ch) in CID_GLYPHS {
        cmap.push_str(&format!("<{:04X}> <{:04X}>\n", code, *ch as u32));
    }
    cmap.push_str(
        "endbfchar\n\
         endcmap\n\
         CMapName currentdict /CMap defineresource pop\n\
         end\n\
         end\n",
    );
    let to_unicode_id = doc.add_object(Stream::new(dictionary! {}, cmap.into_bytes()));

    let descendant_id = doc.add_object(dictionary! {
        "Type" => Object::Name(b"Font".to_vec()),
        "Subtype" => Object::Name(b"CIDFontType2".to_vec()),
        "BaseFont" => Object::Name(b"NotoSans-Regular".to_vec()),
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => Object::Integer(0),
        },
        "DW" => Object::Integer(600),
    });
    doc.add_object(dictionary! {
        "Type" => Object::Name(b"Font".to_vec()),
        "Subtype" => Object::Name(b"Type0".to_vec()),
        "BaseFont" => Object::Name(b"NotoSans-Regular".to_vec()),
        "Encoding" => Object::Name(b"Identity-H".to_vec()),
        "DescendantFonts" => Object::Array(vec![Object::Reference(descendant_id)]),
        "ToUnicode" => Object::Reference(to_unicode_id),
    })
}

/// Encode `text` as two-byte codes of the [`CID`] font.
pub fn cid_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .flat_map(|ch| {
            let code = CID_GLYPHS
                .iter()
                .find(|(_, mapped)| *mapped == ch)
                .map(|(code, _)| *code)
                .expect("glyph in CID_GLYPHS");
            code.to_be_bytes()
        })
        .collect()
}

/// A two-page report: 24pt title, 16pt sections, a 13pt subsection, 11pt body.
pub fn report_fixture() -> PdfFixture {
    PdfFixture::new()
        .page()
        .bold("Annual Report", 24.0, 740.0)
        .text("Introduction", 16.0, 690.0)
        .paragraph(
            &[
                "This report covers the year in review.",
                "It summarizes the main results.",
                "Numbers are unaudited.",
            ],
            11.0,
            660.0,
        )
        .page()
        .text("Results", 16.0, 740.0)
        .text("Detailed Findings", 13.0, 700.0)
        .paragraph(
            &[
                "Revenue grew in every region.",
                "Costs stayed flat.",
                "Headcount increased slightly.",
            ],
            11.0,
            670.0,
        )
        .text("Introduction", 16.0, 500.0)
}
