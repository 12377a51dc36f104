use std::io::{Cursor, Write};

use policy_spec::GeneratedPolicy;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::{ExportError, docx_error};
use crate::options::{ExportOptions, WATERMARK_TEXT};

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:cs="Calibri"/><w:sz w:val="22"/></w:rPr></w:rPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style><w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:rPr><w:sz w:val="56"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:b/><w:sz w:val="26"/></w:rPr></w:style></w:styles>"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
}

/// One paragraph of the styled export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocxBlock {
    pub text: String,
    pub style: Option<&'static str>,
    pub alignment: Option<Alignment>,
    /// Spacing in twentieths of a point.
    pub space_before: Option<u32>,
    pub space_after: Option<u32>,
    pub italic: bool,
    pub color: Option<&'static str>,
}

impl DocxBlock {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: None,
            alignment: None,
            space_before: None,
            space_after: None,
            italic: false,
            color: None,
        }
    }
}

/// Ordered blocks for the policy, ending with the watermark when free.
pub fn blocks(policy: &GeneratedPolicy, options: ExportOptions) -> Vec<DocxBlock> {
    let mut blocks = vec![
        DocxBlock {
            style: Some("Title"),
            alignment: Some(Alignment::Center),
            ..DocxBlock::plain(policy.title.clone())
        },
        DocxBlock {
            alignment: Some(Alignment::Left),
            space_after: Some(400),
            ..DocxBlock::plain(format!("Last Updated: {}", policy.last_updated))
        },
    ];

    for section in &policy.sections {
        blocks.push(DocxBlock {
            style: Some("Heading2"),
            space_before: Some(400),
            space_after: Some(200),
            ..DocxBlock::plain(section.heading.clone())
        });
        blocks.extend(section.content.iter().map(|paragraph| DocxBlock {
            space_after: Some(200),
            ..DocxBlock::plain(paragraph.clone())
        }));
    }

    if options.watermarked() {
        blocks.push(DocxBlock {
            alignment: Some(Alignment::Center),
            space_before: Some(800),
            italic: true,
            color: Some("CCCCCC"),
            ..DocxBlock::plain(WATERMARK_TEXT)
        });
    }
    blocks
}

struct Xml {
    writer: Writer<Vec<u8>>,
}

impl Xml {
    fn new() -> Result<Self, ExportError> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(docx_error)?;
        Ok(Self { writer })
    }

    fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), ExportError> {
        let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer
            .write_event(Event::Start(start))
            .map_err(docx_error)
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), ExportError> {
        let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer
            .write_event(Event::Empty(start))
            .map_err(docx_error)
    }

    fn close(&mut self, name: &str) -> Result<(), ExportError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(docx_error)
    }

    fn text(&mut self, text: &str) -> Result<(), ExportError> {
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(docx_error)
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

fn write_block(xml: &mut Xml, block: &DocxBlock) -> Result<(), ExportError> {
    xml.open("w:p", &[])?;
    xml.open("w:pPr", &[])?;
    if let Some(style) = block.style {
        xml.empty("w:pStyle", &[("w:val", style)])?;
    }
    if block.space_before.is_some() || block.space_after.is_some() {
        let before = block.space_before.map(|value| value.to_string());
        let after = block.space_after.map(|value| value.to_string());
        let mut attrs = Vec::new();
        if let Some(before) = before.as_deref() {
            attrs.push(("w:before", before));
        }
        if let Some(after) = after.as_deref() {
            attrs.push(("w:after", after));
        }
        xml.empty("w:spacing", &attrs)?;
    }
    if let Some(alignment) = block.alignment {
        let value = match alignment {
            Alignment::Left => "left",
            Alignment::Center => "center",
        };
        xml.empty("w:jc", &[("w:val", value)])?;
    }
    xml.close("w:pPr")?;

    xml.open("w:r", &[])?;
    if block.italic || block.color.is_some() {
        xml.open("w:rPr", &[])?;
        if block.italic {
            xml.empty("w:i", &[])?;
        }
        if let Some(color) = block.color {
            xml.empty("w:color", &[("w:val", color)])?;
        }
        xml.close("w:rPr")?;
    }
    xml.open("w:t", &[("xml:space", "preserve")])?;
    xml.text(&block.text)?;
    xml.close("w:t")?;
    xml.close("w:r")?;
    xml.close("w:p")
}

fn document_xml(blocks: &[DocxBlock]) -> Result<Vec<u8>, ExportError> {
    let mut xml = Xml::new()?;
    xml.open("w:document", &[("xmlns:w", WORD_NS)])?;
    xml.open("w:body", &[])?;
    for block in blocks {
        write_block(&mut xml, block)?;
    }
    xml.open("w:sectPr", &[])?;
    xml.empty("w:pgSz", &[("w:w", "11906"), ("w:h", "16838")])?;
    xml.empty(
        "w:pgMar",
        &[
            ("w:top", "1440"),
            ("w:right", "1440"),
            ("w:bottom", "1440"),
            ("w:left", "1440"),
            ("w:header", "708"),
            ("w:footer", "708"),
            ("w:gutter", "0"),
        ],
    )?;
    xml.close("w:sectPr")?;
    xml.close("w:body")?;
    xml.close("w:document")?;
    Ok(xml.finish())
}

/// Renders the policy as an Office Open XML word-processing package.
pub fn render_docx(policy: &GeneratedPolicy, options: ExportOptions) -> Result<Vec<u8>, ExportError> {
    let blocks = blocks(policy, options);
    let document = document_xml(&blocks)?;

    let file_options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let parts: [(&str, &[u8]); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("_rels/.rels", PACKAGE_RELS.as_bytes()),
        ("word/document.xml", document.as_slice()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS.as_bytes()),
        ("word/styles.xml", STYLES.as_bytes()),
    ];
    for (name, contents) in parts {
        zip.start_file(name, file_options).map_err(docx_error)?;
        zip.write_all(contents)?;
    }
    let bytes = zip.finish().map_err(docx_error)?.into_inner();
    debug!(blocks = blocks.len(), bytes = bytes.len(), "rendered docx");
    Ok(bytes)
}
