//! Minimal WordprocessingML writer: one centered title paragraph followed by
//! a full-width table. Just enough of the OOXML package for Word and
//! LibreOffice to open it.

use std::fmt::Write as _;
use std::io::{Seek, Write};

use zip::result::ZipResult;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::export::ExportRow;

pub const FONT_FAMILY: &str = "Times New Roman";
pub const HEADER_FILL: &str = "F1F5F9";
/// Half-points.
const BODY_SIZE: u32 = 24;
const TITLE_SIZE: u32 = 36;

/// Column headers and title, already localized.
#[derive(Clone, Debug)]
pub struct ExportLabels {
    pub title: String,
    pub headers: [String; 6],
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

pub fn write_docx<W: Write + Seek>(
    rows: &[ExportRow],
    labels: &ExportLabels,
    writer: W,
) -> ZipResult<W> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(CONTENT_TYPES.as_bytes())?;
    zip.start_file("_rels/.rels", options)?;
    zip.write_all(ROOT_RELS.as_bytes())?;
    zip.start_file("word/_rels/document.xml.rels", options)?;
    zip.write_all(DOCUMENT_RELS.as_bytes())?;
    zip.start_file("word/styles.xml", options)?;
    zip.write_all(styles_xml().as_bytes())?;
    zip.start_file("word/document.xml", options)?;
    zip.write_all(document_xml(rows, labels).as_bytes())?;

    zip.finish()
}

fn styles_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="{W_NS}"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="{FONT_FAMILY}" w:hAnsi="{FONT_FAMILY}" w:cs="{FONT_FAMILY}" w:eastAsia="{FONT_FAMILY}"/><w:sz w:val="{BODY_SIZE}"/><w:szCs w:val="{BODY_SIZE}"/></w:rPr></w:rPrDefault></w:docDefaults></w:styles>"#
    )
}

#[derive(Clone, Copy, Default)]
struct RunStyle {
    bold: bool,
    italic: bool,
    size: Option<u32>,
}

fn run(out: &mut String, text: &str, style: RunStyle) {
    out.push_str("<w:r><w:rPr>");
    let _ = write!(
        out,
        r#"<w:rFonts w:ascii="{FONT_FAMILY}" w:hAnsi="{FONT_FAMILY}" w:cs="{FONT_FAMILY}"/>"#
    );
    if style.bold {
        out.push_str("<w:b/>");
    }
    if style.italic {
        out.push_str("<w:i/>");
    }
    if let Some(size) = style.size {
        let _ = write!(out, r#"<w:sz w:val="{size}"/><w:szCs w:val="{size}"/>"#);
    }
    let _ = write!(
        out,
        r#"</w:rPr><w:t xml:space="preserve">{}</w:t></w:r>"#,
        xml_escape(text)
    );
}

fn paragraph(out: &mut String, text: &str, style: RunStyle, centered: bool) {
    out.push_str("<w:p>");
    if centered {
        out.push_str(r#"<w:pPr><w:jc w:val="center"/></w:pPr>"#);
    }
    run(out, text, style);
    out.push_str("</w:p>");
}

fn cell(out: &mut String, paragraphs: &[&str], style: RunStyle) {
    out.push_str("<w:tc>");
    if paragraphs.is_empty() {
        out.push_str("<w:p/>");
    }
    for text in paragraphs {
        paragraph(out, text, style, false);
    }
    out.push_str("</w:tc>");
}

fn header_cell(out: &mut String, text: &str) {
    let _ = write!(
        out,
        r#"<w:tc><w:tcPr><w:shd w:val="clear" w:color="auto" w:fill="{HEADER_FILL}"/><w:vAlign w:val="center"/></w:tcPr>"#
    );
    paragraph(
        out,
        text,
        RunStyle {
            bold: true,
            size: Some(BODY_SIZE),
            ..RunStyle::default()
        },
        true,
    );
    out.push_str("</w:tc>");
}

fn document_xml(rows: &[ExportRow], labels: &ExportLabels) -> String {
    let mut out = String::with_capacity(1024 + rows.len() * 512);
    let _ = write!(
        out,
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{W_NS}"><w:body>"#
    );

    out.push_str(r#"<w:p><w:pPr><w:jc w:val="center"/><w:spacing w:after="400"/></w:pPr>"#);
    run(
        &mut out,
        &labels.title,
        RunStyle {
            bold: true,
            size: Some(TITLE_SIZE),
            ..RunStyle::default()
        },
    );
    out.push_str("</w:p>");

    out.push_str(
        r#"<w:tbl><w:tblPr><w:tblW w:w="5000" w:type="pct"/><w:tblBorders><w:top w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:left w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:bottom w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:right w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideH w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideV w:val="single" w:sz="4" w:space="0" w:color="auto"/></w:tblBorders></w:tblPr>"#,
    );

    out.push_str(r#"<w:tr><w:trPr><w:tblHeader/></w:trPr>"#);
    for header in &labels.headers {
        header_cell(&mut out, header);
    }
    out.push_str("</w:tr>");

    let plain = RunStyle::default();
    for row in rows {
        out.push_str("<w:tr>");
        cell(&mut out, &[&row.index.to_string()], plain);
        cell(
            &mut out,
            &[&row.original],
            RunStyle {
                bold: true,
                ..plain
            },
        );
        cell(&mut out, &[&row.part_of_speech], plain);
        cell(&mut out, &[&row.phonetics], plain);
        let meanings: Vec<&str> = row.meanings.iter().map(String::as_str).collect();
        cell(&mut out, &meanings, plain);
        cell(
            &mut out,
            &[&row.example],
            RunStyle {
                italic: true,
                ..plain
            },
        );
        out.push_str("</w:tr>");
    }

    out.push_str("</w:tbl><w:sectPr/></w:body></w:document>");
    out
}

pub fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r') => {}
            c => out.push(c),
        }
    }
    out
}
