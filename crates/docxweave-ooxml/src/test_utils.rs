//! Shared test utilities for docxweave
//!
//! Fixtures for building small DOCX packages in memory. Used by the unit
//! tests here and by the integration tests of the downstream crates.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::CompressionMethod;
use zip::ZipWriter;

use crate::archive::{COMMENTS_PART, DOCUMENT_PART, NUMBERING_PART};

/// WordprocessingML main namespace
pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Wrap body content in a namespaced `w:document`
pub fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{W_NS}"><w:body>{body}</w:body></w:document>"#
    )
}

/// Build a numbering part from `(num_id, abstract_num_id, format)` triples
///
/// Each abstract definition gets a single level carrying the format.
pub fn numbering_xml(defs: &[(u32, u32, &str)]) -> String {
    let mut abstracts = String::new();
    let mut nums = String::new();
    for (num_id, abstract_id, format) in defs {
        abstracts.push_str(&format!(
            r#"<w:abstractNum w:abstractNumId="{abstract_id}"><w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="{format}"/></w:lvl></w:abstractNum>"#
        ));
        nums.push_str(&format!(
            r#"<w:num w:numId="{num_id}"><w:abstractNumId w:val="{abstract_id}"/></w:num>"#
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<w:numbering xmlns:w="{W_NS}">{abstracts}{nums}</w:numbering>"#
    )
}

/// Build a comments part from `(id, author, date, text)` tuples
pub fn comments_xml(comments: &[(&str, &str, &str, &str)]) -> String {
    let mut body = String::new();
    for (id, author, date, text) in comments {
        body.push_str(&format!(
            r#"<w:comment w:id="{id}" w:author="{author}" w:date="{date}"><w:p><w:r><w:t>{text}</w:t></w:r></w:p></w:comment>"#
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<w:comments xmlns:w="{W_NS}">{body}</w:comments>"#
    )
}

/// A paragraph containing one plain run
pub fn para(text: &str) -> String {
    format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>")
}

/// A list paragraph at level 0 of `num_id`
pub fn list_para(num_id: u32, text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="{num_id}"/></w:numPr></w:pPr><w:r><w:t>{text}</w:t></w:r></w:p>"#
    )
}

/// Builder for an in-memory DOCX package
///
/// # Example
/// ```ignore
/// use docxweave_ooxml::test_utils::{document_xml, para, DocxBuilder};
/// let docx = DocxBuilder::new().document(&document_xml(&para("Hi"))).build();
/// ```
#[derive(Debug, Default)]
pub struct DocxBuilder {
    parts: Vec<(String, String)>,
}

impl DocxBuilder {
    /// Start an empty package (content types and relationships only)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `word/document.xml`
    pub fn document(self, xml: &str) -> Self {
        self.part(DOCUMENT_PART, xml)
    }

    /// Set `word/numbering.xml`
    pub fn numbering(self, xml: &str) -> Self {
        self.part(NUMBERING_PART, xml)
    }

    /// Set `word/comments.xml`
    pub fn comments(self, xml: &str) -> Self {
        self.part(COMMENTS_PART, xml)
    }

    /// Add an arbitrary part
    pub fn part(mut self, name: &str, xml: &str) -> Self {
        self.parts.push((name.to_string(), xml.to_string()));
        self
    }

    /// Write the ZIP container
    pub fn build(self) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(&mut buffer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(
            br#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#,
        )
        .unwrap();

        zip.start_file("_rels/.rels", options).unwrap();
        zip.write_all(
            br#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#,
        )
        .unwrap();

        for (name, xml) in &self.parts {
            zip.start_file(name.as_str(), options).unwrap();
            zip.write_all(xml.as_bytes()).unwrap();
        }

        zip.finish().unwrap();
        buffer.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::OoxmlArchive;

    #[test]
    fn test_builder_writes_requested_parts() {
        let docx = DocxBuilder::new()
            .document(&document_xml(&para("Hello")))
            .numbering(&numbering_xml(&[(1, 0, "bullet")]))
            .build();

        let archive = OoxmlArchive::from_bytes(&docx).unwrap();
        assert!(archive.contains("_rels/.rels"));
        let doc = String::from_utf8_lossy(archive.document_xml().unwrap()).into_owned();
        assert!(doc.contains("<w:t>Hello</w:t>"));
        let numbering = String::from_utf8_lossy(archive.numbering_xml().unwrap()).into_owned();
        assert!(numbering.contains(r#"w:numFmt w:val="bullet""#));
    }

    #[test]
    fn test_list_para_carries_level_and_id() {
        let p = list_para(7, "item");
        assert!(p.contains(r#"<w:ilvl w:val="0"/>"#));
        assert!(p.contains(r#"<w:numId w:val="7"/>"#));
    }
}
