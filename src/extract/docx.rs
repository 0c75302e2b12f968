//! Word (.docx) text extraction from the OOXML package.

use std::io::{Cursor, Read};

use async_trait::async_trait;
use quick_xml::events::Event;

use super::{BackendOutput, ExtractError, ExtractionBackend};
use crate::models::SourceDocument;
use crate::storage::{ContentAccess, ContentSource};

pub const METHOD: &str = "DOCX parser";

/// Upper bound on the decompressed size of the main document part.
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

const DOCUMENT_PART: &str = "word/document.xml";

pub struct DocxExtractor;

#[async_trait]
impl ExtractionBackend for DocxExtractor {
    fn method(&self) -> &str {
        METHOD
    }

    fn content_access(&self) -> ContentAccess {
        ContentAccess::LocalFile
    }

    async fn extract(
        &self,
        source: &ContentSource,
        _document: &SourceDocument,
    ) -> Result<BackendOutput, ExtractError> {
        let bytes = source.read_bytes().await?;
        let text = tokio::task::spawn_blocking(move || docx_text(&bytes))
            .await
            .map_err(|e| ExtractError::Parse(e.to_string()))??;
        Ok(BackendOutput {
            text,
            method: METHOD.to_string(),
        })
    }
}

/// Paragraph text of a .docx package, one paragraph per line.
pub fn docx_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractError::Parse(e.to_string()))?;
    let entry = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractError::Parse(format!("{}: {}", DOCUMENT_PART, e)))?;

    let mut xml = Vec::new();
    entry.take(MAX_XML_ENTRY_BYTES).read_to_end(&mut xml)?;
    if xml.len() as u64 >= MAX_XML_ENTRY_BYTES {
        return Err(ExtractError::Parse(format!(
            "{} exceeds size limit ({} bytes)",
            DOCUMENT_PART, MAX_XML_ENTRY_BYTES
        )));
    }

    paragraphs(&xml).map(|p| p.join("\n"))
}

fn paragraphs(xml: &[u8]) -> Result<Vec<String>, ExtractError> {
    let mut reader = quick_xml::Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"p" => current.clear(),
                b"r" => in_run = true,
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                b"r" => in_run = false,
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"p" => paragraphs.push(String::new()),
                // Tab stops in paragraph properties are also <w:tab/>.
                b"tab" if in_run => current.push('\t'),
                b"br" | b"cr" if in_run => current.push('\n'),
                _ => {}
            },
            Ok(Event::Text(te)) if in_text => {
                let text = te
                    .unescape()
                    .map_err(|e| ExtractError::Parse(e.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Parse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file(DOCUMENT_PART, zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(document_xml.as_bytes()).unwrap();
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_paragraphs_joined_by_newline() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>Executive Summary</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Revenue grew </w:t></w:r><w:r><w:t>40% &amp; margins held.</w:t></w:r></w:p>
    <w:p/>
    <w:p><w:r><w:t>Name</w:t><w:tab/><w:t>Role</w:t></w:r></w:p>
  </w:body>
</w:document>"#;
        let text = docx_text(&build_docx(xml)).unwrap();
        assert_eq!(
            text,
            "Executive Summary\nRevenue grew 40% & margins held.\n\nName\tRole"
        );
    }

    #[test]
    fn test_missing_document_part() {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("other.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"<x/>").unwrap();
        let bytes = zip.finish().unwrap().into_inner();
        assert!(matches!(docx_text(&bytes), Err(ExtractError::Parse(_))));
    }

    #[test]
    fn test_not_a_zip() {
        assert!(docx_text(b"plain text, not a package").is_err());
    }
}
