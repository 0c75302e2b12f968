//! Outlook (.msg) messages stored as OLE compound files.
//!
//! MAPI properties live in streams named `__substg1.0_{tag}{type}` where the
//! type suffix is `001F` for UTF-16LE strings and `001E` for 8-bit strings.

use std::io::{Cursor, Read, Seek};

use async_trait::async_trait;

use super::{BackendOutput, ExtractError, ExtractionBackend};
use crate::models::SourceDocument;
use crate::storage::{ContentAccess, ContentSource};

pub const METHOD: &str = "MSG parser";

const PR_SUBJECT: &str = "0037";
const PR_BODY: &str = "1000";
const PR_SENDER_NAME: &str = "0C1A";
const PR_SENDER_EMAIL: &str = "0C1F";
const PR_DISPLAY_TO: &str = "0E04";

pub struct MsgExtractor;

#[async_trait]
impl ExtractionBackend for MsgExtractor {
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
        let text = tokio::task::spawn_blocking(move || msg_text(&bytes))
            .await
            .map_err(|e| ExtractError::Parse(e.to_string()))??;
        Ok(BackendOutput {
            text,
            method: METHOD.to_string(),
        })
    }
}

/// Render sender, recipients, subject and body of a .msg file.
pub fn msg_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut file = cfb::CompoundFile::open(Cursor::new(bytes))
        .map_err(|e| ExtractError::Parse(format!("not an OLE compound file: {}", e)))?;

    let sender = read_property(&mut file, PR_SENDER_NAME)
        .or_else(|| read_property(&mut file, PR_SENDER_EMAIL))
        .unwrap_or_default();
    let to = read_property(&mut file, PR_DISPLAY_TO).unwrap_or_default();
    let subject = read_property(&mut file, PR_SUBJECT).unwrap_or_default();
    let body = read_property(&mut file, PR_BODY).unwrap_or_default();

    Ok(format!(
        "From: {}\nTo: {}\nSubject: {}\n\n{}",
        sender, to, subject, body
    ))
}

fn read_property<F: Read + Seek>(file: &mut cfb::CompoundFile<F>, tag: &str) -> Option<String> {
    let unicode = format!("/__substg1.0_{}001F", tag);
    if let Some(raw) = read_stream(file, &unicode) {
        return Some(decode_utf16le(&raw));
    }
    let ansi = format!("/__substg1.0_{}001E", tag);
    read_stream(file, &ansi)
        .map(|raw| String::from_utf8_lossy(&raw).trim_end_matches('\0').to_string())
}

fn read_stream<F: Read + Seek>(file: &mut cfb::CompoundFile<F>, path: &str) -> Option<Vec<u8>> {
    let mut stream = file.open_stream(path).ok()?;
    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).ok()?;
    Some(raw)
}

fn decode_utf16le(raw: &[u8]) -> String {
    let units: Vec<u16> = raw
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
        .trim_end_matches('\0')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn utf16(s: &str) -> Vec<u8> {
        s.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
    }

    fn build_msg(props: &[(&str, Vec<u8>)]) -> Vec<u8> {
        let mut file = cfb::CompoundFile::create(Cursor::new(Vec::new())).unwrap();
        for (path, data) in props {
            let mut stream = file.create_stream(path).unwrap();
            stream.write_all(data).unwrap();
        }
        file.flush().unwrap();
        file.into_inner().into_inner()
    }

    #[test]
    fn test_unicode_properties() {
        let bytes = build_msg(&[
            ("/__substg1.0_0C1A001F", utf16("Priya Shah")),
            ("/__substg1.0_0E04001F", utf16("Investment Committee")),
            ("/__substg1.0_0037001F", utf16("Term sheet draft")),
            ("/__substg1.0_1000001F", utf16("Please review the attached agreement.\0")),
        ]);
        let text = msg_text(&bytes).unwrap();
        assert_eq!(
            text,
            "From: Priya Shah\nTo: Investment Committee\nSubject: Term sheet draft\n\nPlease review the attached agreement."
        );
    }

    #[test]
    fn test_ansi_fallback_and_missing_fields() {
        let bytes = build_msg(&[
            ("/__substg1.0_0C1F001E", b"ops@example.com".to_vec()),
            ("/__substg1.0_0037001E", b"Weekly numbers\0".to_vec()),
        ]);
        let text = msg_text(&bytes).unwrap();
        assert_eq!(text, "From: ops@example.com\nTo: \nSubject: Weekly numbers\n\n");
    }

    #[test]
    fn test_rejects_non_ole_input() {
        assert!(msg_text(b"definitely not a compound file").is_err());
    }
}
