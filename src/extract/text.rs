//! Plain UTF-8 text.

use async_trait::async_trait;

use super::{BackendOutput, ExtractError, ExtractionBackend};
use crate::models::SourceDocument;
use crate::storage::{ContentAccess, ContentSource};

pub const METHOD: &str = "Direct text reading";

pub struct PlainTextExtractor;

#[async_trait]
impl ExtractionBackend for PlainTextExtractor {
    fn method(&self) -> &str {
        METHOD
    }

    fn content_access(&self) -> ContentAccess {
        ContentAccess::InMemory
    }

    async fn extract(
        &self,
        source: &ContentSource,
        _document: &SourceDocument,
    ) -> Result<BackendOutput, ExtractError> {
        let bytes = source.read_bytes().await?;
        let text = String::from_utf8(bytes)
            .map_err(|e| ExtractError::Parse(format!("not valid UTF-8: {}", e)))?;
        Ok(BackendOutput {
            text,
            method: METHOD.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::resolve;

    #[tokio::test]
    async fn test_reads_utf8() {
        let doc = resolve("notes.txt").unwrap();
        let source = ContentSource::Bytes("Résumé notes".as_bytes().to_vec());
        let out = PlainTextExtractor.extract(&source, &doc).await.unwrap();
        assert_eq!(out.text, "Résumé notes");
        assert_eq!(out.method, METHOD);
    }

    #[tokio::test]
    async fn test_rejects_invalid_utf8() {
        let doc = resolve("notes.txt").unwrap();
        let source = ContentSource::Bytes(vec![0xff, 0xfe, 0x41]);
        let err = PlainTextExtractor.extract(&source, &doc).await.unwrap_err();
        assert!(matches!(err, ExtractError::Parse(_)));
    }
}
