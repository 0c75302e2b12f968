//! OCR-backed extraction for PDF/TIFF documents and raster images.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{BackendOutput, ExtractError, ExtractionBackend};
use crate::models::SourceDocument;
use crate::ocr::{AdaptiveOcrExecutor, OcrContent, OcrJob, OcrMode};
use crate::storage::{ContentAccess, ContentSource};

pub const DOCUMENT_METHOD: &str = "Document AI OCR (PDF/TIFF)";
pub const DOCUMENT_BATCH_METHOD: &str = "Document AI OCR (PDF/TIFF, batch)";
pub const IMAGE_METHOD: &str = "Document AI OCR (Image)";
pub const IMAGE_BATCH_METHOD: &str = "Document AI OCR (Image, batch)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrVariant {
    /// Multi-page formats, read by the service straight from storage.
    Document,
    /// Single images, downloaded and sent inline.
    Image,
}

pub struct OcrExtractor {
    executor: Arc<AdaptiveOcrExecutor>,
    variant: OcrVariant,
}

impl OcrExtractor {
    pub fn new(executor: Arc<AdaptiveOcrExecutor>, variant: OcrVariant) -> Self {
        Self { executor, variant }
    }
}

#[async_trait]
impl ExtractionBackend for OcrExtractor {
    fn method(&self) -> &str {
        match self.variant {
            OcrVariant::Document => DOCUMENT_METHOD,
            OcrVariant::Image => IMAGE_METHOD,
        }
    }

    fn content_access(&self) -> ContentAccess {
        match self.variant {
            OcrVariant::Document => ContentAccess::RemoteReference,
            OcrVariant::Image => ContentAccess::LocalFile,
        }
    }

    async fn extract(
        &self,
        source: &ContentSource,
        document: &SourceDocument,
    ) -> Result<BackendOutput, ExtractError> {
        let content = match source.remote_uri() {
            Some(uri) => OcrContent::Stored(uri.clone()),
            None => OcrContent::Bytes(source.read_bytes().await?),
        };

        let outcome = self
            .executor
            .run(OcrJob {
                content,
                mime_type: document.format.mime_type().to_string(),
                filename: document.filename.clone(),
            })
            .await?;

        debug!(
            "OCR of {} finished via {:?} ({} chars)",
            document.filename,
            outcome.mode,
            outcome.text.len()
        );

        let method = match (self.variant, outcome.mode) {
            (OcrVariant::Document, OcrMode::Sync) => DOCUMENT_METHOD,
            (OcrVariant::Document, OcrMode::Batch) => DOCUMENT_BATCH_METHOD,
            (OcrVariant::Image, OcrMode::Sync) => IMAGE_METHOD,
            (OcrVariant::Image, OcrMode::Batch) => IMAGE_BATCH_METHOD,
        };

        Ok(BackendOutput {
            text: outcome.text,
            method: method.to_string(),
        })
    }
}
