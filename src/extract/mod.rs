//! Format-specific text extraction backends and their registry.

mod docx;
mod email;
mod msg;
mod ocr;
mod registry;
mod text;

pub use docx::DocxExtractor;
pub use email::EmailExtractor;
pub use msg::MsgExtractor;
pub use ocr::{OcrExtractor, OcrVariant};
pub use registry::BackendRegistry;
pub use text::PlainTextExtractor;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::SourceDocument;
use crate::ocr::OcrError;
use crate::storage::{ContentAccess, ContentSource};

/// Errors raised by extraction backends.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to read content: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse document: {0}")]
    Parse(String),

    #[error(transparent)]
    Ocr(#[from] OcrError),
}

/// Text produced by a backend plus the method that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendOutput {
    pub text: String,
    pub method: String,
}

/// A text extractor for one family of formats.
#[async_trait]
pub trait ExtractionBackend: Send + Sync {
    /// Processing-method name reported in metadata.
    fn method(&self) -> &str;

    /// How remote content must be delivered to this backend.
    fn content_access(&self) -> ContentAccess;

    async fn extract(
        &self,
        source: &ContentSource,
        document: &SourceDocument,
    ) -> Result<BackendOutput, ExtractError>;
}
