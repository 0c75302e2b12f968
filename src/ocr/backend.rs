//! OCR service abstraction.
//!
//! The adaptive executor only needs three operations from a service: one
//! synchronous call, one batch submission and an operation status check.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::ObjectUri;
use crate::storage::StorageError;

/// Errors from OCR services and the adaptive executor.
#[derive(Debug, Error)]
pub enum OcrError {
    /// The synchronous endpoint refused the document for size or page count.
    #[error("Document exceeds synchronous processing limits: {0}")]
    CapacityExceeded(String),

    #[error("OCR service not configured: {0}")]
    NotConfigured(String),

    #[error("OCR request failed: {0}")]
    Request(String),

    #[error("Batch OCR operation failed: {0}")]
    BatchFailed(String),

    #[error("Batch OCR did not finish within {seconds}s")]
    BatchTimeout { seconds: u64 },

    #[error("Storage error during OCR: {0}")]
    Storage(#[from] StorageError),
}

/// Content submitted to the synchronous endpoint.
#[derive(Debug, Clone)]
pub enum OcrInput {
    /// Inline bytes, sent base64-encoded.
    Raw { content: Vec<u8>, mime_type: String },
    /// An object the service reads itself.
    Stored { uri: ObjectUri, mime_type: String },
}

impl OcrInput {
    pub fn mime_type(&self) -> &str {
        match self {
            OcrInput::Raw { mime_type, .. } | OcrInput::Stored { mime_type, .. } => mime_type,
        }
    }
}

/// An asynchronous job: one stored input, results under an output prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    pub input: ObjectUri,
    pub mime_type: String,
    /// Bucket + prefix (trailing slash) where result JSON lands.
    pub output: ObjectUri,
}

/// Handle to a submitted batch job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOperation {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationStatus {
    Running,
    Done,
    Failed(String),
}

/// A document OCR service with synchronous and batch modes.
#[async_trait]
pub trait OcrService: Send + Sync {
    /// Short service name for logs.
    fn name(&self) -> &str;

    /// Process a document synchronously and return its text.
    async fn process(&self, input: OcrInput) -> Result<String, OcrError>;

    /// Submit a batch job.
    async fn batch_process(&self, request: &BatchRequest) -> Result<BatchOperation, OcrError>;

    /// Current state of a batch job.
    async fn operation_status(&self, operation: &BatchOperation)
        -> Result<OperationStatus, OcrError>;
}
