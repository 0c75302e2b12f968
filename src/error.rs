//! Pipeline error taxonomy.

use serde::Serialize;
use thiserror::Error;

/// Classification reported as `error_type` in failure results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    UnsupportedFormat,
    RemoteFetchFailure,
    BackendFailure,
    BatchTimeout,
    AnalysisError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnsupportedFormat => "UnsupportedFormat",
            ErrorKind::RemoteFetchFailure => "RemoteFetchFailure",
            ErrorKind::BackendFailure => "BackendFailure",
            ErrorKind::BatchTimeout => "BatchTimeout",
            ErrorKind::AnalysisError => "AnalysisError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that abort ingestion of a single document.
///
/// Analyzer failures are not represented here: they degrade the affected
/// record instead of failing the document.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Unsupported file format: '{extension}'")]
    UnsupportedFormat { extension: String },

    #[error("Failed to fetch {uri}: {reason}")]
    RemoteFetchFailure { uri: String, reason: String },

    #[error("{backend} failed: {reason}")]
    BackendFailure { backend: String, reason: String },

    #[error("Batch OCR did not finish within {seconds}s")]
    BatchTimeout { seconds: u64 },
}

impl IngestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IngestError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            IngestError::RemoteFetchFailure { .. } => ErrorKind::RemoteFetchFailure,
            IngestError::BackendFailure { .. } => ErrorKind::BackendFailure,
            IngestError::BatchTimeout { .. } => ErrorKind::BatchTimeout,
        }
    }
}
