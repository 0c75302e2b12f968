//! Per-document results handed back to callers.

use serde::Serialize;

use super::analysis::{ContentAnalysis, FileMetadata, KeyInformation, QualityMetrics};
use crate::error::{ErrorKind, IngestError};
use crate::models::DocumentFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionOutcome {
    Success,
    Failure,
}

/// What one backend invocation produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub text: String,
    /// Processing-method name of the backend that ran.
    pub backend: String,
    pub processing_time_ms: u64,
    pub outcome: ExtractionOutcome,
}

impl ExtractionResult {
    pub fn success(text: String, backend: String, processing_time_ms: u64) -> Self {
        Self {
            text,
            backend,
            processing_time_ms,
            outcome: ExtractionOutcome::Success,
        }
    }

    pub fn failure(backend: String, processing_time_ms: u64) -> Self {
        Self {
            text: String::new(),
            backend,
            processing_time_ms,
            outcome: ExtractionOutcome::Failure,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestStatus {
    Success,
    Failure,
}

/// Combined outcome of ingesting one document.
///
/// Success carries the text and all four analysis records; failure carries
/// the error message and its taxonomy kind and never any text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub status: IngestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_analysis: Option<ContentAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_metadata: Option<FileMetadata>,
    /// Key information, named for the downstream consumers that read it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_analysis: Option<KeyInformation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_metrics: Option<QualityMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_formats: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Backend run record; not part of the serialized contract.
    #[serde(skip)]
    pub extraction: Option<ExtractionResult>,
}

impl AggregateResult {
    pub fn success(
        extraction: ExtractionResult,
        document_analysis: ContentAnalysis,
        file_metadata: FileMetadata,
        key_information: KeyInformation,
        quality_metrics: QualityMetrics,
    ) -> Self {
        Self {
            status: IngestStatus::Success,
            extracted_text: Some(extraction.text.clone()),
            document_analysis: Some(document_analysis),
            file_metadata: Some(file_metadata),
            content_analysis: Some(key_information),
            quality_metrics: Some(quality_metrics),
            error: None,
            error_type: None,
            supported_formats: None,
            timestamp: None,
            extraction: Some(extraction),
        }
    }

    pub fn failure(error: &IngestError, extraction: Option<ExtractionResult>) -> Self {
        let supported_formats = matches!(error, IngestError::UnsupportedFormat { .. })
            .then(DocumentFormat::supported_extensions);
        Self {
            status: IngestStatus::Failure,
            extracted_text: None,
            document_analysis: None,
            file_metadata: None,
            content_analysis: None,
            quality_metrics: None,
            error: Some(error.to_string()),
            error_type: Some(error.kind()),
            supported_formats,
            timestamp: Some(chrono::Utc::now().to_rfc3339()),
            extraction,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == IngestStatus::Success
    }
}
