//! Conversation-scoped state written by the ingestion pipeline.

use serde::Serialize;

use super::analysis::{ContentAnalysis, FileMetadata, KeyInformation, QualityMetrics};

/// Separator placed between documents in the cumulative text.
pub const DOCUMENT_SEPARATOR: &str = "\n\n\n\n\n";

/// Typed session record shared with downstream agents.
///
/// Only the ingestion pipeline writes to it; everything else reads. Text from
/// successive documents accumulates in `cumulative_text`, while the
/// per-document fields always describe the most recent successful ingest.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionContext {
    cumulative_text: Option<String>,
    file_path: Option<String>,
    file_type: Option<String>,
    processing_method: Option<String>,
    document_analysis: Option<ContentAnalysis>,
    file_metadata: Option<FileMetadata>,
    content_analysis: Option<KeyInformation>,
    quality_metrics: Option<QualityMetrics>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a document's text, separated from earlier documents.
    pub fn append_text(&mut self, text: &str) {
        match self.cumulative_text.as_mut() {
            Some(existing) => {
                existing.push_str(DOCUMENT_SEPARATOR);
                existing.push_str(text);
            }
            None => self.cumulative_text = Some(text.to_string()),
        }
    }

    pub fn cumulative_text(&self) -> Option<&str> {
        self.cumulative_text.as_deref()
    }

    pub fn set_source(&mut self, file_path: &str, file_type: &str, processing_method: &str) {
        self.file_path = Some(file_path.to_string());
        self.file_type = Some(file_type.to_string());
        self.processing_method = Some(processing_method.to_string());
    }

    pub fn set_document_analysis(&mut self, analysis: ContentAnalysis) {
        self.document_analysis = Some(analysis);
    }

    pub fn set_file_metadata(&mut self, metadata: FileMetadata) {
        self.file_metadata = Some(metadata);
    }

    pub fn set_content_analysis(&mut self, key_information: KeyInformation) {
        self.content_analysis = Some(key_information);
    }

    pub fn set_quality_metrics(&mut self, metrics: QualityMetrics) {
        self.quality_metrics = Some(metrics);
    }

    pub fn file_path(&self) -> Option<&str> {
        self.file_path.as_deref()
    }

    pub fn file_type(&self) -> Option<&str> {
        self.file_type.as_deref()
    }

    pub fn processing_method(&self) -> Option<&str> {
        self.processing_method.as_deref()
    }

    pub fn document_analysis(&self) -> Option<&ContentAnalysis> {
        self.document_analysis.as_ref()
    }

    pub fn file_metadata(&self) -> Option<&FileMetadata> {
        self.file_metadata.as_ref()
    }

    pub fn content_analysis(&self) -> Option<&KeyInformation> {
        self.content_analysis.as_ref()
    }

    pub fn quality_metrics(&self) -> Option<&QualityMetrics> {
        self.quality_metrics.as_ref()
    }
}
