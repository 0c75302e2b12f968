//! File metadata record for an ingested document.

use std::time::Duration;

use sha2::{Digest, Sha256};

use super::round_to;
use crate::models::{FileMetadata, SourceDocument};

/// Processing confidence by method family, matched on the method name prefix.
const METHOD_CONFIDENCE: &[(&str, f64)] = &[
    ("Document AI", 0.95),
    ("DOCX parser", 0.98),
    ("MSG parser", 0.90),
    ("Email parser", 0.85),
    ("Direct text reading", 0.99),
];

const DEFAULT_CONFIDENCE: f64 = 0.80;

const HASH_PREFIX_LEN: usize = 16;

pub fn processing_confidence(method: &str) -> f64 {
    METHOD_CONFIDENCE
        .iter()
        .find(|(family, _)| method.starts_with(family))
        .map(|(_, confidence)| *confidence)
        .unwrap_or(DEFAULT_CONFIDENCE)
}

/// SHA-256 of the extracted text, truncated to 16 hex characters.
pub fn content_hash(text: &str) -> String {
    let digest = hex::encode(Sha256::digest(text.as_bytes()));
    digest[..HASH_PREFIX_LEN].to_string()
}

pub fn generate_metadata(
    document: &SourceDocument,
    size_bytes: u64,
    processing_method: &str,
    elapsed: Duration,
    text: &str,
) -> FileMetadata {
    FileMetadata {
        filename: document.filename.clone(),
        file_extension: format!(".{}", document.format.as_str()),
        file_category: document.format.category().as_str().to_string(),
        file_size_bytes: size_bytes,
        file_size_mb: round_to(size_bytes as f64 / (1024.0 * 1024.0), 2),
        processing_method: processing_method.to_string(),
        processing_time_seconds: round_to(elapsed.as_secs_f64(), 3),
        processing_confidence: processing_confidence(processing_method),
        is_remote: document.is_remote(),
        file_path: document.locator.clone(),
        file_hash: content_hash(text),
        timestamp: chrono::Utc::now().to_rfc3339(),
        supported_operations: document
            .format
            .supported_operations()
            .iter()
            .map(|op| op.to_string())
            .collect(),
        metadata_error: None,
    }
}
