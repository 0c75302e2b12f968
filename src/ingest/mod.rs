//! Document ingestion service.
//!
//! Resolves a locator, runs the matching extraction backend, feeds the text
//! through the analyzers and folds everything into one `AggregateResult`.
//! Ingestion never returns an error: failures come back as a failure record.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::analysis::{
    analyze_content, extract_key_information, generate_metadata, guarded, round_to,
    QualityScorer,
};
use crate::config::{Config, QualityThresholds};
use crate::error::IngestError;
use crate::extract::{BackendRegistry, ExtractError};
use crate::models::{
    AggregateResult, ContentAnalysis, ExtractionResult, FileMetadata, KeyInformation,
    QualityMetrics, SessionContext, SourceDocument,
};
use crate::ocr::{AdaptiveOcrExecutor, BatchSettings, DocumentAiClient, OcrError};
use crate::storage::{GcsStore, ObjectStore, RemoteFetcher};

/// Suffix added to the processing method of documents read from object storage.
pub const REMOTE_METHOD_SUFFIX: &str = " (from object storage)";

/// Text and bookkeeping from a successful extraction.
struct Extracted {
    document: SourceDocument,
    size_bytes: u64,
    elapsed: Duration,
    result: ExtractionResult,
}

/// Why a document produced no text, plus the backend run if there was one.
struct Failed {
    error: IngestError,
    extraction: Option<ExtractionResult>,
}

impl From<IngestError> for Failed {
    fn from(error: IngestError) -> Self {
        Self {
            error,
            extraction: None,
        }
    }
}

/// Service that ingests documents into a session.
pub struct Ingestor {
    registry: BackendRegistry,
    fetcher: RemoteFetcher,
    scorer: QualityScorer,
}

impl Ingestor {
    pub fn new(
        registry: BackendRegistry,
        fetcher: RemoteFetcher,
        thresholds: QualityThresholds,
    ) -> Self {
        Self {
            registry,
            fetcher,
            scorer: QualityScorer::new(thresholds),
        }
    }

    /// Production wiring: Cloud Storage, Document AI and the standard backends.
    pub fn from_config(config: &Config) -> Self {
        let store: Arc<dyn ObjectStore> = Arc::new(GcsStore::new(
            &config.storage,
            config.document_ai.project_id.clone(),
            config.access_token.clone(),
        ));
        let service = DocumentAiClient::from_config(config);
        if !service.is_configured() {
            debug!("Document AI is not configured; OCR formats will fail");
        }

        let executor = Arc::new(AdaptiveOcrExecutor::new(
            Arc::new(service),
            store.clone(),
            BatchSettings {
                bucket: config.batch_bucket(),
                poll_interval: config.poll_interval(),
                timeout: config.batch_timeout(),
            },
        ));

        Self::new(
            BackendRegistry::standard(executor),
            RemoteFetcher::new(store, config.storage.scratch_dir()),
            config.quality,
        )
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    /// Ingest one document.
    ///
    /// On success the extracted text is appended to `session` and the four
    /// analysis records replace the session's previous ones. On failure the
    /// session is left untouched.
    pub async fn ingest(&self, locator: &str, session: &mut SessionContext) -> AggregateResult {
        info!("Ingesting {}", locator);

        let extracted = match self.extract(locator).await {
            Ok(extracted) => extracted,
            Err(failed) => {
                warn!("Ingestion of {} failed: {}", locator, failed.error);
                return AggregateResult::failure(&failed.error, failed.extraction);
            }
        };

        let result = self.analyze(extracted);

        if let (Some(text), Some(metadata)) = (&result.extracted_text, &result.file_metadata) {
            session.append_text(text);
            session.set_source(
                &metadata.file_path,
                &metadata.file_extension,
                &metadata.processing_method,
            );
        }
        if let Some(analysis) = &result.document_analysis {
            session.set_document_analysis(analysis.clone());
        }
        if let Some(metadata) = &result.file_metadata {
            session.set_file_metadata(metadata.clone());
        }
        if let Some(key_info) = &result.content_analysis {
            session.set_content_analysis(key_info.clone());
        }
        if let Some(metrics) = &result.quality_metrics {
            session.set_quality_metrics(metrics.clone());
        }

        info!(
            "Ingested {} ({} chars)",
            locator,
            result.extracted_text.as_deref().map(str::len).unwrap_or(0)
        );
        result
    }

    async fn extract(&self, locator: &str) -> Result<Extracted, Failed> {
        let document = crate::locator::resolve(locator)?;

        let backend = self.registry.get(document.format).ok_or_else(|| {
            IngestError::UnsupportedFormat {
                extension: format!(".{}", document.format.as_str()),
            }
        })?;

        let size_bytes = match self.fetcher.size(&document).await {
            Ok(size) => size,
            Err(e) if document.is_remote() => {
                return Err(IngestError::RemoteFetchFailure {
                    uri: document.locator.clone(),
                    reason: e.to_string(),
                }
                .into())
            }
            Err(e) => {
                warn!("Could not stat {}: {}", document.locator, e);
                0
            }
        };

        let source = self
            .fetcher
            .acquire(&document, backend.content_access())
            .await
            .map_err(|e| IngestError::RemoteFetchFailure {
                uri: document.locator.clone(),
                reason: e.to_string(),
            })?;

        debug!("Extracting {} with {}", document.filename, backend.method());
        let started = Instant::now();
        let output = backend.extract(&source, &document).await;
        let elapsed = started.elapsed();
        // Releases any scratch copy before analysis starts.
        drop(source);

        let elapsed_ms = elapsed.as_millis() as u64;
        let output = match output {
            Ok(output) => output,
            Err(e) => {
                let error = match e {
                    ExtractError::Ocr(OcrError::BatchTimeout { seconds }) => {
                        IngestError::BatchTimeout { seconds }
                    }
                    other => IngestError::BackendFailure {
                        backend: backend.method().to_string(),
                        reason: other.to_string(),
                    },
                };
                return Err(Failed {
                    error,
                    extraction: Some(ExtractionResult::failure(
                        backend.method().to_string(),
                        elapsed_ms,
                    )),
                });
            }
        };

        let mut method = output.method;
        if document.is_remote() {
            method.push_str(REMOTE_METHOD_SUFFIX);
        }

        Ok(Extracted {
            document,
            size_bytes,
            elapsed,
            result: ExtractionResult::success(output.text, method, elapsed_ms),
        })
    }

    fn analyze(&self, extracted: Extracted) -> AggregateResult {
        let Extracted {
            document,
            size_bytes,
            elapsed,
            result,
        } = extracted;
        let text = result.text.as_str();
        let method = result.backend.as_str();

        let content = guarded(
            "document content analysis",
            || analyze_content(text, &document.filename),
            |e| ContentAnalysis {
                content_length: text.chars().count(),
                analysis_error: Some(e),
                ..ContentAnalysis::default()
            },
        );
        let quality = guarded(
            "content quality analysis",
            || self.scorer.score(text),
            QualityMetrics::degraded,
        );
        let key_info = guarded(
            "key information extraction",
            || extract_key_information(text, document.format, &document.filename),
            |e| KeyInformation {
                summary: "Error in information extraction".to_string(),
                extraction_error: Some(e),
                ..KeyInformation::default()
            },
        );
        let metadata = guarded(
            "file metadata generation",
            || generate_metadata(&document, size_bytes, method, elapsed, text),
            |e| degraded_metadata(&document, size_bytes, method, elapsed, e),
        );

        AggregateResult::success(result, content, metadata, key_info, quality)
    }
}

fn degraded_metadata(
    document: &SourceDocument,
    size_bytes: u64,
    method: &str,
    elapsed: Duration,
    error: String,
) -> FileMetadata {
    FileMetadata {
        filename: document.filename.clone(),
        file_extension: format!(".{}", document.format.as_str()),
        file_category: String::new(),
        file_size_bytes: size_bytes,
        file_size_mb: round_to(size_bytes as f64 / (1024.0 * 1024.0), 2),
        processing_method: method.to_string(),
        processing_time_seconds: round_to(elapsed.as_secs_f64(), 3),
        processing_confidence: 0.0,
        is_remote: document.is_remote(),
        file_path: document.locator.clone(),
        file_hash: String::new(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        supported_operations: Vec::new(),
        metadata_error: Some(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::extract::{BackendOutput, ExtractionBackend, PlainTextExtractor};
    use crate::models::{DocumentFormat, IngestStatus, ObjectUri, DOCUMENT_SEPARATOR};
    use crate::storage::{ContentAccess, ContentSource, MemoryStore};
    use async_trait::async_trait;

    struct FailingBackend;

    #[async_trait]
    impl ExtractionBackend for FailingBackend {
        fn method(&self) -> &str {
            "DOCX parser"
        }

        fn content_access(&self) -> ContentAccess {
            ContentAccess::LocalFile
        }

        async fn extract(
            &self,
            _source: &ContentSource,
            _document: &SourceDocument,
        ) -> Result<BackendOutput, ExtractError> {
            Err(ExtractError::Parse("corrupt archive".to_string()))
        }
    }

    fn ingestor(store: Arc<MemoryStore>) -> Ingestor {
        let registry = BackendRegistry::empty()
            .with_backend(DocumentFormat::Txt, Arc::new(PlainTextExtractor))
            .with_backend(DocumentFormat::Docx, Arc::new(FailingBackend));
        Ingestor::new(
            registry,
            RemoteFetcher::new(store, None),
            QualityThresholds::default(),
        )
    }

    #[tokio::test]
    async fn test_local_text_fills_session() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("notes.txt");
        let second = dir.path().join("more.txt");
        std::fs::write(&first, "Executive summary of the plan.").unwrap();
        std::fs::write(&second, "Second document.").unwrap();

        let ingestor = ingestor(Arc::new(MemoryStore::new()));
        let mut session = SessionContext::new();

        let result = ingestor
            .ingest(first.to_str().unwrap(), &mut session)
            .await;
        assert_eq!(result.status, IngestStatus::Success);
        assert_eq!(
            result.extracted_text.as_deref(),
            Some("Executive summary of the plan.")
        );
        let metadata = result.file_metadata.as_ref().unwrap();
        assert_eq!(metadata.processing_method, "Direct text reading");
        assert_eq!(metadata.file_size_bytes, 30);
        assert!(!metadata.is_remote);

        ingestor
            .ingest(second.to_str().unwrap(), &mut session)
            .await;
        assert_eq!(
            session.cumulative_text(),
            Some(format!("Executive summary of the plan.{}Second document.", DOCUMENT_SEPARATOR).as_str())
        );
        assert_eq!(session.file_type(), Some(".txt"));
        assert_eq!(session.file_path(), second.to_str());
    }

    #[tokio::test]
    async fn test_remote_text_marks_method() {
        let store = Arc::new(MemoryStore::new());
        store.insert(&ObjectUri::new("inbox", "memo.txt"), b"Remote memo body".to_vec());
        let mut session = SessionContext::new();

        let result = ingestor(store)
            .ingest("https://storage.googleapis.com/inbox/memo.txt", &mut session)
            .await;
        let metadata = result.file_metadata.unwrap();
        assert_eq!(metadata.processing_method, "Direct text reading (from object storage)");
        assert!(metadata.is_remote);
        assert_eq!(metadata.file_size_bytes, 16);
        assert_eq!(session.processing_method(), Some(metadata.processing_method.as_str()));
    }

    #[tokio::test]
    async fn test_missing_remote_object_is_fetch_failure() {
        let mut session = SessionContext::new();
        let result = ingestor(Arc::new(MemoryStore::new()))
            .ingest("gs://inbox/missing.txt", &mut session)
            .await;
        assert_eq!(result.status, IngestStatus::Failure);
        assert_eq!(result.error_type, Some(ErrorKind::RemoteFetchFailure));
        assert!(result.extraction.is_none());
        assert!(session.cumulative_text().is_none());
    }

    #[tokio::test]
    async fn test_backend_failure_keeps_session_clean() {
        let store = Arc::new(MemoryStore::new());
        store.insert(&ObjectUri::new("inbox", "plan.docx"), b"PK-not-really".to_vec());
        let mut session = SessionContext::new();

        let result = ingestor(store)
            .ingest("gs://inbox/plan.docx", &mut session)
            .await;
        assert_eq!(result.error_type, Some(ErrorKind::BackendFailure));
        assert!(result.error.as_deref().unwrap().contains("corrupt archive"));
        assert!(result.extracted_text.is_none());
        let extraction = result.extraction.unwrap();
        assert_eq!(extraction.outcome, crate::models::ExtractionOutcome::Failure);
        assert!(session.cumulative_text().is_none());
        assert!(session.file_metadata().is_none());
    }

    #[test]
    fn test_degraded_metadata_rounds_like_generated() {
        let doc = crate::locator::resolve("gs://inbox/plan.docx").unwrap();
        let meta = degraded_metadata(
            &doc,
            3 * 1024 * 1024 / 2,
            "DOCX parser (from object storage)",
            Duration::from_micros(1_234_567),
            "AnalysisError: boom".to_string(),
        );
        assert_eq!(meta.processing_time_seconds, 1.235);
        assert_eq!(meta.file_size_mb, 1.5);
        assert!(meta.is_remote);
        assert_eq!(meta.metadata_error.as_deref(), Some("AnalysisError: boom"));
    }

    #[tokio::test]
    async fn test_unregistered_format_is_unsupported() {
        let mut session = SessionContext::new();
        let result = ingestor(Arc::new(MemoryStore::new()))
            .ingest("/tmp/scan.png", &mut session)
            .await;
        assert_eq!(result.error_type, Some(ErrorKind::UnsupportedFormat));
        assert_eq!(result.supported_formats.map(|f| f.len()), Some(9));
    }
}
