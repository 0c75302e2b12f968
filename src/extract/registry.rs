//! Static table from document format to extraction backend.

use std::collections::HashMap;
use std::sync::Arc;

use super::{
    DocxExtractor, EmailExtractor, ExtractionBackend, MsgExtractor, OcrExtractor, OcrVariant,
    PlainTextExtractor,
};
use crate::models::DocumentFormat;
use crate::ocr::AdaptiveOcrExecutor;

/// Backend lookup keyed by format.
#[derive(Clone, Default)]
pub struct BackendRegistry {
    backends: HashMap<DocumentFormat, Arc<dyn ExtractionBackend>>,
}

impl BackendRegistry {
    /// A registry with nothing registered.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The production table: OCR for PDF/TIFF and images, parsers for the rest.
    pub fn standard(executor: Arc<AdaptiveOcrExecutor>) -> Self {
        let documents: Arc<dyn ExtractionBackend> =
            Arc::new(OcrExtractor::new(executor.clone(), OcrVariant::Document));
        let images: Arc<dyn ExtractionBackend> =
            Arc::new(OcrExtractor::new(executor, OcrVariant::Image));

        Self::empty()
            .with_backend(DocumentFormat::Pdf, documents.clone())
            .with_backend(DocumentFormat::Tiff, documents)
            .with_backend(DocumentFormat::Png, images.clone())
            .with_backend(DocumentFormat::Jpg, images.clone())
            .with_backend(DocumentFormat::Jpeg, images)
            .with_backend(DocumentFormat::Docx, Arc::new(DocxExtractor))
            .with_backend(DocumentFormat::Eml, Arc::new(EmailExtractor))
            .with_backend(DocumentFormat::Msg, Arc::new(MsgExtractor))
            .with_backend(DocumentFormat::Txt, Arc::new(PlainTextExtractor))
    }

    /// Register (or replace) the backend for a format.
    pub fn with_backend(mut self, format: DocumentFormat, backend: Arc<dyn ExtractionBackend>) -> Self {
        self.backends.insert(format, backend);
        self
    }

    pub fn get(&self, format: DocumentFormat) -> Option<Arc<dyn ExtractionBackend>> {
        self.backends.get(&format).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::{
        BatchOperation, BatchRequest, BatchSettings, OcrError, OcrInput, OcrService,
        OperationStatus,
    };
    use crate::storage::{ContentAccess, MemoryStore};
    use async_trait::async_trait;
    use std::time::Duration;

    struct NullService;

    #[async_trait]
    impl OcrService for NullService {
        fn name(&self) -> &str {
            "null"
        }
        async fn process(&self, _input: OcrInput) -> Result<String, OcrError> {
            Ok(String::new())
        }
        async fn batch_process(&self, _r: &BatchRequest) -> Result<BatchOperation, OcrError> {
            Err(OcrError::Request("unused".to_string()))
        }
        async fn operation_status(&self, _o: &BatchOperation) -> Result<OperationStatus, OcrError> {
            Ok(OperationStatus::Done)
        }
    }

    #[test]
    fn test_standard_covers_every_format() {
        let executor = Arc::new(AdaptiveOcrExecutor::new(
            Arc::new(NullService),
            Arc::new(MemoryStore::new()),
            BatchSettings {
                bucket: None,
                poll_interval: Duration::from_secs(1),
                timeout: Duration::from_secs(1),
            },
        ));
        let registry = BackendRegistry::standard(executor);

        for format in DocumentFormat::ALL {
            assert!(registry.get(format).is_some(), "missing backend for {}", format);
        }
        assert_eq!(
            registry.get(DocumentFormat::Pdf).unwrap().content_access(),
            ContentAccess::RemoteReference
        );
        assert_eq!(
            registry.get(DocumentFormat::Png).unwrap().content_access(),
            ContentAccess::LocalFile
        );
        assert_eq!(
            registry.get(DocumentFormat::Txt).unwrap().content_access(),
            ContentAccess::InMemory
        );
    }

    #[test]
    fn test_empty_registry() {
        assert!(BackendRegistry::empty().get(DocumentFormat::Txt).is_none());
    }
}
