//! Cloud OCR: service abstraction, Document AI client and the adaptive
//! sync/batch executor.

mod adaptive;
mod backend;
mod document_ai;

pub use adaptive::{
    AdaptiveOcrExecutor, BatchSettings, ExecutorState, OcrContent, OcrJob, OcrMode, OcrOutcome,
};
pub use backend::{BatchOperation, BatchRequest, OcrError, OcrInput, OcrService, OperationStatus};
pub use document_ai::{classify_failure, DocumentAiClient};
