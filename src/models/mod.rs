//! Data models for ingestion inputs, results and session state.

mod analysis;
mod document;
mod result;
mod session;

pub use analysis::{
    ContactInfo, ContentAnalysis, ContentCategory, DocumentType, FileMetadata, FinancialData,
    Integrity, KeyInformation, KeySection, Language, QualityMetrics, StructureAnalysis,
    StructureType,
};
pub use document::{
    DocumentFormat, FileCategory, ObjectUri, SourceDocument, StorageOrigin, GS_SCHEME,
    PUBLIC_STORAGE_PREFIX,
};
pub use result::{AggregateResult, ExtractionOutcome, ExtractionResult, IngestStatus};
pub use session::{SessionContext, DOCUMENT_SEPARATOR};
