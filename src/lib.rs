//! docingest - document ingestion and content analysis.
//!
//! Accepts a local path or object-storage locator, extracts text with the
//! backend for its format (Document AI OCR with batch fallback, OOXML, email
//! and Outlook parsers, plain text) and derives content, quality, key
//! information and metadata records from the text.

pub mod analysis;
pub mod config;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod locator;
pub mod models;
pub mod ocr;
pub mod storage;

pub use config::Config;
pub use error::{ErrorKind, IngestError};
pub use ingest::Ingestor;
pub use models::{AggregateResult, SessionContext};
