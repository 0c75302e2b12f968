//! Text analytics run on extracted text.
//!
//! Every analyzer is a pure function of its inputs. The pipeline runs each
//! one through [`guarded`] so a panic degrades that record instead of
//! discarding the extracted text.

mod content;
mod key_info;
mod metadata;
mod quality;
mod terms;

use std::panic::{self, AssertUnwindSafe};

use tracing::error;

use crate::error::ErrorKind;

pub use content::{analyze_content, classify_document, detect_language, readability};
pub use key_info::{document_title, extract_key_information};
pub use metadata::{content_hash, generate_metadata, processing_confidence};
pub use quality::QualityScorer;
pub use terms::TermSet;

/// Run an analyzer, converting a panic into the degraded record `degrade`
/// builds from the error text (`AnalysisError: <panic message>`).
pub fn guarded<T>(name: &str, run: impl FnOnce() -> T, degrade: impl FnOnce(String) -> T) -> T {
    match panic::catch_unwind(AssertUnwindSafe(run)) {
        Ok(value) => value,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "analyzer panicked".to_string());
            error!("Error in {}: {}", name, message);
            degrade(format!("{}: {}", ErrorKind::AnalysisError, message))
        }
    }
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Character offset of a byte index into `text`.
pub(crate) fn char_offset(text: &str, byte_idx: usize) -> usize {
    text[..byte_idx].chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QualityMetrics;

    #[test]
    fn test_guarded_passes_through_values() {
        let metrics = guarded(
            "quality scoring",
            || QualityScorer::default().score("fine text here"),
            QualityMetrics::degraded,
        );
        assert!(metrics.analysis_error.is_none());
    }

    #[test]
    fn test_guarded_degrades_on_panic() {
        let metrics = guarded(
            "quality scoring",
            || -> QualityMetrics { panic!("scorer exploded") },
            QualityMetrics::degraded,
        );
        assert_eq!(metrics.analysis_error.as_deref(), Some("AnalysisError: scorer exploded"));
        assert_eq!(metrics.issues, vec!["Analysis error"]);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.123456, 3), 0.123);
        assert_eq!(round_to(2.005, 0), 2.0);
    }
}
