//! Records produced by the analyzers and the metadata generator.

use serde::{Serialize, Serializer};

/// Dominant language guessed from stop-word votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Spanish,
    French,
    #[default]
    Unknown,
}

/// Closed set of document types the classifier can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    PitchDeck,
    BusinessPlan,
    FinancialDocument,
    LegalDocument,
    Resume,
    Email,
    Invoice,
    Report,
    GeneralDocument,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::PitchDeck => "pitch_deck",
            DocumentType::BusinessPlan => "business_plan",
            DocumentType::FinancialDocument => "financial_document",
            DocumentType::LegalDocument => "legal_document",
            DocumentType::Resume => "resume",
            DocumentType::Email => "email",
            DocumentType::Invoice => "invoice",
            DocumentType::Report => "report",
            DocumentType::GeneralDocument => "general_document",
        }
    }
}

/// Topical tags attached to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentCategory {
    Financial,
    MarketAnalysis,
    Product,
    Team,
    Funding,
    Technology,
    Legal,
    General,
}

/// Dominant layout style, judged from header, bullet and numbering counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureType {
    FormalDocument,
    BulletPointFormat,
    NumberedList,
    SemiStructured,
    #[default]
    Unstructured,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StructureAnalysis {
    pub headers_count: usize,
    pub bullet_points_count: usize,
    pub numbered_lists_count: usize,
    pub table_lines_count: usize,
    pub sections_count: usize,
    pub has_structure: bool,
    pub structure_type: StructureType,
}

/// A recognised section heading and where it starts (character offset).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeySection {
    pub title: String,
    pub position: usize,
    #[serde(rename = "type")]
    pub section_type: String,
}

/// Output of the content analyzer.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ContentAnalysis {
    pub content_length: usize,
    pub word_count: usize,
    pub sentence_count: usize,
    pub paragraph_count: usize,
    pub language: Language,
    /// `None` only for empty input or a degraded analysis.
    #[serde(serialize_with = "type_or_unknown")]
    pub document_type: Option<DocumentType>,
    #[serde(rename = "structure_analysis")]
    pub structure: StructureAnalysis,
    pub content_categories: Vec<ContentCategory>,
    pub key_sections: Vec<KeySection>,
    pub readability_score: f64,
    pub average_words_per_sentence: f64,
    pub average_sentences_per_paragraph: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_error: Option<String>,
}

fn type_or_unknown<S: Serializer>(
    value: &Option<DocumentType>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.map(|t| t.as_str()).unwrap_or("unknown"))
}

/// Ordinal quality band derived from the quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Integrity {
    Unknown,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl Integrity {
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => Integrity::Excellent,
            75..=89 => Integrity::Good,
            60..=74 => Integrity::Fair,
            _ => Integrity::Poor,
        }
    }
}

/// Output of the quality scorer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityMetrics {
    #[serde(rename = "text_quality_score")]
    pub quality_score: u32,
    /// Quality score rescaled to 0..=1.
    pub ocr_confidence: f64,
    pub encoding_issues: u32,
    pub special_characters_ratio: f64,
    pub whitespace_ratio: f64,
    pub line_breaks_ratio: f64,
    #[serde(rename = "quality_issues")]
    pub issues: Vec<String>,
    #[serde(rename = "text_integrity")]
    pub integrity: Integrity,
    pub total_characters: usize,
    pub readable_characters: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_error: Option<String>,
}

impl QualityMetrics {
    /// Metrics for text with nothing in it.
    pub fn empty() -> Self {
        Self {
            quality_score: 0,
            ocr_confidence: 0.0,
            encoding_issues: 0,
            special_characters_ratio: 0.0,
            whitespace_ratio: 0.0,
            line_breaks_ratio: 0.0,
            issues: vec!["Empty content".to_string()],
            integrity: Integrity::Poor,
            total_characters: 0,
            readable_characters: 0,
            analysis_error: None,
        }
    }

    /// Metrics recorded when the scorer itself failed.
    pub fn degraded(error: String) -> Self {
        Self {
            encoding_issues: 1,
            issues: vec!["Analysis error".to_string()],
            integrity: Integrity::Unknown,
            analysis_error: Some(error),
            ..Self::empty()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FinancialData {
    pub currency_amounts: Vec<String>,
    pub percentages: Vec<String>,
    pub financial_terms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ContactInfo {
    pub emails: Vec<String>,
    pub phone_numbers: Vec<String>,
    pub addresses: Vec<String>,
    pub websites: Vec<String>,
}

/// Output of the key-information extractor.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct KeyInformation {
    #[serde(rename = "document_title")]
    pub title: String,
    #[serde(rename = "key_entities")]
    pub entities: Vec<String>,
    #[serde(rename = "important_numbers")]
    pub numbers: Vec<String>,
    pub dates: Vec<String>,
    #[serde(rename = "email_addresses")]
    pub emails: Vec<String>,
    pub urls: Vec<String>,
    #[serde(rename = "phone_numbers")]
    pub phones: Vec<String>,
    pub financial_data: FinancialData,
    #[serde(rename = "contact_information")]
    pub contact_info: ContactInfo,
    pub business_terms: Vec<String>,
    pub summary: String,
    pub extraction_confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_error: Option<String>,
}

/// Descriptive metadata about the ingested file and how it was processed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileMetadata {
    pub filename: String,
    pub file_extension: String,
    pub file_category: String,
    pub file_size_bytes: u64,
    pub file_size_mb: f64,
    pub processing_method: String,
    pub processing_time_seconds: f64,
    pub processing_confidence: f64,
    pub is_remote: bool,
    pub file_path: String,
    /// Hex digest prefix of the extracted text.
    pub file_hash: String,
    pub timestamp: String,
    pub supported_operations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrity_bands() {
        assert_eq!(Integrity::from_score(100), Integrity::Excellent);
        assert_eq!(Integrity::from_score(90), Integrity::Excellent);
        assert_eq!(Integrity::from_score(89), Integrity::Good);
        assert_eq!(Integrity::from_score(75), Integrity::Good);
        assert_eq!(Integrity::from_score(60), Integrity::Fair);
        assert_eq!(Integrity::from_score(59), Integrity::Poor);
        assert_eq!(Integrity::from_score(0), Integrity::Poor);
    }

    #[test]
    fn test_missing_document_type_serializes_as_unknown() {
        let analysis = ContentAnalysis::default();
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["document_type"], "unknown");
        assert_eq!(json["language"], "unknown");
        assert!(json.get("analysis_error").is_none());
    }

    #[test]
    fn test_degraded_quality_keeps_error() {
        let metrics = QualityMetrics::degraded("boom".to_string());
        assert_eq!(metrics.integrity, Integrity::Unknown);
        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["analysis_error"], "boom");
        assert_eq!(json["text_integrity"], "unknown");
    }
}
