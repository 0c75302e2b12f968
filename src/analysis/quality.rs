//! Text quality scoring for extracted content.

use std::sync::LazyLock;

use regex::Regex;

use super::round_to;
use crate::config::QualityThresholds;
use crate::models::{Integrity, QualityMetrics};

static SPECIAL_CHAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());
static SPLIT_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z]{1,2}\s+[A-Za-z]{1,2}\b").unwrap());
static SPLIT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{1,3}\s+\d{1,3}\b").unwrap());
static NON_ASCII: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\x00-\x7F]").unwrap());

const WHITESPACE_PENALTY: u32 = 20;
const SPECIAL_CHAR_PENALTY: u32 = 15;
const LINE_BREAK_PENALTY: u32 = 10;
const ARTIFACT_PENALTY: u32 = 5;

/// Scores text against configurable ratio thresholds.
#[derive(Debug, Clone, Default)]
pub struct QualityScorer {
    thresholds: QualityThresholds,
}

impl QualityScorer {
    pub fn new(thresholds: QualityThresholds) -> Self {
        Self { thresholds }
    }

    pub fn score(&self, text: &str) -> QualityMetrics {
        if text.trim().is_empty() {
            return QualityMetrics::empty();
        }

        let total = text.chars().count();
        let whitespace = text
            .chars()
            .filter(|c| matches!(c, ' ' | '\t' | '\n'))
            .count();
        let line_breaks = text.chars().filter(|c| *c == '\n').count();
        let special = SPECIAL_CHAR.find_iter(text).count();

        let mut issues = Vec::new();
        if SPLIT_WORD.is_match(text) {
            issues.push("Possible word splitting".to_string());
        }
        if SPLIT_NUMBER.is_match(text) {
            issues.push("Possible number splitting".to_string());
        }
        let non_ascii = NON_ASCII.is_match(text);
        if non_ascii {
            issues.push("Non-ASCII characters detected".to_string());
        }

        let whitespace_ratio = whitespace as f64 / total as f64;
        let special_ratio = special as f64 / total as f64;
        let line_break_ratio = line_breaks as f64 / total as f64;

        let mut deductions = ARTIFACT_PENALTY * issues.len() as u32;
        if whitespace_ratio > self.thresholds.whitespace_ratio {
            deductions += WHITESPACE_PENALTY;
        }
        if special_ratio > self.thresholds.special_char_ratio {
            deductions += SPECIAL_CHAR_PENALTY;
        }
        if line_break_ratio > self.thresholds.line_break_ratio {
            deductions += LINE_BREAK_PENALTY;
        }
        let score = 100u32.saturating_sub(deductions);

        QualityMetrics {
            quality_score: score,
            ocr_confidence: round_to(score as f64 / 100.0, 3),
            encoding_issues: u32::from(non_ascii),
            special_characters_ratio: round_to(special_ratio, 3),
            whitespace_ratio: round_to(whitespace_ratio, 3),
            line_breaks_ratio: round_to(line_break_ratio, 3),
            issues,
            integrity: Integrity::from_score(score),
            total_characters: total,
            readable_characters: total - special,
            analysis_error: None,
        }
    }
}
