//! Content analysis: counts, language, document type, structure, topics,
//! section headings and readability.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::terms::TermSet;
use super::{char_offset, round_to};
use crate::models::{
    ContentAnalysis, ContentCategory, DocumentType, KeySection, Language, StructureAnalysis,
    StructureType,
};

static SENTENCE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").unwrap());
static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n[ \t]*\n").unwrap());
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{L}+").unwrap());

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*[A-Z][A-Z \t]{2,}$|^\d+\.?[ \t]+[A-Z]").unwrap()
});
static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*[•\-\*][ \t]+").unwrap());
static NUMBERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\d+\.[ \t]+").unwrap());
static TABLE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^.*\S(?:\t|[ ]{3,})\S.*$").unwrap());
static SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[A-Z][A-Za-z \t]{5,}:?$").unwrap());

static SECTION_HEADINGS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"executive\s+summary",
        r"introduction",
        r"problem\s+statement",
        r"solution",
        r"market\s+analysis",
        r"business\s+model",
        r"financial\s+projections?",
        r"team",
        r"funding\s+requirements?",
        r"conclusion",
        r"appendix",
        r"references?",
    ]
    .iter()
    .map(|p| Regex::new(&format!(r"(?i)\b{}\b", p)).unwrap())
    .collect()
});

const ENGLISH: &[&str] = &[
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];
const SPANISH: &[&str] = &[
    "el", "la", "de", "que", "y", "a", "en", "un", "es", "se", "no", "te", "lo", "le",
];
const FRENCH: &[&str] = &[
    "le", "la", "de", "et", "à", "un", "il", "être", "en", "avoir", "que", "pour",
];

/// Text cues, checked in order; the first hit wins.
static TEXT_TYPES: LazyLock<Vec<(DocumentType, TermSet)>> = LazyLock::new(|| {
    vec![
        (
            DocumentType::PitchDeck,
            TermSet::new(&["pitch deck", "investor presentation", "funding deck"]),
        ),
        (
            DocumentType::BusinessPlan,
            TermSet::new(&["business plan", "business proposal", "executive summary"]),
        ),
        (
            DocumentType::FinancialDocument,
            TermSet::new(&[
                "financial statement",
                "income statement",
                "balance sheet",
                "cash flow",
            ]),
        ),
        (
            DocumentType::LegalDocument,
            TermSet::new(&[
                "contract",
                "agreement",
                "terms and conditions",
                "legal document",
            ]),
        ),
        (
            DocumentType::Resume,
            TermSet::new(&["resume", "cv", "curriculum vitae", "personal profile"]),
        ),
        (
            DocumentType::Email,
            TermSet::new(&["email", "message", "correspondence"]),
        ),
    ]
});

/// Filename cues, checked after every text cue.
static FILENAME_TYPES: LazyLock<Vec<(DocumentType, &'static [&'static str])>> =
    LazyLock::new(|| {
        vec![
            (DocumentType::Invoice, &["invoice", "receipt", "bill"][..]),
            (DocumentType::Report, &["report", "analysis", "study"][..]),
        ]
    });

static CATEGORIES: LazyLock<Vec<(ContentCategory, TermSet)>> = LazyLock::new(|| {
    vec![
        (
            ContentCategory::Financial,
            TermSet::new(&["revenue", "profit", "sales", "income", "financial"]),
        ),
        (
            ContentCategory::MarketAnalysis,
            TermSet::new(&["market", "customer", "user", "target", "demographic"]),
        ),
        (
            ContentCategory::Product,
            TermSet::new(&["product", "service", "feature", "development"]),
        ),
        (
            ContentCategory::Team,
            TermSet::new(&["team", "employee", "staff", "founder", "ceo"]),
        ),
        (
            ContentCategory::Funding,
            TermSet::new(&["funding", "investment", "investor", "capital", "raise"]),
        ),
        (
            ContentCategory::Technology,
            TermSet::new(&["technology", "tech", "software", "platform", "app"]),
        ),
        (
            ContentCategory::Legal,
            TermSet::new(&["legal", "contract", "agreement", "terms", "compliance"]),
        ),
    ]
});

/// Analyze extracted text. Pure and deterministic.
pub fn analyze_content(text: &str, filename: &str) -> ContentAnalysis {
    if text.trim().is_empty() {
        return ContentAnalysis::default();
    }

    let word_count = text.split_whitespace().count();
    let sentence_count = sentences(text).count();
    let paragraph_count = PARAGRAPH_BREAK
        .split(text)
        .filter(|p| !p.trim().is_empty())
        .count();

    ContentAnalysis {
        content_length: text.chars().count(),
        word_count,
        sentence_count,
        paragraph_count,
        language: detect_language(text),
        document_type: Some(classify_document(text, filename)),
        structure: analyze_structure(text),
        content_categories: categorize(text),
        key_sections: key_sections(text),
        readability_score: readability(text),
        average_words_per_sentence: round_to(word_count as f64 / sentence_count.max(1) as f64, 2),
        average_sentences_per_paragraph: round_to(
            sentence_count as f64 / paragraph_count.max(1) as f64,
            2,
        ),
        analysis_error: None,
    }
}

fn sentences(text: &str) -> impl Iterator<Item = &str> {
    SENTENCE_BREAK
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Majority vote of distinct stop words; ties and silence are `Unknown`.
pub fn detect_language(text: &str) -> Language {
    let lower = text.to_lowercase();
    let tokens: HashSet<&str> = WORD.find_iter(&lower).map(|m| m.as_str()).collect();
    let votes = |words: &[&str]| words.iter().filter(|w| tokens.contains(*w)).count();

    let english = votes(ENGLISH);
    let spanish = votes(SPANISH);
    let french = votes(FRENCH);

    if english > spanish && english > french {
        Language::English
    } else if spanish > english && spanish > french {
        Language::Spanish
    } else if french > english && french > spanish {
        Language::French
    } else {
        Language::Unknown
    }
}

/// Classify into one of the fixed document types.
pub fn classify_document(text: &str, filename: &str) -> DocumentType {
    if let Some((kind, _)) = TEXT_TYPES.iter().find(|(_, cues)| cues.matches_any(text)) {
        return *kind;
    }

    let filename = filename.to_lowercase();
    FILENAME_TYPES
        .iter()
        .find(|(_, cues)| cues.iter().any(|cue| filename.contains(cue)))
        .map(|(kind, _)| *kind)
        .unwrap_or(DocumentType::GeneralDocument)
}

fn analyze_structure(text: &str) -> StructureAnalysis {
    let headers = HEADER.find_iter(text).count();
    let bullets = BULLET.find_iter(text).count();
    let numbered = NUMBERED.find_iter(text).count();

    let structure_type = if headers > 5 {
        StructureType::FormalDocument
    } else if bullets > 5 {
        StructureType::BulletPointFormat
    } else if numbered > 5 {
        StructureType::NumberedList
    } else if headers > 0 {
        StructureType::SemiStructured
    } else {
        StructureType::Unstructured
    };

    StructureAnalysis {
        headers_count: headers,
        bullet_points_count: bullets,
        numbered_lists_count: numbered,
        table_lines_count: TABLE_LINE.find_iter(text).count(),
        sections_count: SECTION.find_iter(text).count(),
        has_structure: headers > 0 || bullets > 0 || numbered > 0,
        structure_type,
    }
}

fn categorize(text: &str) -> Vec<ContentCategory> {
    let found: Vec<ContentCategory> = CATEGORIES
        .iter()
        .filter(|(_, terms)| terms.matches_any(text))
        .map(|(category, _)| *category)
        .collect();
    if found.is_empty() {
        vec![ContentCategory::General]
    } else {
        found
    }
}

fn key_sections(text: &str) -> Vec<KeySection> {
    SECTION_HEADINGS
        .iter()
        .flat_map(|re| re.find_iter(text))
        .map(|m| KeySection {
            title: m.as_str().trim().to_string(),
            position: char_offset(text, m.start()),
            section_type: "section_header".to_string(),
        })
        .collect()
}

/// `0.5 * words per sentence + 0.3 * characters per word`, two decimals.
pub fn readability(text: &str) -> f64 {
    let words: Vec<&str> = text.split_whitespace().collect();
    let sentence_count = sentences(text).count();
    if words.is_empty() || sentence_count == 0 {
        return 0.0;
    }

    let avg_sentence = words.len() as f64 / sentence_count as f64;
    let avg_word = words.iter().map(|w| w.chars().count()).sum::<usize>() as f64 / words.len() as f64;
    round_to(0.5 * avg_sentence + 0.3 * avg_word, 2)
}
