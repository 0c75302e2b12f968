//! Key information extraction: title, entities, figures, contacts and a
//! short summary.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::round_to;
use super::terms::TermSet;
use crate::models::{ContactInfo, DocumentFormat, FinancialData, KeyInformation};

const MAX_ENTITIES: usize = 10;
const MAX_NUMBERS: usize = 20;
const TITLE_SCAN_LINES: usize = 10;
const SUMMARY_SENTENCES: usize = 3;
const SUMMARY_MAX_CHARS: usize = 200;
const MINIMAL_CONTENT_CHARS: usize = 100;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap()
});
static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://(?:[a-zA-Z0-9$-_@.&+!*(),]|%[0-9a-fA-F]{2})+").unwrap()
});
static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\+?1[-.\s]?)?\(?([0-9]{3})\)?[-.\s]?([0-9]{3})[-.\s]?([0-9]{4})").unwrap()
});
static DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b|\b\d{4}[/-]\d{1,2}[/-]\d{1,2}\b").unwrap()
});
static CURRENCY: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\$[\d,]+(?:\.\d{2})?",
        r"(?i)USD\s*[\d,]+(?:\.\d{2})?",
        r"(?i)EUR\s*[\d,]+(?:\.\d{2})?",
        r"(?i)GBP\s*[\d,]+(?:\.\d{2})?",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});
static PERCENTAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?%").unwrap());
static CAPITALIZED_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\b").unwrap());
static LARGE_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d{4,}\b").unwrap());
static DECIMAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d+\.\d+\b").unwrap());
static ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\d+[ \t]+[A-Za-z \t]+(?:Street|St|Avenue|Ave|Road|Rd|Drive|Dr|Lane|Ln|Boulevard|Blvd)\b",
    )
    .unwrap()
});
static WEBSITE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:www\.)?[a-zA-Z0-9-]+\.[a-zA-Z]{2,}(?:/\S*)?").unwrap()
});
static SENTENCE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").unwrap());
static HAS_LETTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-zA-Z]").unwrap());

static FINANCIAL_TERMS: LazyLock<TermSet> = LazyLock::new(|| {
    TermSet::exact(&[
        "revenue", "profit", "loss", "income", "expense", "cost", "price", "valuation",
        "investment", "funding", "capital", "equity", "debt", "cash flow", "margin", "growth",
        "ROI", "EBITDA",
    ])
});
static BUSINESS_TERMS: LazyLock<TermSet> = LazyLock::new(|| {
    TermSet::exact(&[
        "startup",
        "company",
        "corporation",
        "LLC",
        "Inc",
        "Ltd",
        "CEO",
        "CTO",
        "CFO",
        "founder",
        "co-founder",
        "president",
        "venture capital",
        "angel investor",
        "seed funding",
        "Series A",
        "IPO",
        "acquisition",
        "merger",
        "partnership",
        "collaboration",
        "market",
        "customer",
        "user",
        "client",
        "revenue model",
        "business model",
        "value proposition",
        "competitive advantage",
    ])
});

const COMMON_WORDS: &[&str] = &[
    "The", "This", "That", "There", "Here", "Where", "When", "How", "What", "Why",
];

/// Extract key information from `text`. Pure and deterministic.
pub fn extract_key_information(
    text: &str,
    format: DocumentFormat,
    filename: &str,
) -> KeyInformation {
    if text.trim().is_empty() {
        return KeyInformation {
            summary: "No content to analyze".to_string(),
            ..KeyInformation::default()
        };
    }

    let emails = distinct(EMAIL.find_iter(text).map(|m| m.as_str()));
    let phones: Vec<String> = PHONE
        .captures_iter(text)
        .map(|caps| {
            caps.iter()
                .skip(1)
                .flatten()
                .map(|m| m.as_str())
                .collect::<String>()
        })
        .collect();

    KeyInformation {
        title: document_title(text, filename),
        entities: key_entities(text),
        numbers: important_numbers(text),
        dates: DATE.find_iter(text).map(|m| m.as_str().to_string()).collect(),
        urls: distinct(URL.find_iter(text).map(|m| m.as_str())),
        financial_data: financial_data(text),
        contact_info: ContactInfo {
            emails: emails.clone(),
            phone_numbers: phones.clone(),
            addresses: ADDRESS
                .find_iter(text)
                .map(|m| m.as_str().trim().to_string())
                .collect(),
            websites: WEBSITE
                .find_iter(text)
                .map(|m| m.as_str().to_string())
                .collect(),
        },
        emails,
        phones,
        business_terms: BUSINESS_TERMS.found_in(text),
        summary: summarize(text),
        extraction_confidence: extraction_confidence(text, format),
        extraction_error: None,
    }
}

fn distinct<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .filter(|item| seen.insert(*item))
        .map(str::to_string)
        .collect()
}

/// First mid-length line among the first few that isn't shouted, else the
/// filename stem.
pub fn document_title(text: &str, filename: &str) -> String {
    text.split('\n')
        .take(TITLE_SCAN_LINES)
        .map(str::trim)
        .find(|line| {
            let len = line.chars().count();
            (10..100).contains(&len) && !is_all_caps(line)
        })
        .map(str::to_string)
        .unwrap_or_else(|| {
            Path::new(filename)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(filename)
                .to_string()
        })
}

fn is_all_caps(line: &str) -> bool {
    line.chars().any(char::is_uppercase) && !line.chars().any(char::is_lowercase)
}

fn key_entities(text: &str) -> Vec<String> {
    CAPITALIZED_RUN
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|run| run.len() > 3 && !COMMON_WORDS.contains(run))
        .take(MAX_ENTITIES)
        .map(str::to_string)
        .collect()
}

fn important_numbers(text: &str) -> Vec<String> {
    LARGE_NUMBER
        .find_iter(text)
        .chain(DECIMAL.find_iter(text))
        .take(MAX_NUMBERS)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn financial_data(text: &str) -> FinancialData {
    FinancialData {
        currency_amounts: CURRENCY
            .iter()
            .flat_map(|re| re.find_iter(text))
            .map(|m| m.as_str().to_string())
            .collect(),
        percentages: PERCENTAGE
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect(),
        financial_terms: FINANCIAL_TERMS.found_in(text),
    }
}

fn summarize(text: &str) -> String {
    if text.chars().count() < MINIMAL_CONTENT_CHARS {
        return "Document contains minimal content.".to_string();
    }

    let summary = SENTENCE_BREAK
        .split(text)
        .take(SUMMARY_SENTENCES)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(". ");

    if summary.chars().count() > SUMMARY_MAX_CHARS {
        let cut: String = summary.chars().take(SUMMARY_MAX_CHARS).collect();
        format!("{}...", cut)
    } else {
        summary
    }
}

fn extraction_confidence(text: &str, format: DocumentFormat) -> f64 {
    let mut confidence = 0.8;
    confidence += match format {
        DocumentFormat::Txt | DocumentFormat::Docx => 0.1,
        DocumentFormat::Pdf | DocumentFormat::Tiff => 0.05,
        DocumentFormat::Png | DocumentFormat::Jpg | DocumentFormat::Jpeg => 0.0,
        DocumentFormat::Eml | DocumentFormat::Msg => 0.05,
    };
    if text.chars().count() > 1000 {
        confidence += 0.05;
    }
    if HAS_LETTER.is_match(text) {
        confidence += 0.05;
    }
    round_to(f64::min(1.0, confidence), 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PITCH: &str = "Acme Robotics Seed Round\n\
Contact Jane Doe at jane@acme.io or jane@acme.io, call (415) 555-0134.\n\
Visit https://acme.io/deck for the deck. Offices at 100 Market Street.\n\
We raised $1,250,000.00 on 03/15/2024 and revenue grew 45.5% to USD 2,000.\n\
Our CEO and co-founder leads a startup with strong EBITDA margin.\n";

    #[test]
    fn test_empty_text() {
        let info = extract_key_information("   ", DocumentFormat::Txt, "a.txt");
        assert_eq!(info.summary, "No content to analyze");
        assert_eq!(info.extraction_confidence, 0.0);
        assert!(info.emails.is_empty());
    }

    #[test]
    fn test_contacts_and_dates() {
        let info = extract_key_information(PITCH, DocumentFormat::Pdf, "acme.pdf");
        assert_eq!(info.emails, vec!["jane@acme.io"]);
        assert_eq!(info.phones, vec!["4155550134"]);
        assert_eq!(info.dates, vec!["03/15/2024"]);
        assert_eq!(info.urls, vec!["https://acme.io/deck"]);
        assert_eq!(info.contact_info.emails, info.emails);
        assert_eq!(info.contact_info.addresses, vec!["100 Market Street"]);
        assert!(info.contact_info.websites.contains(&"acme.io/deck".to_string()));
    }

    #[test]
    fn test_financial_and_business_terms() {
        let info = extract_key_information(PITCH, DocumentFormat::Pdf, "acme.pdf");
        assert_eq!(
            info.financial_data.currency_amounts,
            vec!["$1,250,000.00", "USD 2,000"]
        );
        assert_eq!(info.financial_data.percentages, vec!["45.5%"]);
        assert_eq!(
            info.financial_data.financial_terms,
            vec!["revenue", "margin", "EBITDA"]
        );
        assert_eq!(
            info.business_terms,
            vec!["startup", "CEO", "founder", "co-founder", "market"]
        );
    }

    #[test]
    fn test_title_prefers_content_then_filename() {
        assert_eq!(
            document_title("ACME ROBOTICS INC\nAcme Robotics Seed Round\n", "deck.pdf"),
            "Acme Robotics Seed Round"
        );
        assert_eq!(document_title("Short\nLINES ONLY HERE\n", "q3_board_deck.pdf"), "q3_board_deck");
    }

    #[test]
    fn test_entities_and_numbers_are_capped() {
        let text = (1..=15)
            .map(|i| format!("Vendor{} Alpha paid 1000{} units.", i, i))
            .collect::<Vec<_>>()
            .join(" ");
        let info = extract_key_information(&text, DocumentFormat::Txt, "ledger.txt");
        assert_eq!(info.entities.len(), MAX_ENTITIES);
        assert!(info.entities.iter().all(|e| e == "Alpha"));

        let numbers = (0..30).map(|i| format!("{}", 10_000 + i)).collect::<Vec<_>>().join(" ");
        assert_eq!(important_numbers(&numbers).len(), MAX_NUMBERS);
    }

    #[test]
    fn test_common_words_are_not_entities() {
        let entities = key_entities("The board met. There Acme Corp presented. When? Here.");
        assert_eq!(entities, vec!["There Acme Corp"]);
    }

    #[test]
    fn test_summary() {
        assert_eq!(summarize("Too short."), "Document contains minimal content.");

        let text = "First sentence here. Second one follows! Third asks why? Fourth is dropped. \
                    Padding padding padding padding padding.";
        assert_eq!(
            summarize(text),
            "First sentence here. Second one follows. Third asks why"
        );

        let long = format!("{}.", "word ".repeat(100));
        let summary = summarize(&long);
        assert!(summary.ends_with("..."));
        assert_eq!(summary.chars().count(), SUMMARY_MAX_CHARS + 3);
    }

    #[test]
    fn test_extraction_confidence() {
        assert_eq!(extraction_confidence("plain words", DocumentFormat::Png), 0.85);
        assert_eq!(extraction_confidence("12345", DocumentFormat::Png), 0.8);
        let long = "a".repeat(1001);
        assert_eq!(extraction_confidence(&long, DocumentFormat::Txt), 1.0);
    }
}
