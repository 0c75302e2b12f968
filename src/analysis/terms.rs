//! Case-insensitive whole-word keyword matching.

use regex::Regex;

/// A fixed list of keywords, each matched on word boundaries.
pub struct TermSet {
    terms: Vec<(&'static str, Regex)>,
}

impl TermSet {
    /// Terms that also match with a trailing plural `s`, so "customer"
    /// finds "customers".
    pub fn new(terms: &[&'static str]) -> Self {
        Self::compile(terms, "s?")
    }

    /// Terms that only match as written (ignoring case).
    pub fn exact(terms: &[&'static str]) -> Self {
        Self::compile(terms, "")
    }

    fn compile(terms: &[&'static str], suffix: &str) -> Self {
        let terms = terms
            .iter()
            .map(|term| {
                let pattern = format!(r"(?i)\b{}{}\b", regex::escape(term), suffix);
                (*term, Regex::new(&pattern).unwrap())
            })
            .collect();
        Self { terms }
    }

    pub fn matches_any(&self, text: &str) -> bool {
        self.terms.iter().any(|(_, re)| re.is_match(text))
    }

    /// Terms present in `text`, in list order.
    pub fn found_in(&self, text: &str) -> Vec<String> {
        self.terms
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(term, _)| term.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_word_matching() {
        let set = TermSet::new(&["cv", "app", "cash flow"]);
        assert!(!set.matches_any("We apply strict recv checks"));
        assert!(set.matches_any("Attach your CV please"));
        assert!(set.matches_any("Two mobile apps shipped"));
        assert_eq!(set.found_in("Free Cash Flow and an App"), vec!["app", "cash flow"]);
    }

    #[test]
    fn test_exact_terms_skip_plurals() {
        let set = TermSet::exact(&["margin", "Series A"]);
        assert!(!set.matches_any("healthy margins"));
        assert_eq!(set.found_in("closed a series a with good margin"), vec!["margin", "Series A"]);
    }
}
