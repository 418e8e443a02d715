//! Tokenization and stopword filtering (spec §4.1).
//!
//! Two distinct stopword lists are kept deliberately separate (Open Question a):
//! [`TFIDF_STOPWORDS`] for corpus/query tokenization feeding the TF-IDF scorer, and
//! [`KEYWORD_STOPWORDS`] for the narrower keyword-extraction pass used by the
//! heuristic and keyword-adjustment stages. Tokenization is pure and deterministic.
use std::collections::HashSet;
use std::sync::OnceLock;

/// ~100 common English function words and pronouns, used by the TF-IDF scorer.
const TFIDF_STOPWORD_LIST: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her", "was",
    "one", "our", "out", "day", "get", "has", "him", "his", "how", "man", "new", "now",
    "old", "see", "two", "way", "who", "boy", "did", "its", "let", "put", "say", "she",
    "too", "use", "with", "this", "that", "from", "they", "have", "were", "been", "their",
    "said", "each", "which", "will", "about", "would", "there", "could", "other", "after",
    "first", "well", "also", "because", "these", "some", "what", "when", "where", "than",
    "then", "them", "into", "only", "over", "such", "even", "most", "made", "more", "very",
    "just", "being", "doing", "does", "having", "should", "while", "again", "further",
    "once", "here", "both", "each", "itself", "himself", "herself", "myself", "yourself",
    "ourselves", "themselves", "ours", "yours", "hers", "theirs", "ours", "mine", "any",
    "nor", "own", "same", "too", "until", "above", "below", "under", "between", "through",
    "during", "before", "after", "off", "down", "you're", "you'll", "you'd", "it's",
];

/// Narrower stopword set used only for keyword extraction (path/content matching).
/// Distinct from [`TFIDF_STOPWORD_LIST`] per Open Question (a).
const KEYWORD_STOPWORD_LIST: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her", "was",
    "one", "our", "out", "with", "this", "that", "from", "they", "have", "were", "been",
    "their", "about", "would", "there", "could", "other", "after", "what", "when", "where",
    "than", "then", "them", "into", "only", "over", "such", "even", "most", "very", "just",
    "please", "want", "need", "like", "make", "show", "help", "add",
];

static TFIDF_STOPWORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
static KEYWORD_STOPWORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();

fn tfidf_stopwords() -> &'static HashSet<&'static str> {
    TFIDF_STOPWORDS.get_or_init(|| TFIDF_STOPWORD_LIST.iter().copied().collect())
}

fn keyword_stopwords() -> &'static HashSet<&'static str> {
    KEYWORD_STOPWORDS.get_or_init(|| KEYWORD_STOPWORD_LIST.iter().copied().collect())
}

fn normalize_and_split(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut cleaned = String::with_capacity(lowered.len());
    for ch in lowered.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' || ch.is_whitespace() {
            cleaned.push(ch);
        } else {
            cleaned.push(' ');
        }
    }
    cleaned
        .split_whitespace()
        .map(|s| s.to_string())
        .collect()
}

/// Tokenizes `text` for TF-IDF: lowercase, strip non-`[a-z0-9_\s]`, split on
/// whitespace runs, keep tokens of length 3..=49, drop TF-IDF stopwords.
pub fn tokenize(text: &str) -> Vec<String> {
    let stop = tfidf_stopwords();
    normalize_and_split(text)
        .into_iter()
        .filter(|t| (3..=49).contains(&t.len()))
        .filter(|t| !stop.contains(t.as_str()))
        .collect()
}

/// Extracts a small, deduplicated keyword set from `text` for heuristic/keyword
/// post-adjustment matching: length bound 3..=40, narrower stopword list.
pub fn extract_keywords(text: &str) -> HashSet<String> {
    let stop = keyword_stopwords();
    normalize_and_split(text)
        .into_iter()
        .filter(|t| (3..=40).contains(&t.len()))
        .filter(|t| !stop.contains(t.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_punctuation() {
        let toks = tokenize("Add a Dark-Mode Toggle!");
        assert!(toks.contains(&"dark".to_string()));
        assert!(toks.contains(&"mode".to_string()));
        assert!(toks.contains(&"toggle".to_string()));
    }

    #[test]
    fn drops_short_and_long_tokens() {
        let toks = tokenize("a an ab abc");
        assert!(!toks.contains(&"a".to_string()));
        assert!(!toks.contains(&"an".to_string()));
        assert!(!toks.contains(&"ab".to_string()));
        assert!(toks.contains(&"abc".to_string()));
    }

    #[test]
    fn drops_tfidf_stopwords() {
        let toks = tokenize("this and that were with them");
        assert!(toks.is_empty());
    }

    #[test]
    fn keyword_extraction_is_deduplicated() {
        let kws = extract_keywords("theme theme toggle dark theme");
        assert_eq!(kws.len(), 3);
        assert!(kws.contains("theme"));
        assert!(kws.contains("toggle"));
        assert!(kws.contains("dark"));
    }

    #[test]
    fn deterministic_across_calls() {
        let a = tokenize("refactor the parser module please");
        let b = tokenize("refactor the parser module please");
        assert_eq!(a, b);
    }
}
