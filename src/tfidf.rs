//! TF-IDF scorer (spec §4.2): constructed once per `select` call over the full
//! candidate corpus, purely offline and deterministic.
use std::collections::HashMap;

use crate::tokenizer::tokenize;

/// A built TF-IDF index over a fixed corpus. `idf` is computed once; `score`
/// is `O(|query_tokens|)` per document given the precomputed term frequencies.
#[derive(Debug, Clone)]
pub struct TfIdfScorer {
    idf: HashMap<String, f64>,
    /// Per-document term frequency, normalized by document token length.
    doc_tf: HashMap<String, HashMap<String, f64>>,
}

impl TfIdfScorer {
    /// Build an index over `(path, content)` pairs. `path` is used only as a map
    /// key to retrieve scores later; any stable identifier works.
    pub fn build<'a, I>(documents: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut doc_tokens: HashMap<String, Vec<String>> = HashMap::new();
        for (path, content) in documents {
            doc_tokens.insert(path.to_string(), tokenize(content));
        }

        let n = doc_tokens.len().max(1) as f64;
        let mut df: HashMap<String, usize> = HashMap::new();
        for tokens in doc_tokens.values() {
            let mut seen: std::collections::HashSet<&str> = std::collections::HashSet::new();
            for t in tokens {
                if seen.insert(t.as_str()) {
                    *df.entry(t.clone()).or_insert(0) += 1;
                }
            }
        }

        let idf: HashMap<String, f64> = df
            .into_iter()
            .map(|(term, count)| (term, (n / (1.0 + count as f64)).ln()))
            .collect();

        let mut doc_tf: HashMap<String, HashMap<String, f64>> = HashMap::new();
        for (path, tokens) in doc_tokens {
            let len = tokens.len().max(1) as f64;
            let mut counts: HashMap<String, f64> = HashMap::new();
            for t in tokens {
                *counts.entry(t).or_insert(0.0) += 1.0;
            }
            for v in counts.values_mut() {
                *v /= len;
            }
            doc_tf.insert(path, counts);
        }

        Self { idf, doc_tf }
    }

    /// Score `path` against `query`: sum over distinct query tokens of
    /// `tf(doc, t) * idf(t)`. Missing terms contribute zero.
    pub fn score(&self, path: &str, query_tokens: &[String]) -> f64 {
        let Some(tf) = self.doc_tf.get(path) else {
            return 0.0;
        };
        let mut seen: std::collections::HashSet<&str> = std::collections::HashSet::new();
        let mut total = 0.0;
        for t in query_tokens {
            if !seen.insert(t.as_str()) {
                continue;
            }
            let term_tf = tf.get(t).copied().unwrap_or(0.0);
            let term_idf = self.idf.get(t).copied().unwrap_or(0.0);
            total += term_tf * term_idf;
        }
        total
    }
}
