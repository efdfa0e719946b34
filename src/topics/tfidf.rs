// TF-IDF keyword extraction, scored independently per cluster.
//
// Each response in a cluster is one document. Responses are tokenized here
// (ASCII words of three letters or more, stop words removed, vocabulary
// capped) and the surviving tokens go to the `keyword_extraction` crate for
// scoring. Its ranking is re-sorted so equal scores come out alphabetically.

use std::collections::{HashMap, HashSet};

use keyword_extraction::tf_idf::{TfIdf, TfIdfParams};
use tracing::debug;

use super::stop_words::ENGLISH_STOP_WORDS;
use super::traits::{KeywordExtractor, Keywords};
use crate::cluster::Clusters;

/// Keywords kept per cluster.
pub const TOP_KEYWORDS: usize = 5;

/// Vocabulary cap per cluster (highest-frequency terms win).
pub const MAX_VOCABULARY: usize = 1000;

/// Shortest token considered a keyword.
pub const MIN_TOKEN_LEN: usize = 3;

/// Per-cluster TF-IDF extractor.
pub struct TfIdfExtractor {
    /// How many keywords to keep per cluster
    pub top_n: usize,
    /// Vocabulary size cap per cluster
    pub max_vocabulary: usize,
    stop_words: HashSet<String>,
}

impl Default for TfIdfExtractor {
    fn default() -> Self {
        Self::with_stop_words(ENGLISH_STOP_WORDS.iter().map(|w| w.to_string()))
    }
}

impl TfIdfExtractor {
    /// Build an extractor with a custom stop-word list.
    pub fn with_stop_words(stop_words: impl IntoIterator<Item = String>) -> Self {
        Self {
            top_n: TOP_KEYWORDS,
            max_vocabulary: MAX_VOCABULARY,
            stop_words: stop_words.into_iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Eligible terms in `text`, in order of appearance.
    ///
    /// Tokens are maximal runs of word characters; a run counts only if it
    /// is entirely ASCII letters, at least three long, and not a stop word.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|run| run.len() >= MIN_TOKEN_LEN)
            .filter(|run| run.chars().all(|c| c.is_ascii_alphabetic()))
            .filter(|run| !self.is_stop_word(run))
            .map(str::to_string)
            .collect()
    }

    /// The `max_vocabulary` most frequent terms across `docs`. Equal counts
    /// keep the alphabetically earlier term.
    fn vocabulary(&self, docs: &[Vec<String>]) -> HashSet<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for term in docs.iter().flatten() {
            *counts.entry(term.as_str()).or_insert(0) += 1;
        }

        let mut terms: Vec<(&str, usize)> = counts.into_iter().collect();
        terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        terms.truncate(self.max_vocabulary);
        terms.into_iter().map(|(term, _)| term.to_string()).collect()
    }

    /// Every vocabulary term of `texts` with its TF-IDF score, highest
    /// first. Equal scores keep alphabetical order.
    pub fn rank_terms(&self, texts: &[String]) -> Vec<(String, f32)> {
        let docs: Vec<Vec<String>> = texts.iter().map(|t| self.tokenize(t)).collect();
        let vocabulary = self.vocabulary(&docs);
        if vocabulary.is_empty() {
            return Vec::new();
        }

        let processed: Vec<String> = docs
            .iter()
            .map(|doc| {
                doc.iter()
                    .filter(|term| vocabulary.contains(term.as_str()))
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();

        let tfidf = TfIdf::new(TfIdfParams::ProcessedDocuments(&processed));
        let mut ranked: Vec<(String, f32)> = tfidf
            .get_ranked_word_scores(vocabulary.len())
            .into_iter()
            .filter(|(term, _)| vocabulary.contains(term))
            .collect();

        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }
}

impl KeywordExtractor for TfIdfExtractor {
    fn extract(&self, clusters: &Clusters) -> Keywords {
        let mut keywords = Keywords::new();

        for (&id, texts) in clusters {
            if texts.is_empty() {
                continue;
            }

            let top: Vec<String> = self
                .rank_terms(texts)
                .into_iter()
                .take(self.top_n)
                .map(|(term, _)| term)
                .collect();

            debug!(
                cluster = id,
                responses = texts.len(),
                keywords = top.len(),
                top_keyword = top.first().map(String::as_str).unwrap_or(""),
                "Extracted cluster keywords"
            );

            keywords.insert(id, top);
        }

        keywords
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> TfIdfExtractor {
        TfIdfExtractor::with_stop_words(
            ["the", "and", "was", "were", "with"].iter().map(|s| s.to_string()),
        )
    }

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tokenize_filters_short_numeric_and_stop_words() {
        let e = extractor();
        assert_eq!(
            e.tokenize("The Lab was 2hrs, ok... but AWESOME_ish and café-style fun"),
            vec!["lab", "but", "style", "fun"]
        );
    }

    #[test]
    fn test_tokenize_splits_on_punctuation() {
        let e = extractor();
        assert_eq!(e.tokenize("well-paced, clear/useful"), vec!["well", "paced", "clear", "useful"]);
    }

    #[test]
    fn test_rank_terms_prefers_repeated_terms() {
        let e = extractor();
        let ranked = e.rank_terms(&texts(&[
            "labs labs labs were long",
            "labs were tiring",
        ]));
        assert_eq!(ranked[0].0, "labs");
    }

    #[test]
    fn test_rank_terms_ties_are_alphabetical() {
        let e = extractor();
        let ranked = e.rank_terms(&texts(&["zebra apple mango"]));
        let terms: Vec<&str> = ranked.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(terms, vec!["apple", "mango", "zebra"]);
    }

    #[test]
    fn test_rank_terms_empty_when_no_eligible_tokens() {
        let e = extractor();
        assert!(e.rank_terms(&texts(&["the and was", "ok 42"])).is_empty());
    }

    #[test]
    fn test_vocabulary_cap_keeps_most_frequent() {
        let mut e = extractor();
        e.max_vocabulary = 2;
        let ranked = e.rank_terms(&texts(&["alpha alpha beta beta gamma", "alpha beta delta"]));
        let mut terms: Vec<&str> = ranked.iter().map(|(t, _)| t.as_str()).collect();
        terms.sort_unstable();
        assert_eq!(terms, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_extract_caps_at_top_n() {
        let e = extractor();
        let mut clusters = Clusters::new();
        clusters.insert(
            0,
            texts(&["one two three four five six seven", "eight nine ten eleven"]),
        );
        let keywords = e.extract(&clusters);
        // "one", "two", "six", "ten" are too short
        assert_eq!(keywords[&0].len(), TOP_KEYWORDS);
    }

    #[test]
    fn test_extract_skips_empty_clusters() {
        let e = extractor();
        let mut clusters = Clusters::new();
        clusters.insert(0, Vec::new());
        clusters.insert(1, texts(&["the and"]));
        let keywords = e.extract(&clusters);
        assert!(!keywords.contains_key(&0));
        assert_eq!(keywords[&1], Vec::<String>::new());
    }

    #[test]
    fn test_clusters_scored_independently() {
        let e = extractor();
        let mut clusters = Clusters::new();
        clusters.insert(0, texts(&["parking parking", "parking lot"]));
        clusters.insert(1, texts(&["lecture slides", "lecture notes"]));
        let keywords = e.extract(&clusters);
        assert_eq!(keywords[&0][0], "parking");
        assert_eq!(keywords[&1][0], "lecture");
        assert!(!keywords[&1].contains(&"parking".to_string()));
    }

    #[test]
    fn test_default_stop_words_keep_survey_terms() {
        let e = TfIdfExtractor::default();
        assert!(e.is_stop_word("the"));
        assert!(e.is_stop_word("well"));
        for word in ["course", "great", "useful", "powerpoint", "pdf"] {
            assert!(!e.is_stop_word(word), "{word}");
        }
    }

    #[test]
    fn test_default_tokenize_keeps_course_vocabulary() {
        let e = TfIdfExtractor::default();
        assert_eq!(
            e.tokenize("The course was great and really useful"),
            vec!["course", "great", "really", "useful"]
        );
    }
}
