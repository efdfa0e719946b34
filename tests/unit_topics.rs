// Unit tests for keyword extraction and topic ranking.
//
// Tests TfIdfExtractor with the default English stop words, and the
// ranker's ordering, sampling and summary rules.

use survey_topics::cluster::Clusters;
use survey_topics::topics::topic::describe;
use survey_topics::topics::{rank_and_summarize, KeywordExtractor, Keywords, TfIdfExtractor};

fn texts(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ============================================================
// TfIdfExtractor: default stop words
// ============================================================

#[test]
fn expanded_abbreviations_are_keywords() {
    let extractor = TfIdfExtractor::default();
    let mut clusters = Clusters::new();
    clusters.insert(
        0,
        texts(&[
            "great pdf files and powerpoint slides",
            "powerpoint slides were great",
            "pdf files were useful",
        ]),
    );

    let keywords = extractor.extract(&clusters);
    assert!(keywords[&0].contains(&"powerpoint".to_string()));
    assert!(keywords[&0].contains(&"pdf".to_string()));
    assert!(keywords[&0].contains(&"great".to_string()));
}

#[test]
fn stop_words_and_short_tokens_never_keywords() {
    let extractor = TfIdfExtractor::default();
    let mut clusters = Clusters::new();
    clusters.insert(
        0,
        texts(&["the labs are on it", "it is the labs", "labs 24 7"]),
    );

    let keywords = extractor.extract(&clusters);
    assert_eq!(keywords[&0], vec!["labs"]);
}

#[test]
fn keyword_lists_bounded_by_five() {
    let extractor = TfIdfExtractor::default();
    let mut clusters = Clusters::new();
    clusters.insert(
        0,
        texts(&[
            "pharmacology lectures recordings slides quizzes tutorials",
            "laboratory sessions workshops assignments feedback",
        ]),
    );

    let keywords = extractor.extract(&clusters);
    assert_eq!(keywords[&0].len(), 5);
}

#[test]
fn extraction_is_deterministic() {
    let extractor = TfIdfExtractor::default();
    let mut clusters = Clusters::new();
    clusters.insert(0, texts(&["alpha beta gamma", "delta epsilon zeta", "gamma delta"]));

    let first = extractor.extract(&clusters);
    for _ in 0..5 {
        assert_eq!(extractor.extract(&clusters), first);
    }
}

// ============================================================
// Ranking and summaries
// ============================================================

#[test]
fn ranking_is_monotonic_in_count() {
    let mut clusters = Clusters::new();
    for (id, size) in [(0, 2), (1, 7), (2, 4), (3, 4), (4, 1)] {
        clusters.insert(id, (0..size).map(|i| format!("r{id}-{i}")).collect());
    }

    let topics = rank_and_summarize(&clusters, &Keywords::new());
    let counts: Vec<usize> = topics.iter().map(|t| t.count).collect();
    assert_eq!(counts, vec![7, 4, 4, 2, 1]);
    // Equal counts keep ascending id
    assert_eq!(topics[1].topic, "Topic 2");
    assert_eq!(topics[2].topic, "Topic 3");
}

#[test]
fn samples_are_first_three_in_order() {
    let mut clusters = Clusters::new();
    clusters.insert(0, texts(&["one", "two", "three", "four", "five"]));

    let topics = rank_and_summarize(&clusters, &Keywords::new());
    assert_eq!(topics[0].responses, vec!["one", "two", "three"]);
    assert_eq!(topics[0].count, 5);
}

#[test]
fn summary_from_extracted_keywords() {
    let extractor = TfIdfExtractor::default();
    let mut clusters = Clusters::new();
    clusters.insert(0, texts(&["parking parking parking", "parking permits"]));

    let keywords = extractor.extract(&clusters);
    let topics = rank_and_summarize(&clusters, &keywords);
    assert_eq!(
        topics[0].summary,
        "This topic focuses on 'parking', with mentions of permits"
    );
}

#[test]
fn summary_never_fails_on_short_keyword_lists() {
    for n in 0..=6 {
        let keywords: Vec<String> = (0..n).map(|i| format!("kw{i}")).collect();
        let summary = describe(&keywords);
        assert!(summary.starts_with("This topic"));
    }
}
