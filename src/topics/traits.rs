// Keyword extractor trait: swap-ready abstraction.
//
// The default implementation is per-cluster TF-IDF. Something like TextRank
// or an LLM labeller could replace it without touching the ranker.

use std::collections::BTreeMap;

use crate::cluster::Clusters;

/// Top keywords per cluster id, most important first.
pub type Keywords = BTreeMap<usize, Vec<String>>;

/// Trait for extracting distinctive keywords from each cluster's responses.
pub trait KeywordExtractor {
    /// Clusters with no responses get no entry; clusters with no usable
    /// vocabulary get an empty list.
    fn extract(&self, clusters: &Clusters) -> Keywords;
}
