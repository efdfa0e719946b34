// Topic building: per-cluster keyword extraction, then ranking and
// summarization into the output topic list.

pub mod rank;
pub mod stop_words;
pub mod tfidf;
pub mod topic;
pub mod traits;

pub use rank::rank_and_summarize;
pub use tfidf::TfIdfExtractor;
pub use topic::Topic;
pub use traits::{KeywordExtractor, Keywords};
