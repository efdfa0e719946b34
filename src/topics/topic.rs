// Topic: the final output unit, one per discovered cluster.
//
// Serialized field names are the wire format read by the caller:
// topic, summary, keywords, count, responses.

use serde::{Deserialize, Serialize};

/// Most sample responses carried on a topic.
pub const MAX_SAMPLE_RESPONSES: usize = 3;

/// A ranked, summarized cluster of similar responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    /// Identifier of the form "Topic <cluster id>"
    pub topic: String,
    /// One-sentence description built from the keywords
    pub summary: String,
    /// Up to five keywords, most distinctive first
    pub keywords: Vec<String>,
    /// Number of responses in the cluster
    pub count: usize,
    /// The first few responses of the cluster, in input order
    pub responses: Vec<String>,
}

impl Topic {
    /// Build the topic for cluster `id` from its responses and keywords.
    pub fn from_cluster(id: usize, responses: &[String], keywords: &[String]) -> Self {
        Self {
            topic: format!("Topic {id}"),
            summary: describe(keywords),
            keywords: keywords.to_vec(),
            count: responses.len(),
            responses: responses
                .iter()
                .take(MAX_SAMPLE_RESPONSES)
                .cloned()
                .collect(),
        }
    }
}

/// One-sentence summary from the top keywords.
///
/// The full form names the lead keyword and three more; shorter keyword
/// lists drop the missing slots instead of failing.
pub fn describe(keywords: &[String]) -> String {
    match keywords {
        [] => "This topic has no distinctive keywords".to_string(),
        [lead] => format!("This topic focuses on '{lead}'"),
        [lead, a] => format!("This topic focuses on '{lead}', with mentions of {a}"),
        [lead, a, b] => {
            format!("This topic focuses on '{lead}', with mentions of {a} and {b}")
        }
        [lead, a, b, c, ..] => {
            format!("This topic focuses on '{lead}', with mentions of {a}, {b}, and {c}")
        }
    }
}
