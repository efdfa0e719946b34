// Ranking clusters into the final topic list.
//
// Bigger clusters first. The sort is stable over the cluster map's own
// order (ascending id), so equal-sized clusters keep that order and the
// output is identical from run to run.

use tracing::info;

use super::topic::Topic;
use super::traits::Keywords;
use crate::cluster::Clusters;

/// Turn clusters and their keywords into topics, largest cluster first.
/// A cluster missing from `keywords` is summarized as having none.
pub fn rank_and_summarize(clusters: &Clusters, keywords: &Keywords) -> Vec<Topic> {
    let mut ranked: Vec<(&usize, &Vec<String>)> = clusters.iter().collect();
    ranked.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

    let topics: Vec<Topic> = ranked
        .into_iter()
        .map(|(id, responses)| {
            let kws = keywords.get(id).map(Vec::as_slice).unwrap_or(&[]);
            Topic::from_cluster(*id, responses, kws)
        })
        .collect();

    if let Some(top) = topics.first() {
        info!(
            topics = topics.len(),
            largest = top.count,
            lead_keyword = top.keywords.first().map(String::as_str).unwrap_or(""),
            "Ranked topics"
        );
    }

    topics
}
