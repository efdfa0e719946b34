// Grouping of similar responses.
//
// The grouper assigns each embedding a ClusterLabel; group_by_label then
// turns labels plus responses into the label -> responses map the later
// stages work on. Noise never makes it into that map.

pub mod density;

use std::collections::BTreeMap;

use serde::Serialize;

pub use density::{HdbscanGrouper, HdbscanParams, DEFAULT_MAX_LINK_DISTANCE};

/// Cluster assignment for one embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ClusterLabel {
    /// Member of the cluster with this id. Ids are only meaningful within
    /// the run that produced them.
    Clustered(usize),
    /// Not dense enough to belong anywhere; discarded downstream.
    Noise,
}

impl ClusterLabel {
    pub fn cluster_id(&self) -> Option<usize> {
        match self {
            ClusterLabel::Clustered(id) => Some(*id),
            ClusterLabel::Noise => None,
        }
    }

    pub fn is_noise(&self) -> bool {
        matches!(self, ClusterLabel::Noise)
    }
}

/// Responses per cluster id, each list in original input order.
pub type Clusters = BTreeMap<usize, Vec<String>>;

/// Collect responses into their clusters, dropping noise. `responses` and
/// `labels` are positionally aligned.
pub fn group_by_label(responses: Vec<String>, labels: &[ClusterLabel]) -> Clusters {
    let mut clusters = Clusters::new();
    for (response, label) in responses.into_iter().zip(labels) {
        if let ClusterLabel::Clustered(id) = label {
            clusters.entry(*id).or_default().push(response);
        }
    }
    clusters
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_label_drops_noise() {
        let responses = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let labels = [
            ClusterLabel::Clustered(1),
            ClusterLabel::Noise,
            ClusterLabel::Clustered(1),
        ];
        let clusters = group_by_label(responses, &labels);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[&1], vec!["a", "c"]);
    }

    #[test]
    fn test_group_by_label_keeps_input_order() {
        let responses: Vec<String> = ["x", "y", "z", "w"].iter().map(|s| s.to_string()).collect();
        let labels = [
            ClusterLabel::Clustered(0),
            ClusterLabel::Clustered(2),
            ClusterLabel::Clustered(0),
            ClusterLabel::Clustered(2),
        ];
        let clusters = group_by_label(responses, &labels);
        assert_eq!(clusters[&0], vec!["x", "z"]);
        assert_eq!(clusters[&2], vec!["y", "w"]);
    }

    #[test]
    fn test_all_noise_gives_no_clusters() {
        let responses = vec!["a".to_string()];
        let clusters = group_by_label(responses, &[ClusterLabel::Noise]);
        assert!(clusters.is_empty());
    }

    #[test]
    fn test_label_accessors() {
        assert_eq!(ClusterLabel::Clustered(3).cluster_id(), Some(3));
        assert_eq!(ClusterLabel::Noise.cluster_id(), None);
        assert!(ClusterLabel::Noise.is_noise());
        assert!(!ClusterLabel::Clustered(0).is_noise());
    }
}
