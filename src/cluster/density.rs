// Density grouping of embedding vectors, on top of the `hdbscan` crate.
//
// Steps:
//   1. vectors are checked for a shared dimension and finite values
//   2. points are split into link components: two points share a component
//      when a chain of Euclidean links no longer than `max_link_distance`
//      joins them. Components smaller than `min_cluster_size` are noise
//   3. each remaining component goes through HDBSCAN (Euclidean, excess of
//      mass, single cluster allowed); its noise label -1 stays noise
//   4. clusters from every component are renumbered from 0 in order of
//      their earliest member
//
// Splitting first keeps unrelated groups from being condensed into one tree
// and lets a batch with a single tight group still yield that group.

use std::collections::BTreeMap;

use hdbscan::{DistanceMetric, Hdbscan, HdbscanHyperParams};
use tracing::debug;

use super::ClusterLabel;
use crate::error::GroupingError;

/// Default cut for links between points. On unit vectors this is cosine
/// similarity 0.5.
pub const DEFAULT_MAX_LINK_DISTANCE: f64 = 1.0;

/// Tunable clustering policy.
#[derive(Debug, Clone, PartialEq)]
pub struct HdbscanParams {
    /// Smallest group reported as a cluster; smaller groups are noise.
    pub min_cluster_size: usize,
    /// Neighbourhood size used for core distances (includes the point itself).
    pub min_samples: usize,
    /// Points joined to the rest only by longer links are split off.
    /// `None` clusters the whole batch as one component.
    pub max_link_distance: Option<f64>,
}

impl Default for HdbscanParams {
    fn default() -> Self {
        Self {
            min_cluster_size: 2,
            min_samples: 2,
            max_link_distance: Some(DEFAULT_MAX_LINK_DISTANCE),
        }
    }
}

/// Density-based grouper. Deterministic: identical input in identical order
/// always produces identical labels.
pub struct HdbscanGrouper {
    params: HdbscanParams,
}

impl Default for HdbscanGrouper {
    fn default() -> Self {
        Self::new(HdbscanParams::default())
    }
}

impl HdbscanGrouper {
    /// A cluster of one is never valid, so sizes below 2 are raised to 2.
    pub fn new(params: HdbscanParams) -> Self {
        Self {
            params: HdbscanParams {
                min_cluster_size: params.min_cluster_size.max(2),
                min_samples: params.min_samples.max(1),
                ..params
            },
        }
    }

    pub fn params(&self) -> &HdbscanParams {
        &self.params
    }

    /// Label every vector, in input order. Cluster ids are numbered from 0
    /// in order of each cluster's earliest member.
    pub fn group(&self, vectors: &[Vec<f64>]) -> Result<Vec<ClusterLabel>, GroupingError> {
        validate(vectors)?;

        let n = vectors.len();
        let mcs = self.params.min_cluster_size;
        let mut labels = vec![ClusterLabel::Noise; n];

        if n < mcs {
            debug!(points = n, min_cluster_size = mcs, "Too few points to cluster");
            return Ok(labels);
        }

        let mut groups: Vec<Vec<usize>> = Vec::new();
        for component in link_components(vectors, self.params.max_link_distance) {
            if component.len() < mcs {
                continue;
            }
            groups.extend(self.cluster_component(vectors, &component)?);
        }

        groups.sort_by_key(|members| members[0]);
        for (id, members) in groups.iter().enumerate() {
            for &p in members {
                labels[p] = ClusterLabel::Clustered(id);
            }
        }

        debug!(
            points = n,
            clusters = groups.len(),
            noise = labels.iter().filter(|l| l.is_noise()).count(),
            "Grouped embeddings"
        );

        Ok(labels)
    }

    /// Run HDBSCAN on one component. Returns the member indices (into the
    /// full batch, ascending) of each cluster found.
    fn cluster_component(
        &self,
        vectors: &[Vec<f64>],
        component: &[usize],
    ) -> Result<Vec<Vec<usize>>, GroupingError> {
        let data: Vec<Vec<f64>> = component.iter().map(|&i| vectors[i].clone()).collect();

        // The neighbourhood can't be larger than the component itself
        let min_samples = self.params.min_samples.min(data.len() - 1).max(1);

        let hyper_params = HdbscanHyperParams::builder()
            .min_cluster_size(self.params.min_cluster_size)
            .min_samples(min_samples)
            .dist_metric(DistanceMetric::Euclidean)
            // hdbscan 0.12 always uses excess-of-mass (EOM) cluster selection
            .allow_single_cluster(true)
            .build();

        let raw = Hdbscan::new(&data, hyper_params)
            .cluster()
            .map_err(|e| GroupingError::Clustering(format!("{e:?}")))?;

        let mut by_label: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
        for (local, &label) in raw.iter().enumerate() {
            if label >= 0 {
                by_label.entry(label).or_default().push(component[local]);
            }
        }

        Ok(by_label.into_values().collect())
    }
}

fn validate(vectors: &[Vec<f64>]) -> Result<(), GroupingError> {
    let Some(first) = vectors.first() else {
        return Ok(());
    };
    let expected = first.len();

    for (index, v) in vectors.iter().enumerate() {
        if v.len() != expected {
            return Err(GroupingError::DimensionMismatch {
                index,
                expected,
                actual: v.len(),
            });
        }
        if v.iter().any(|x| !x.is_finite()) {
            return Err(GroupingError::NonFinite { index });
        }
    }
    Ok(())
}

/// Euclidean distance between two equal-length vectors.
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Connected components of the graph linking points no further apart than
/// `max_link`. Each component lists its points in ascending order; the
/// components are ordered by their first point.
fn link_components(vectors: &[Vec<f64>], max_link: Option<f64>) -> Vec<Vec<usize>> {
    let n = vectors.len();
    let Some(max_link) = max_link else {
        return vec![(0..n).collect()];
    };

    let mut parent: Vec<usize> = (0..n).collect();
    for i in 0..n {
        for j in (i + 1)..n {
            if euclidean(&vectors[i], &vectors[j]) <= max_link {
                let (a, b) = (find(&mut parent, i), find(&mut parent, j));
                if a != b {
                    parent[a.max(b)] = a.min(b);
                }
            }
        }
    }

    let mut components: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for i in 0..n {
        let root = find(&mut parent, i);
        components.entry(root).or_default().push(i);
    }
    components.into_values().collect()
}

fn find(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}
