// Embedder trait: the capability boundary around the embedding model.
//
// The pipeline only needs `embed(texts) -> vectors`. Anything that honours
// the order/shape contract (local ONNX model, remote API, test fixture) can
// sit behind it.

use anyhow::Result;
use async_trait::async_trait;

/// Converts normalized responses into dense vectors.
///
/// Contract: one vector per input text, in input order, every vector the
/// same length and unit-norm. An empty batch returns an empty list.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f64>>>;

    /// Length of the vectors this embedder produces.
    fn dimension(&self) -> usize;
}

/// Scale a vector to unit length in place. Zero vectors are left as-is.
pub fn l2_normalize(vector: &mut [f64]) {
    let norm = vector.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > f64::EPSILON {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}
