// One analysis run over a raw survey blob.
//
// 1. Split and clean the responses, dropping the empty ones
// 2. Embed the survivors in one batch
// 3. Group the vectors; noise points are discarded here
// 4. Score keywords per cluster
// 5. Rank clusters by size and summarize each one

use tracing::{debug, info};

use crate::cluster::{group_by_label, HdbscanGrouper};
use crate::embeddings::Embedder;
use crate::error::{PipelineError, Result};
use crate::normalize::Normalizer;
use crate::topics::{rank_and_summarize, KeywordExtractor, TfIdfExtractor, Topic};

/// The assembled stages. Build once, then call [`TopicPipeline::run`] per
/// input blob.
pub struct TopicPipeline {
    normalizer: Normalizer,
    embedder: Box<dyn Embedder>,
    grouper: HdbscanGrouper,
    extractor: TfIdfExtractor,
}

impl TopicPipeline {
    /// Pipeline with the default grouper and extractor settings.
    pub fn new(normalizer: Normalizer, embedder: Box<dyn Embedder>) -> Self {
        Self {
            normalizer,
            embedder,
            grouper: HdbscanGrouper::default(),
            extractor: TfIdfExtractor::default(),
        }
    }

    pub fn with_grouper(mut self, grouper: HdbscanGrouper) -> Self {
        self.grouper = grouper;
        self
    }

    /// Discover topics in a `|`-delimited blob of responses.
    ///
    /// Degenerate batches (nothing left after filtering, every point noise)
    /// produce an empty list rather than an error.
    pub async fn run(&self, raw: &str) -> Result<Vec<Topic>> {
        let responses = self.normalizer.normalize(raw);
        info!(responses = responses.len(), "Normalized input");
        self.run_normalized(responses).await
    }

    async fn run_normalized(&self, responses: Vec<String>) -> Result<Vec<Topic>> {
        if responses.is_empty() {
            info!("No meaningful responses, nothing to group");
            return Ok(Vec::new());
        }

        let vectors = self
            .embedder
            .embed(&responses)
            .await
            .map_err(|e| PipelineError::EmbeddingProvider(format!("{e:#}")))?;

        if vectors.len() != responses.len() {
            return Err(PipelineError::VectorCountMismatch {
                expected: responses.len(),
                actual: vectors.len(),
            });
        }
        debug!(
            vectors = vectors.len(),
            dimension = vectors.first().map(Vec::len).unwrap_or(0),
            "Embedded responses"
        );

        let labels = self.grouper.group(&vectors)?;
        let clusters = group_by_label(responses, &labels);
        let noise = labels.iter().filter(|l| l.is_noise()).count();
        info!(clusters = clusters.len(), noise, "Grouped responses");

        if clusters.is_empty() {
            return Ok(Vec::new());
        }

        let keywords = self.extractor.extract(&clusters);
        Ok(rank_and_summarize(&clusters, &keywords))
    }
}

/// Analyze a blob, loading the embedder only once at least one response
/// survives normalization. Filler-only input never touches the model.
pub async fn analyze<F>(
    raw: &str,
    normalizer: Normalizer,
    grouper: HdbscanGrouper,
    load_embedder: F,
) -> Result<Vec<Topic>>
where
    F: FnOnce() -> anyhow::Result<Box<dyn Embedder>>,
{
    let responses = normalizer.normalize(raw);
    info!(responses = responses.len(), "Normalized input");
    if responses.is_empty() {
        info!("No meaningful responses, embedding model not loaded");
        return Ok(Vec::new());
    }

    let embedder =
        load_embedder().map_err(|e| PipelineError::EmbeddingProvider(format!("{e:#}")))?;
    TopicPipeline::new(normalizer, embedder)
        .with_grouper(grouper)
        .run_normalized(responses)
        .await
}

/// Decode raw input bytes. Anything that is not UTF-8 is rejected rather
/// than lossily repaired.
pub fn decode_input(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| PipelineError::InputFormat(e.to_string()))
}
