use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cluster::{HdbscanGrouper, HdbscanParams, DEFAULT_MAX_LINK_DISTANCE};
use crate::embeddings::download;
use crate::normalize::spelling::FrequencyCorrector;
use crate::normalize::{Normalizer, NormalizerTables};

/// Central configuration loaded from environment variables.
///
/// Nothing here is secret; the .env file is loaded at startup via dotenvy
/// only so a project can pin its model directory and dictionary. CLI flags
/// override whatever is loaded.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory containing the embedding model files
    pub model_dir: PathBuf,
    /// Whether to run spelling correction after cleaning
    pub spell_check: bool,
    /// Word-frequency list for the spelling corrector
    pub dictionary: Option<PathBuf>,
    /// Longest link between neighbouring points when grouping (euclidean, on unit vectors)
    pub max_link_distance: f64,
}

impl Config {
    /// Load configuration from environment variables. Every value has a
    /// default, so this only fails on malformed values.
    pub fn load() -> Result<Self> {
        let model_dir = env::var("SURVEY_TOPICS_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| download::default_model_dir());

        let spell_check = env::var("SURVEY_TOPICS_SPELL_CHECK")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        let max_link_distance = match env::var("SURVEY_TOPICS_MAX_LINK_DISTANCE") {
            Ok(raw) => raw.trim().parse::<f64>().with_context(|| {
                format!("SURVEY_TOPICS_MAX_LINK_DISTANCE is not a number: {raw:?}")
            })?,
            Err(_) => DEFAULT_MAX_LINK_DISTANCE,
        };
        if !(max_link_distance.is_finite() && max_link_distance > 0.0) {
            anyhow::bail!(
                "SURVEY_TOPICS_MAX_LINK_DISTANCE must be a positive number, got {max_link_distance}"
            );
        }

        Ok(Self {
            model_dir,
            spell_check,
            dictionary: env::var("SURVEY_TOPICS_DICTIONARY").ok().map(PathBuf::from),
            max_link_distance,
        })
    }

    /// Check that the embedding model has been downloaded.
    /// Call this before building the ONNX embedder.
    pub fn require_model(&self) -> Result<()> {
        if !download::embedding_files_present(&self.model_dir) {
            anyhow::bail!(
                "Embedding model files not found in {}\n\
                 Run `survey-topics download-model` to download them.\n\
                 Or set SURVEY_TOPICS_MODEL_DIR to a directory that has them.",
                download::embedding_model_dir(&self.model_dir).display()
            );
        }
        Ok(())
    }

    /// Directory holding model.onnx and tokenizer.json.
    pub fn embedding_dir(&self) -> PathBuf {
        download::embedding_model_dir(&self.model_dir)
    }

    /// Build the normalizer, with spelling correction when enabled.
    pub fn build_normalizer(&self) -> Result<Normalizer> {
        let normalizer = Normalizer::new(NormalizerTables::default())?;
        if !self.spell_check {
            return Ok(normalizer);
        }

        let Some(path) = self.dictionary.as_deref() else {
            anyhow::bail!(
                "Spelling correction needs a word list.\n\
                 Pass --dictionary <path> or set SURVEY_TOPICS_DICTIONARY."
            );
        };
        let corrector = load_dictionary(path)?;
        Ok(normalizer.with_spelling(Box::new(corrector)))
    }

    /// Grouper with the configured link cut and default density settings.
    pub fn build_grouper(&self) -> HdbscanGrouper {
        HdbscanGrouper::new(HdbscanParams {
            max_link_distance: Some(self.max_link_distance),
            ..HdbscanParams::default()
        })
    }
}

fn load_dictionary(path: &Path) -> Result<FrequencyCorrector> {
    let corrector = FrequencyCorrector::load(path)
        .with_context(|| format!("Failed to load dictionary {}", path.display()))?;
    tracing::info!(
        words = corrector.len(),
        path = %path.display(),
        "Loaded spelling dictionary"
    );
    Ok(corrector)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
