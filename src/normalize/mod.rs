// Response normalization: the first pipeline stage.
//
// Splits the raw blob into responses, drops the ones that say nothing
// ("n/a", "none", ...), and canonicalizes the rest so that trivially
// different phrasings embed and tokenize the same way.

pub mod spelling;
pub mod tables;

use std::collections::HashSet;

use regex_lite::{NoExpand, Regex};
use tracing::debug;

use crate::error::{PipelineError, Result};
use spelling::SpellingCorrector;
pub use tables::NormalizerTables;

/// Separator between responses in the raw input. Responses cannot contain
/// it; there is no escaping.
pub const RESPONSE_DELIMITER: char = '|';

/// Cleans raw survey responses. Built once from its tables and reused for
/// every response in the batch.
pub struct Normalizer {
    empty_responses: HashSet<String>,
    abbreviations: Vec<(Regex, String)>,
    fillers: Vec<Regex>,
    whitespace: Regex,
    corrector: Option<Box<dyn SpellingCorrector>>,
}

impl Normalizer {
    /// Compile the tables into whole-word, case-insensitive patterns.
    pub fn new(tables: NormalizerTables) -> Result<Self> {
        let abbreviations = tables
            .abbreviations
            .iter()
            .map(|(abbr, full)| Ok((whole_word(abbr)?, full.clone())))
            .collect::<Result<Vec<_>>>()?;

        let fillers = tables
            .filler_phrases
            .iter()
            .map(|phrase| whole_word(phrase))
            .collect::<Result<Vec<_>>>()?;

        let whitespace =
            Regex::new(r"\s+").map_err(|e| PipelineError::Config(e.to_string()))?;

        Ok(Self {
            empty_responses: tables
                .empty_responses
                .iter()
                .map(|s| s.trim().to_lowercase())
                .collect(),
            abbreviations,
            fillers,
            whitespace,
            corrector: None,
        })
    }

    /// Enable spelling correction as the last cleaning step.
    pub fn with_spelling(mut self, corrector: Box<dyn SpellingCorrector>) -> Self {
        self.corrector = Some(corrector);
        self
    }

    /// Split a raw blob on the delimiter and normalize every response.
    pub fn normalize(&self, blob: &str) -> Vec<String> {
        self.normalize_responses(blob.split(RESPONSE_DELIMITER))
    }

    /// Normalize already-separated responses, dropping empty ones.
    /// Survivors keep their input order.
    pub fn normalize_responses<'a>(&self, responses: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut total = 0usize;
        let mut cleaned = Vec::new();

        for response in responses {
            total += 1;
            if self.is_semantically_empty(response) {
                continue;
            }
            let text = self.clean(response);
            if !text.is_empty() {
                cleaned.push(text);
            }
        }

        debug!(
            total,
            kept = cleaned.len(),
            dropped = total - cleaned.len(),
            "Normalized responses"
        );

        cleaned
    }

    /// True when the response is one of the "nothing to say" answers.
    /// Surrounding whitespace and trailing `.`/`!` are ignored.
    pub fn is_semantically_empty(&self, response: &str) -> bool {
        let folded = response.trim().to_lowercase();
        let stripped = folded.trim_matches('.').trim_matches('!').trim();
        self.empty_responses.contains(&folded) || self.empty_responses.contains(stripped)
    }

    /// Lowercase, expand abbreviations, strip filler phrases and collapse
    /// whitespace. Running it on its own output changes nothing.
    pub fn clean(&self, response: &str) -> String {
        let mut text = response.to_lowercase();

        for (pattern, full) in &self.abbreviations {
            text = pattern.replace_all(&text, NoExpand(full.as_str())).into_owned();
        }

        // Removing a phrase can bring the words around it together into
        // another filler phrase, so repeat until nothing changes.
        loop {
            let mut next = text.clone();
            for pattern in &self.fillers {
                next = pattern.replace_all(&next, "").into_owned();
            }
            next = self.collapse_whitespace(&next);
            if next == text {
                break;
            }
            text = next;
        }

        match &self.corrector {
            Some(corrector) => self.collapse_whitespace(&corrector.correct(&text)),
            None => text,
        }
    }

    fn collapse_whitespace(&self, text: &str) -> String {
        self.whitespace.replace_all(text, " ").trim().to_string()
    }
}

fn whole_word(phrase: &str) -> Result<Regex> {
    let pattern = format!(r"(?i)\b{}\b", regex_lite::escape(phrase.trim()));
    Regex::new(&pattern)
        .map_err(|e| PipelineError::Config(format!("bad phrase '{phrase}': {e}")))
}
