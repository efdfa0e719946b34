// Phrase tables that drive response cleaning.
//
// These are plain data handed to `Normalizer::new`, never globals, so a test
// (or a different survey domain) can swap in its own vocabulary.

/// Immutable lookup tables for the normalizer.
#[derive(Debug, Clone)]
pub struct NormalizerTables {
    /// Responses that carry no content once trimmed and case-folded.
    pub empty_responses: Vec<String>,
    /// Whole-word abbreviation expansions, applied in order.
    pub abbreviations: Vec<(String, String)>,
    /// Filler phrases removed wherever they appear as whole phrases.
    pub filler_phrases: Vec<String>,
}

const EMPTY_RESPONSES: [&str; 7] = ["n/a", "na", "none", "nothing", "no", "n.a.", "n a"];

const ABBREVIATIONS: [(&str, &str); 4] = [
    ("ppt", "powerpoint"),
    ("pdfs", "pdf files"),
    ("pharm", "pharmacology"),
    ("rx", "prescription"),
];

const FILLER_PHRASES: [&str; 9] = [
    "n/a",
    "na",
    "n.a.",
    "i think",
    "in my opinion",
    "i feel that",
    "some of",
    "a bit",
    "just",
];

impl Default for NormalizerTables {
    fn default() -> Self {
        Self {
            empty_responses: EMPTY_RESPONSES.iter().map(|s| s.to_string()).collect(),
            abbreviations: ABBREVIATIONS
                .iter()
                .map(|(abbr, full)| (abbr.to_string(), full.to_string()))
                .collect(),
            filler_phrases: FILLER_PHRASES.iter().map(|s| s.to_string()).collect(),
        }
    }
}
