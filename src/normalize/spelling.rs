// Optional spelling correction.
//
// Off by default. When enabled, each cleaned response is passed through a
// frequency-dictionary corrector: a word missing from the dictionary is
// replaced by the most frequent known word within one edit, or within two
// edits if nothing is one edit away. Results depend on the dictionary file,
// so nothing downstream may rely on this step for correctness.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Longest word searched at two edits. The two-edit neighbourhood grows
/// with the square of the length.
pub const MAX_TWO_EDIT_LEN: usize = 12;

/// Anything that can rewrite a cleaned response into corrected spelling.
pub trait SpellingCorrector: Send + Sync {
    fn correct(&self, text: &str) -> String;
}

/// Norvig-style corrector backed by word counts.
pub struct FrequencyCorrector {
    counts: HashMap<String, u64>,
}

impl FrequencyCorrector {
    /// Build a corrector by counting every alphabetic word in `corpus`.
    pub fn from_corpus(corpus: &str) -> Self {
        let mut counts = HashMap::new();
        for word in alphabetic_runs(&corpus.to_lowercase()) {
            *counts.entry(word.to_string()).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Load a dictionary file. Lines of the form `word count` use the given
    /// count; any other text is counted word by word.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read spelling dictionary {}", path.display()))?;

        let mut counts: HashMap<String, u64> = HashMap::new();
        for line in text.lines() {
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next().map(str::parse::<u64>), parts.next()) {
                (Some(word), Some(Ok(count)), None) => {
                    *counts.entry(word.to_lowercase()).or_insert(0) += count;
                }
                _ => {
                    for word in alphabetic_runs(&line.to_lowercase()) {
                        *counts.entry(word.to_string()).or_insert(0) += 1;
                    }
                }
            }
        }

        if counts.is_empty() {
            anyhow::bail!("Spelling dictionary {} contains no words", path.display());
        }

        debug!(words = counts.len(), path = %path.display(), "Loaded spelling dictionary");
        Ok(Self { counts })
    }

    /// Number of distinct words known to the corrector.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    fn correct_word(&self, word: &str) -> String {
        if word.len() < 2 || self.counts.contains_key(word) {
            return word.to_string();
        }

        let near = edits1(word);
        if let Some(best) = self.best_known(near.iter()) {
            return best;
        }

        if word.len() > MAX_TWO_EDIT_LEN {
            return word.to_string();
        }

        // One first-edit variant at a time, so only its neighbours are live
        near.iter()
            .filter_map(|w| self.best_known(edits1(w).iter()))
            .filter_map(|c| self.counts.get(&c).map(|&n| (n, c)))
            .max_by(|(na, a), (nb, b)| na.cmp(nb).then_with(|| b.cmp(a)))
            .map(|(_, c)| c)
            .unwrap_or_else(|| word.to_string())
    }

    // Highest count wins, then the alphabetically smaller word.
    fn best_known<'a>(&self, candidates: impl Iterator<Item = &'a String>) -> Option<String> {
        candidates
            .filter_map(|c| self.counts.get(c).map(|&n| (c, n)))
            .max_by(|(a, na), (b, nb)| na.cmp(nb).then_with(|| b.cmp(a)))
            .map(|(c, _)| c.clone())
    }
}

impl SpellingCorrector for FrequencyCorrector {
    fn correct(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut word = String::new();

        for ch in text.chars() {
            if ch.is_ascii_alphabetic() {
                word.push(ch);
            } else {
                if !word.is_empty() {
                    out.push_str(&self.correct_word(&word));
                    word.clear();
                }
                out.push(ch);
            }
        }
        if !word.is_empty() {
            out.push_str(&self.correct_word(&word));
        }

        out
    }
}

/// All strings one deletion, transposition, replacement, or insertion away.
fn edits1(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    let mut out = Vec::with_capacity(54 * n + 25);

    for i in 0..n {
        let mut deleted = chars.clone();
        deleted.remove(i);
        out.push(deleted.into_iter().collect());
    }
    for i in 0..n.saturating_sub(1) {
        let mut swapped = chars.clone();
        swapped.swap(i, i + 1);
        out.push(swapped.into_iter().collect());
    }
    for i in 0..n {
        for c in ALPHABET.chars() {
            if c != chars[i] {
                let mut replaced = chars.clone();
                replaced[i] = c;
                out.push(replaced.into_iter().collect());
            }
        }
    }
    for i in 0..=n {
        for c in ALPHABET.chars() {
            let mut inserted = chars.clone();
            inserted.insert(i, c);
            out.push(inserted.into_iter().collect());
        }
    }

    out
}

fn alphabetic_runs(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_ascii_alphabetic())
        .filter(|w| !w.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corrector() -> FrequencyCorrector {
        FrequencyCorrector::from_corpus(
            "the lecture was great and the lecture slides were great \
             the course was useful",
        )
    }

    #[test]
    fn test_known_words_unchanged() {
        let c = corrector();
        assert_eq!(c.correct("the course was useful"), "the course was useful");
    }

    #[test]
    fn test_single_edit_corrected() {
        let c = corrector();
        assert_eq!(c.correct("the lectrue was graet"), "the lecture was great");
    }

    #[test]
    fn test_two_edits_corrected() {
        let c = corrector();
        // k->c plus a missing e
        assert_eq!(c.correct("lektur slides"), "lecture slides");
    }

    #[test]
    fn test_long_word_skips_two_edit_search() {
        let c = FrequencyCorrector::from_corpus("internationalization");
        // One edit away is still found
        assert_eq!(c.correct("internationalizatoin"), "internationalization");
        // Two edits away on a long word is left alone
        assert_eq!(c.correct("internasionalizatoin"), "internasionalizatoin");
    }

    #[test]
    fn test_unknown_long_word_kept() {
        let c = corrector();
        let word = "pneumonoultramicroscopic";
        assert_eq!(c.correct(word), word);
    }

    #[test]
    fn test_unknown_word_kept() {
        let c = corrector();
        assert_eq!(c.correct("zzzzzzzz"), "zzzzzzzz");
    }

    #[test]
    fn test_punctuation_and_digits_preserved() {
        let c = corrector();
        assert_eq!(c.correct("grate, 10/10!"), "great, 10/10!");
    }

    #[test]
    fn test_load_counts_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        std::fs::write(&path, "hello 10\nhelp 50\n").unwrap();

        let c = FrequencyCorrector::load(&path).unwrap();
        assert_eq!(c.len(), 2);
        // "helo" is one edit from both; "help" has the higher count
        assert_eq!(c.correct("helo"), "help");
    }

    #[test]
    fn test_load_empty_dictionary_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "123 456 789\n").unwrap();
        assert!(FrequencyCorrector::load(&path).is_err());
    }

    #[test]
    fn test_edits1_contains_all_kinds() {
        let edits = edits1("ab");
        assert!(edits.contains(&"a".to_string())); // deletion
        assert!(edits.contains(&"ba".to_string())); // transposition
        assert!(edits.contains(&"cb".to_string())); // replacement
        assert!(edits.contains(&"abc".to_string())); // insertion
    }
}
