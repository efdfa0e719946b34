// Unit tests for response normalization.
//
// Exercises the public Normalizer surface the way the pipeline uses it:
// delimiter splitting, empty-response filtering, abbreviation expansion and
// filler stripping, plus the properties later stages rely on.

use std::io::Write;

use survey_topics::normalize::spelling::FrequencyCorrector;
use survey_topics::normalize::{Normalizer, NormalizerTables, RESPONSE_DELIMITER};

fn normalizer() -> Normalizer {
    Normalizer::new(NormalizerTables::default()).unwrap()
}

// ============================================================
// Filtering
// ============================================================

#[test]
fn filler_only_batch_is_empty() {
    assert!(normalizer().normalize("n/a|none|no").is_empty());
}

#[test]
fn empty_variants_filtered_regardless_of_case_and_padding() {
    let n = normalizer();
    let out = n.normalize("  N/A |NONE!|Nothing.|n.a.|good labs");
    assert_eq!(out, vec!["good labs"]);
}

#[test]
fn blank_segments_dropped() {
    let n = normalizer();
    assert_eq!(n.normalize("||labs were long||"), vec!["labs were long"]);
}

#[test]
fn filtering_is_idempotent() {
    let n = normalizer();
    let once = n.normalize("I think the labs are long|N/A|just ok|PPT slides|none");
    let joined = once.join(&RESPONSE_DELIMITER.to_string());
    assert_eq!(n.normalize(&joined), once);
}

#[test]
fn survivors_keep_input_order() {
    let n = normalizer();
    let out = n.normalize("zeta|n/a|alpha|none|mid");
    assert_eq!(out, vec!["zeta", "alpha", "mid"]);
}

// ============================================================
// Canonicalization
// ============================================================

#[test]
fn abbreviations_expand_for_keyword_extraction() {
    let n = normalizer();
    let out = n.normalize("great pdfs and ppt slides|ppt slides were great|pdfs were useful");
    assert_eq!(
        out,
        vec![
            "great pdf files and powerpoint slides",
            "powerpoint slides were great",
            "pdf files were useful",
        ]
    );
}

#[test]
fn abbreviation_inside_word_untouched() {
    let n = normalizer();
    assert_eq!(n.clean("pharmacy and rxjs"), "pharmacy and rxjs");
    assert_eq!(n.clean("Rx costs"), "prescription costs");
}

#[test]
fn fillers_stripped_and_whitespace_collapsed() {
    let n = normalizer();
    assert_eq!(
        n.clean("In my opinion   the labs are   just a bit long"),
        "the labs are long"
    );
}

#[test]
fn delimiter_cannot_be_escaped() {
    // A response containing the delimiter is split in two
    let n = normalizer();
    assert_eq!(n.normalize(r"either\|or"), vec![r"either\", "or"]);
}

// ============================================================
// Spelling correction
// ============================================================

#[test]
fn spelling_correction_uses_dictionary_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "lecture 120").unwrap();
    writeln!(file, "slides 80").unwrap();
    writeln!(file, "were 500").unwrap();
    writeln!(file, "helpful 60").unwrap();

    let corrector = FrequencyCorrector::load(file.path()).unwrap();
    let n = normalizer().with_spelling(Box::new(corrector));
    assert_eq!(
        n.normalize("Lectrue sildes were helpfull"),
        vec!["lecture slides were helpful"]
    );
}

#[test]
fn spelling_off_by_default() {
    assert_eq!(normalizer().clean("lectrue"), "lectrue");
}
