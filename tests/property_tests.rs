//! Property-based tests using proptest

use std::path::PathBuf;
use std::sync::{Arc, LazyLock};

use proptest::prelude::*;

use akar::analysis::analyzer::Normalizer;
use akar::analysis::token_filter::StopFilter;
use akar::config::AnalysisConfig;
use akar::stemming::{AffixCategory, AffixRuleSet, Dictionary, IndonesianStemmer, Stemmer};

static STEMMER: LazyLock<Arc<IndonesianStemmer>> = LazyLock::new(|| {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/kata-dasar.txt");
    Arc::new(IndonesianStemmer::new(
        Arc::new(Dictionary::load(path).unwrap()),
        Arc::new(AffixRuleSet::default_indonesian()),
    ))
});

const ROOTS: &[&str] = &[
    "ajar", "ambil", "baca", "beli", "buku", "cari", "dengar", "guna", "hasil", "ikan", "jual",
    "kirim", "lihat", "main", "makan", "nyanyi", "olah", "pakai", "rawat", "sapu", "tanam",
    "tani", "tulis", "ukur", "wabah",
];
const PREFIXES: &[&str] = &[
    "", "di", "ke", "se", "ber", "be", "ter", "te", "me", "mem", "men", "meng", "meny", "memper",
    "pe", "pem", "pen", "peng", "peny", "per", "diper",
];
const SUFFIXES: &[&str] = &["", "i", "an", "kan", "ku", "mu", "nya", "lah", "kah", "pun", "annya"];

/// Roots dressed in affixes, most of which do not form real words.
fn affixed_word() -> impl Strategy<Value = String> {
    (
        prop::sample::select(PREFIXES),
        prop::sample::select(ROOTS),
        prop::sample::select(SUFFIXES),
    )
        .prop_map(|(prefix, root, suffix)| format!("{prefix}{root}{suffix}"))
}

fn any_word() -> impl Strategy<Value = String> {
    prop_oneof![affixed_word(), "[a-z]{1,14}", "[a-z]{2,8}-[a-z]{2,8}", "[A-Za-z0-9-]{1,12}"]
}

fn normalizer() -> Normalizer {
    Normalizer::new(
        &AnalysisConfig::default(),
        STEMMER.clone(),
        StopFilter::new(),
    )
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn test_stemming_is_idempotent(word in any_word()) {
        let root = STEMMER.stem(&word).root;
        prop_assert_eq!(STEMMER.stem(&root).root, root);
    }

    #[test]
    fn test_successful_roots_are_dictionary_words(word in any_word()) {
        let result = STEMMER.stem(&word);
        if result.success {
            prop_assert!(STEMMER.dictionary().contains(&result.root));
        } else {
            prop_assert_eq!(result.root, word);
            prop_assert!(result.trace.is_empty());
        }
    }

    #[test]
    fn test_prefix_removal_is_bounded(
        repeated in prop::collection::vec(prop::sample::select(PREFIXES), 1..12),
        root in prop::sample::select(ROOTS),
    ) {
        let word = format!("{}{root}", repeated.concat());
        let result = STEMMER.stem(&word);

        let prefixes = result
            .trace
            .iter()
            .filter(|rule| rule.category == AffixCategory::DerivationalPrefix)
            .count();
        prop_assert!(prefixes <= STEMMER.options().max_prefix_passes);
    }

    #[test]
    fn test_short_tokens_pass_through(word in "[a-zA-Z]{1,2}") {
        let result = STEMMER.stem(&word);
        prop_assert_eq!(&result.root, &word);
        prop_assert!(!result.success);
    }

    #[test]
    fn test_non_alphabetic_tokens_pass_through(word in "[a-z]{1,6}[0-9_.][a-z]{0,6}") {
        let result = STEMMER.stem(&word);
        prop_assert_eq!(&result.root, &word);
        prop_assert!(!result.success);
    }

    #[test]
    fn test_normalize_is_deterministic(
        words in prop::collection::vec(any_word(), 0..20),
    ) {
        let text = words.join(" ");
        let normalizer = normalizer();
        prop_assert_eq!(normalizer.normalize(&text).unwrap(), normalizer.normalize(&text).unwrap());
    }
}
