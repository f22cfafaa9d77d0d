//! Dictionary-validated affix stripping.
//!
//! [`IndonesianStemmer`] follows the Nazief–Adriani scheme with confix
//! backtracking:
//!
//! 1. A word already in the dictionary is its own root.
//! 2. One particle, then one possessive, then one derivational suffix are
//!    removed, checking the dictionary after each removal.
//! 3. Prefixes are removed by a breadth-first search over candidate stems,
//!    bounded by `max_prefix_passes`. Every rule is tried on every stem of the
//!    current pass before going one prefix deeper.
//! 4. If the fully suffix-stripped stem yields nothing, the search is repeated
//!    on progressively less stripped forms (the `-kan` → `-an` recode first,
//!    then the possessive, particle and original forms).
//!
//! A word that never reaches the dictionary is returned unchanged with
//! `success == false`. A successful root is always a dictionary word, which
//! makes stemming idempotent.
//!
//! Hyphenated words go through the `reduplication` rule instead: `buku-buku`,
//! `bermain-main` and `buku-bukunya` reduce to the root both halves share.

use std::sync::Arc;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::stemming::dictionary::Dictionary;
use crate::stemming::rules::{AffixCategory, AffixRuleSet, SuffixGroup, SuffixRule};

/// Rule id recorded for hyphenated reduplication.
pub const REDUPLICATION_RULE: &str = "reduplication";

/// Trait for stemmers that reduce a word to its root.
pub trait Stemmer: Send + Sync {
    /// Stem a single word. Never fails: unknown words come back unchanged.
    fn stem(&self, word: &str) -> StemResult;

    /// Get the name of this stemmer.
    fn name(&self) -> &'static str;
}

/// One rule application in a stemming trace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedRule {
    pub id: String,
    pub category: AffixCategory,
}

impl AppliedRule {
    fn new(id: &str, category: AffixCategory) -> Self {
        AppliedRule {
            id: id.to_string(),
            category,
        }
    }
}

/// The outcome of stemming one token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StemResult {
    pub original: String,
    pub root: String,
    pub success: bool,
    /// Rules applied, outermost first.
    pub trace: Vec<AppliedRule>,
}

impl StemResult {
    fn found(original: &str, root: String, trace: Vec<AppliedRule>) -> Self {
        StemResult {
            original: original.to_string(),
            root,
            success: true,
            trace,
        }
    }

    fn unchanged(original: &str) -> Self {
        StemResult {
            original: original.to_string(),
            root: original.to_string(),
            success: false,
            trace: Vec::new(),
        }
    }
}

/// Tunable bounds of the stemmer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StemmerOptions {
    /// Words with fewer characters are never stemmed.
    pub min_stem_chars: usize,
    /// Maximum number of prefixes removed from one word.
    pub max_prefix_passes: usize,
}

impl Default for StemmerOptions {
    fn default() -> Self {
        StemmerOptions {
            min_stem_chars: 3,
            max_prefix_passes: 3,
        }
    }
}

/// A stem candidate carried through suffix and prefix removal.
#[derive(Clone, Debug)]
struct Candidate {
    stem: String,
    trace: Vec<AppliedRule>,
    /// Derivational suffix removed so far, for disallowed confix checks.
    suffix: Option<String>,
    /// Prefix families removed so far.
    prefixes: Vec<String>,
}

impl Candidate {
    fn new(word: &str) -> Self {
        Candidate {
            stem: word.to_string(),
            trace: Vec::new(),
            suffix: None,
            prefixes: Vec::new(),
        }
    }

    fn strip_suffix(&self, rule: &SuffixRule, stem: String, recode: &str) -> Self {
        let mut next = self.clone();
        next.stem = stem;
        next.trace.push(AppliedRule::new(&rule.id, rule.group.category()));
        if rule.group == SuffixGroup::Derivational {
            next.suffix = Some(rule.effective_suffix(recode).to_string());
        }
        next
    }
}

/// Rule-based Indonesian stemmer.
#[derive(Clone, Debug)]
pub struct IndonesianStemmer {
    dictionary: Arc<Dictionary>,
    rules: Arc<AffixRuleSet>,
    options: StemmerOptions,
}

impl IndonesianStemmer {
    /// Create a stemmer with default options.
    pub fn new(dictionary: Arc<Dictionary>, rules: Arc<AffixRuleSet>) -> Self {
        Self::with_options(dictionary, rules, StemmerOptions::default())
    }

    /// Create a stemmer with explicit bounds.
    pub fn with_options(
        dictionary: Arc<Dictionary>,
        rules: Arc<AffixRuleSet>,
        options: StemmerOptions,
    ) -> Self {
        IndonesianStemmer {
            dictionary,
            rules,
            options,
        }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn rules(&self) -> &AffixRuleSet {
        &self.rules
    }

    pub fn options(&self) -> StemmerOptions {
        self.options
    }

    fn is_stemmable(&self, word: &str) -> bool {
        word.chars().count() >= self.options.min_stem_chars
            && word.chars().all(|c| c.is_alphabetic() || c == '-')
            && !word.starts_with('-')
            && !word.ends_with('-')
            && !word.contains("--")
    }

    /// Root of a hyphen-free word, with the rules that produced it.
    fn find_root(&self, word: &str) -> Option<(String, Vec<AppliedRule>)> {
        if !self.is_stemmable(word) || word.contains('-') {
            return None;
        }
        if self.dictionary.contains(word) {
            return Some((word.to_string(), Vec::new()));
        }

        let candidates = match self.strip_suffixes(word) {
            Ok(found) => return Some((found.stem, found.trace)),
            Err(candidates) => candidates,
        };

        candidates
            .iter()
            .find_map(|candidate| self.strip_prefixes(candidate))
            .map(|found| (found.stem, found.trace))
    }

    /// Removes suffixes in group order.
    ///
    /// Returns `Ok` as soon as a stripped form is a root, otherwise the
    /// candidates for prefix removal in backtracking order.
    fn strip_suffixes(&self, word: &str) -> Result<Candidate, Vec<Candidate>> {
        let mut inflected = vec![Candidate::new(word)];

        for group in [SuffixGroup::Particle, SuffixGroup::Possessive] {
            let current = &inflected[inflected.len() - 1];
            let stripped = self.rules.suffixes(group).find_map(|rule| {
                rule.strip(&current.stem)
                    .map(|stem| current.strip_suffix(rule, stem.to_string(), ""))
            });
            if let Some(next) = stripped {
                if self.dictionary.contains(&next.stem) {
                    return Ok(next);
                }
                inflected.push(next);
            }
        }

        let current = &inflected[inflected.len() - 1];
        let mut derived = Vec::new();
        if let Some((rule, stem)) = self
            .rules
            .suffixes(SuffixGroup::Derivational)
            .find_map(|rule| rule.strip(&current.stem).map(|stem| (rule, stem)))
        {
            for recode in &rule.recodes {
                let next = current.strip_suffix(rule, format!("{stem}{recode}"), recode);
                if self.dictionary.contains(&next.stem) {
                    return Ok(next);
                }
                derived.push(next);
            }
        }

        let mut seen = AHashSet::new();
        let candidates = derived
            .into_iter()
            .chain(inflected.into_iter().rev())
            .filter(|c| seen.insert(c.stem.clone()))
            .collect();
        Err(candidates)
    }

    /// Bounded breadth-first prefix removal.
    fn strip_prefixes(&self, start: &Candidate) -> Option<Candidate> {
        let mut visited = AHashSet::new();
        visited.insert(start.stem.clone());
        let mut frontier = vec![start.clone()];

        for _ in 0..self.options.max_prefix_passes {
            let mut next_frontier = Vec::new();

            for candidate in &frontier {
                for rule in self.rules.prefixes() {
                    if candidate.prefixes.iter().any(|p| p == rule.prefix()) {
                        continue;
                    }
                    // Confix constraints bind the outermost prefix only.
                    if candidate.prefixes.is_empty() {
                        if let Some(suffix) = &candidate.suffix {
                            if self.rules.is_disallowed(rule.prefix(), suffix) {
                                continue;
                            }
                        }
                    }

                    for stem in rule.apply(&candidate.stem) {
                        if !visited.insert(stem.clone()) {
                            continue;
                        }
                        let mut next = candidate.clone();
                        next.stem = stem;
                        next.prefixes.push(rule.prefix().to_string());
                        next.trace
                            .push(AppliedRule::new(rule.id(), AffixCategory::DerivationalPrefix));

                        if self.dictionary.contains(&next.stem) {
                            return Some(next);
                        }
                        next_frontier.push(next);
                    }
                }
            }

            if next_frontier.is_empty() {
                break;
            }
            frontier = next_frontier;
        }
        None
    }

    /// `X-X`, `X-Y` and `X-Y-S` forms whose halves share a root.
    fn stem_reduplicated(&self, original: &str, word: &str) -> StemResult {
        let parts: Vec<&str> = word.split('-').collect();
        let (left, right) = match parts.as_slice() {
            [left, right] => (*left, *right),
            [left, right, suffix] if self.rules.is_inflectional_suffix(suffix) => (*left, *right),
            _ => return StemResult::unchanged(original),
        };

        let Some((root, left_trace)) = self.find_root(left) else {
            return StemResult::unchanged(original);
        };

        let mut right_forms = vec![right.to_string()];
        right_forms.extend(
            self.rules
                .suffixes(SuffixGroup::Particle)
                .chain(self.rules.suffixes(SuffixGroup::Possessive))
                .filter_map(|rule| right.strip_suffix(rule.suffix.as_str()))
                .filter(|rest| !rest.is_empty())
                .map(str::to_string),
        );

        let shares_root = right_forms.iter().any(|form| {
            form == left || self.find_root(form).is_some_and(|(right_root, _)| right_root == root)
        });
        if !shares_root {
            return StemResult::unchanged(original);
        }

        let mut trace = vec![AppliedRule::new(REDUPLICATION_RULE, AffixCategory::Reduplication)];
        trace.extend(left_trace);
        StemResult::found(original, root, trace)
    }
}

impl Stemmer for IndonesianStemmer {
    fn stem(&self, word: &str) -> StemResult {
        let lowered = word.to_lowercase();
        if !self.is_stemmable(&lowered) {
            return StemResult::unchanged(word);
        }
        if self.dictionary.contains(&lowered) {
            return StemResult::found(word, lowered, Vec::new());
        }
        if lowered.contains('-') {
            return self.stem_reduplicated(word, &lowered);
        }

        match self.find_root(&lowered) {
            Some((root, trace)) => StemResult::found(word, root, trace),
            None => StemResult::unchanged(word),
        }
    }

    fn name(&self) -> &'static str {
        "indonesian"
    }
}
