//! Affix rule table for Indonesian morphology.
//!
//! The rules are pure data. Suffixes are literal strings with recodes and
//! structural preconditions on what remains; prefixes are regular expressions
//! whose first capture is the remaining stem and whose templates rebuild the
//! candidate root (`"p${1}"` restores the initial consonant that `mem-`
//! assimilated). A [`RuleTableSpec`] is the serializable form and can be
//! loaded from JSON; [`AffixRuleSet`] is the compiled, immutable form the
//! stemmer shares across threads.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use ahash::AHashSet;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AkarError, Result};

/// What kind of affix a rule removes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffixCategory {
    InflectionalSuffix,
    DerivationalSuffix,
    DerivationalPrefix,
    /// Hyphenated reduplication (`buku-buku`, `bermain-main`).
    Reduplication,
}

/// Position of a suffix rule in the stripping sequence.
///
/// At most one rule of each group is removed, in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuffixGroup {
    /// `-lah`, `-kah`, `-tah`, `-pun`
    Particle,
    /// `-ku`, `-mu`, `-nya`
    Possessive,
    /// `-kan`, `-an`, `-i`
    Derivational,
}

impl SuffixGroup {
    pub fn category(self) -> AffixCategory {
        match self {
            SuffixGroup::Particle | SuffixGroup::Possessive => AffixCategory::InflectionalSuffix,
            SuffixGroup::Derivational => AffixCategory::DerivationalSuffix,
        }
    }
}

fn default_recodes() -> Vec<String> {
    vec![String::new()]
}

fn default_min_stem_chars() -> usize {
    3
}

fn default_true() -> bool {
    true
}

/// A removable suffix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuffixRule {
    pub id: String,
    pub group: SuffixGroup,
    pub suffix: String,
    /// Strings appended to the stem after removal, tried in order.
    #[serde(default = "default_recodes")]
    pub recodes: Vec<String>,
    /// The remaining stem must have at least this many characters.
    #[serde(default = "default_min_stem_chars")]
    pub min_stem_chars: usize,
    /// The remaining stem must contain a vowel.
    #[serde(default = "default_true")]
    pub requires_vowel: bool,
    /// The rule does not apply when the remaining stem ends with one of these.
    #[serde(default)]
    pub forbidden_endings: Vec<String>,
}

impl SuffixRule {
    fn new(id: &str, group: SuffixGroup, suffix: &str) -> Self {
        SuffixRule {
            id: id.to_string(),
            group,
            suffix: suffix.to_string(),
            recodes: default_recodes(),
            min_stem_chars: default_min_stem_chars(),
            requires_vowel: true,
            forbidden_endings: Vec::new(),
        }
    }

    fn with_recodes(mut self, recodes: &[&str]) -> Self {
        self.recodes = recodes.iter().map(|r| r.to_string()).collect();
        self
    }

    fn forbid_ending(mut self, ending: &str) -> Self {
        self.forbidden_endings.push(ending.to_string());
        self
    }

    /// Remove the suffix from `word` if the rule's preconditions hold.
    ///
    /// Returns the bare stem before any recode is appended.
    pub fn strip<'a>(&self, word: &'a str) -> Option<&'a str> {
        let stem = word.strip_suffix(self.suffix.as_str())?;
        if stem.chars().count() < self.min_stem_chars {
            return None;
        }
        if self.requires_vowel && !has_vowel(stem) {
            return None;
        }
        if self.forbidden_endings.iter().any(|e| stem.ends_with(e.as_str())) {
            return None;
        }
        Some(stem)
    }

    /// The suffix actually consumed when `recode` is put back.
    ///
    /// Removing `-kan` and restoring `k` amounts to removing `-an`.
    pub fn effective_suffix(&self, recode: &str) -> &str {
        self.suffix
            .strip_prefix(recode)
            .unwrap_or(self.suffix.as_str())
    }
}

/// Serializable form of a prefix rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixRuleSpec {
    pub id: String,
    /// Prefix family (`be`, `di`, `ke`, `me`, `pe`, `se`, `te`). A family is
    /// removed at most once per word.
    pub prefix: String,
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,
    /// Capture templates producing candidate stems, tried in order.
    pub recodes: Vec<String>,
}

/// A compiled prefix rule.
#[derive(Clone, Debug)]
pub struct PrefixRule {
    id: String,
    prefix: String,
    pattern: Regex,
    exclude: Option<Regex>,
    recodes: Vec<String>,
}

impl PrefixRule {
    fn compile(spec: &PrefixRuleSpec) -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| {
                AkarError::artifact(format!("prefix rule {}: invalid pattern: {e}", spec.id))
            })
        };

        if spec.recodes.is_empty() {
            return Err(AkarError::artifact(format!(
                "prefix rule {} has no recodes",
                spec.id
            )));
        }

        Ok(PrefixRule {
            id: spec.id.clone(),
            prefix: spec.prefix.clone(),
            pattern: compile(&spec.pattern)?,
            exclude: spec.exclude.as_deref().map(compile).transpose()?,
            recodes: spec.recodes.clone(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Candidate stems for `word`, or an empty list when the rule does not match.
    pub fn apply(&self, word: &str) -> Vec<String> {
        if self.exclude.as_ref().is_some_and(|re| re.is_match(word)) {
            return Vec::new();
        }
        let Some(caps) = self.pattern.captures(word) else {
            return Vec::new();
        };

        self.recodes
            .iter()
            .filter_map(|template| {
                let mut candidate = String::new();
                caps.expand(template, &mut candidate);
                (!candidate.is_empty() && candidate != word).then_some(candidate)
            })
            .collect()
    }
}

/// A prefix and derivational suffix that never occur together.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisallowedPair {
    pub prefix: String,
    pub suffix: String,
}

/// The complete rule table in its serializable form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTableSpec {
    pub suffixes: Vec<SuffixRule>,
    pub prefixes: Vec<PrefixRuleSpec>,
    #[serde(default)]
    pub disallowed_pairs: Vec<DisallowedPair>,
}

fn prefix(id: &str, family: &str, pattern: &str, exclude: Option<&str>, recodes: &[&str]) -> PrefixRuleSpec {
    PrefixRuleSpec {
        id: id.to_string(),
        prefix: family.to_string(),
        pattern: pattern.to_string(),
        exclude: exclude.map(str::to_string),
        recodes: recodes.iter().map(|r| r.to_string()).collect(),
    }
}

impl RuleTableSpec {
    /// The built-in Indonesian rule table.
    pub fn default_indonesian() -> Self {
        use SuffixGroup::*;

        let suffixes = vec![
            SuffixRule::new("particle-lah", Particle, "lah"),
            SuffixRule::new("particle-kah", Particle, "kah"),
            SuffixRule::new("particle-tah", Particle, "tah"),
            SuffixRule::new("particle-pun", Particle, "pun"),
            SuffixRule::new("possessive-nya", Possessive, "nya"),
            SuffixRule::new("possessive-ku", Possessive, "ku"),
            SuffixRule::new("possessive-mu", Possessive, "mu"),
            SuffixRule::new("suffix-kan", Derivational, "kan").with_recodes(&["", "k"]),
            SuffixRule::new("suffix-an", Derivational, "an"),
            SuffixRule::new("suffix-i", Derivational, "i").forbid_ending("s"),
        ];

        const C: &str = "[bcdfghjklmnpqrstvwxyz]";
        const C_NO_R: &str = "[bcdfghjklmnpqstvwxyz]";
        let p = |s: &str| s.replace("{C}", C).replace("{Cr}", C_NO_R);

        let prefixes = vec![
            // di-, ke-, se-
            prefix("di", "di", "^di(.+)$", None, &["${1}"]),
            prefix("ke", "ke", "^ke(.+)$", None, &["${1}"]),
            prefix("se", "se", "^se(.+)$", None, &["${1}"]),
            // ber-, be-
            prefix("ber-vowel", "be", "^ber([aiueo].*)$", None, &["${1}", "r${1}"]),
            prefix("belajar", "be", "^belajar$", None, &["ajar"]),
            prefix("ber-cerv", "be", &p("^ber({Cr}[a-z]er[aiueo].*)$"), None, &["${1}"]),
            prefix(
                "ber-consonant",
                "be",
                &p("^ber({Cr}[a-z].*)$"),
                Some(&p("^ber{Cr}[a-z]er[aiueo]")),
                &["${1}"],
            ),
            prefix("be-cerc", "be", &p("^be({Cr}er{C}.*)$"), Some("^ber"), &["${1}"]),
            // ter-, te-
            prefix("ter-vowel", "te", "^ter([aiueo].*)$", None, &["${1}", "r${1}"]),
            prefix("ter-cerv", "te", &p("^ter({Cr}er[aiueo].*)$"), None, &["${1}"]),
            prefix(
                "ter-consonant",
                "te",
                &p("^ter({Cr}.*)$"),
                Some(&p("^ter{Cr}er[aiueo]")),
                &["${1}"],
            ),
            prefix("te-cerc", "te", &p("^te({Cr}er{C}.*)$"), Some("^ter"), &["${1}"]),
            // me-
            prefix("me-lrwy", "me", "^me([lrwy][aiueo].*)$", None, &["${1}"]),
            prefix("mem-bfv", "me", "^mem([bfv].*)$", None, &["${1}"]),
            prefix("mempe", "me", "^mempe(.*)$", None, &["pe${1}"]),
            prefix("mem-p", "me", "^mem(p[a-df-z].*)$", None, &["${1}"]),
            prefix("mem-vowel", "me", "^mem(r?[aiueo].*)$", None, &["m${1}", "p${1}"]),
            prefix("men-cdjz", "me", "^men([cdjz].*)$", None, &["${1}"]),
            prefix("men-vowel", "me", "^men([aiueo].*)$", None, &["n${1}", "t${1}"]),
            prefix("meng-ghqk", "me", "^meng([ghqk].*)$", None, &["${1}"]),
            prefix("meng-vowel", "me", "^meng([aiueo].*)$", None, &["${1}", "k${1}"]),
            prefix("menge", "me", &p("^menge({C}.*)$"), None, &["${1}"]),
            prefix("meny-vowel", "me", "^meny([aiueo].*)$", None, &["s${1}", "ny${1}"]),
            // per-, pe-
            prefix("pe-wy", "pe", "^pe([wy][aiueo].*)$", None, &["${1}"]),
            prefix("per-vowel", "pe", "^per([aiueo].*)$", None, &["${1}", "r${1}"]),
            prefix("per-cerv", "pe", &p("^per({Cr}[a-z]er[aiueo].*)$"), None, &["${1}"]),
            prefix(
                "per-consonant",
                "pe",
                &p("^per({Cr}[a-z].*)$"),
                Some(&p("^per{Cr}[a-z]er[aiueo]")),
                &["${1}"],
            ),
            prefix("pem-bfv", "pe", "^pem([bfv].*)$", None, &["${1}"]),
            prefix("pem-vowel", "pe", "^pem(r?[aiueo].*)$", None, &["m${1}", "p${1}"]),
            prefix("pen-cdjz", "pe", "^pen([cdjz].*)$", None, &["${1}"]),
            prefix("pen-vowel", "pe", "^pen([aiueo].*)$", None, &["n${1}", "t${1}"]),
            prefix("peng-ghqk", "pe", "^peng([ghqk].*)$", None, &["${1}"]),
            prefix("peng-vowel", "pe", "^peng([aiueo].*)$", None, &["${1}", "k${1}"]),
            prefix("penge", "pe", &p("^penge({C}.*)$"), None, &["${1}"]),
            prefix("peny-vowel", "pe", "^peny([aiueo].*)$", None, &["s${1}", "ny${1}"]),
            prefix("pelajar", "pe", "^pelajar$", None, &["ajar"]),
            prefix("pel-vowel", "pe", "^pel([aiueo].*)$", None, &["l${1}"]),
            prefix("pe-consonant", "pe", &p("^pe({C}.*)$"), Some("^pe[rwylmn]"), &["${1}"]),
        ];

        let disallowed_pairs = [
            ("be", "i"),
            ("di", "an"),
            ("ke", "i"),
            ("ke", "kan"),
            ("me", "an"),
            ("se", "i"),
            ("se", "kan"),
            ("te", "an"),
        ]
        .into_iter()
        .map(|(prefix, suffix)| DisallowedPair {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        })
        .collect();

        RuleTableSpec {
            suffixes,
            prefixes,
            disallowed_pairs,
        }
    }
}

static DEFAULT_INDONESIAN_RULES: LazyLock<AffixRuleSet> = LazyLock::new(|| {
    AffixRuleSet::from_spec(&RuleTableSpec::default_indonesian())
        .expect("built-in rule table compiles")
});

/// Compiled, ordered affix rules.
#[derive(Clone, Debug)]
pub struct AffixRuleSet {
    suffixes: Vec<SuffixRule>,
    prefixes: Vec<PrefixRule>,
    disallowed_pairs: Vec<DisallowedPair>,
}

impl AffixRuleSet {
    /// The built-in Indonesian rule set.
    pub fn default_indonesian() -> Self {
        DEFAULT_INDONESIAN_RULES.clone()
    }

    /// Compile and validate a rule table.
    pub fn from_spec(spec: &RuleTableSpec) -> Result<Self> {
        let mut ids = AHashSet::new();
        for id in spec
            .suffixes
            .iter()
            .map(|r| &r.id)
            .chain(spec.prefixes.iter().map(|r| &r.id))
        {
            if !ids.insert(id.as_str()) {
                return Err(AkarError::artifact(format!("duplicate rule id: {id}")));
            }
        }

        for rule in &spec.suffixes {
            if rule.suffix.is_empty() {
                return Err(AkarError::artifact(format!(
                    "suffix rule {} has an empty suffix",
                    rule.id
                )));
            }
            if rule.recodes.is_empty() {
                return Err(AkarError::artifact(format!(
                    "suffix rule {} has no recodes",
                    rule.id
                )));
            }
        }

        let prefixes = spec
            .prefixes
            .iter()
            .map(PrefixRule::compile)
            .collect::<Result<Vec<_>>>()?;

        Ok(AffixRuleSet {
            suffixes: spec.suffixes.clone(),
            prefixes,
            disallowed_pairs: spec.disallowed_pairs.clone(),
        })
    }

    /// Load a JSON rule table.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AkarError::artifact(format!("failed to read rules {}: {e}", path.display()))
        })?;
        let spec: RuleTableSpec = serde_json::from_str(&content).map_err(|e| {
            AkarError::artifact(format!("malformed rules {}: {e}", path.display()))
        })?;
        Self::from_spec(&spec)
    }

    /// Suffix rules of one group, in application order.
    pub fn suffixes(&self, group: SuffixGroup) -> impl Iterator<Item = &SuffixRule> {
        self.suffixes.iter().filter(move |r| r.group == group)
    }

    /// Prefix rules in priority order.
    pub fn prefixes(&self) -> &[PrefixRule] {
        &self.prefixes
    }

    /// Whether `suffix` is an inflectional suffix (particle or possessive).
    pub fn is_inflectional_suffix(&self, suffix: &str) -> bool {
        self.suffixes
            .iter()
            .any(|r| r.group.category() == AffixCategory::InflectionalSuffix && r.suffix == suffix)
    }

    /// Whether a word may not carry both `prefix` and derivational `suffix`.
    pub fn is_disallowed(&self, prefix: &str, suffix: &str) -> bool {
        self.disallowed_pairs
            .iter()
            .any(|pair| pair.prefix == prefix && pair.suffix == suffix)
    }

    pub fn suffix_rule_count(&self) -> usize {
        self.suffixes.len()
    }

    pub fn prefix_rule_count(&self) -> usize {
        self.prefixes.len()
    }
}

impl Default for AffixRuleSet {
    fn default() -> Self {
        Self::default_indonesian()
    }
}

pub(crate) fn has_vowel(s: &str) -> bool {
    s.chars().any(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'))
}
