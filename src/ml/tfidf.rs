//! TF-IDF vectorizer over a frozen vocabulary.
//!
//! At inference time the vectorizer is read-only: the term index, IDF weights,
//! n-gram range, TF scheme and norm all come from the vocabulary artifact that
//! was written when the classifier was trained. [`TfIdfVectorizer::fit`] exists
//! for the offline training path only.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{AkarError, Result};
use crate::ml::features::{FeatureVector, l2_norm};
use crate::pipeline::document::Document;

/// How raw term counts are turned into term frequencies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TfScheme {
    /// The count itself.
    #[default]
    Raw,
    /// Count divided by the number of terms in the document.
    Relative,
    /// `1 + ln(count)`.
    Sublinear,
}

/// Normalization applied to the weighted vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorNorm {
    None,
    L1,
    #[default]
    L2,
}

/// Document-frequency pruning used when fitting a vocabulary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    pub ngram_range: (usize, usize),
    /// Terms in fewer documents are dropped.
    pub min_df: usize,
    /// Terms in more than this share of documents are dropped.
    pub max_df: f32,
    pub max_features: Option<usize>,
    pub tf: TfScheme,
    pub norm: VectorNorm,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            ngram_range: (1, 2),
            min_df: 2,
            max_df: 0.85,
            max_features: Some(5000),
            tf: TfScheme::Raw,
            norm: VectorNorm::L2,
        }
    }
}

fn default_ngram_range() -> (usize, usize) {
    (1, 2)
}

/// On-disk form of the vocabulary.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VocabularyArtifact {
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default)]
    tf: TfScheme,
    #[serde(default)]
    norm: VectorNorm,
    /// Terms in index order.
    terms: Vec<String>,
    idf: Vec<f32>,
}

/// Frozen TF-IDF vectorizer.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "VocabularyArtifact", into = "VocabularyArtifact")]
pub struct TfIdfVectorizer {
    ngram_range: (usize, usize),
    tf: TfScheme,
    norm: VectorNorm,
    terms: Vec<String>,
    idf: Vec<f32>,
    /// term -> index
    index: AHashMap<String, usize>,
}

impl TryFrom<VocabularyArtifact> for TfIdfVectorizer {
    type Error = AkarError;

    fn try_from(artifact: VocabularyArtifact) -> Result<Self> {
        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(AkarError::artifact(format!(
                "invalid ngram_range ({min_n}, {max_n})"
            )));
        }
        if artifact.terms.len() != artifact.idf.len() {
            return Err(AkarError::artifact(format!(
                "vocabulary has {} terms but {} idf weights",
                artifact.terms.len(),
                artifact.idf.len()
            )));
        }
        if let Some(weight) = artifact.idf.iter().find(|w| !w.is_finite()) {
            return Err(AkarError::artifact(format!("non-finite idf weight: {weight}")));
        }

        let mut index = AHashMap::with_capacity(artifact.terms.len());
        for (i, term) in artifact.terms.iter().enumerate() {
            if term.is_empty() {
                return Err(AkarError::artifact(format!("empty term at index {i}")));
            }
            if index.insert(term.clone(), i).is_some() {
                return Err(AkarError::artifact(format!("duplicate term: {term}")));
            }
        }

        Ok(TfIdfVectorizer {
            ngram_range: artifact.ngram_range,
            tf: artifact.tf,
            norm: artifact.norm,
            terms: artifact.terms,
            idf: artifact.idf,
            index,
        })
    }
}

impl From<TfIdfVectorizer> for VocabularyArtifact {
    fn from(vectorizer: TfIdfVectorizer) -> Self {
        VocabularyArtifact {
            ngram_range: vectorizer.ngram_range,
            tf: vectorizer.tf,
            norm: vectorizer.norm,
            terms: vectorizer.terms,
            idf: vectorizer.idf,
        }
    }
}

/// Contiguous n-grams of `roots` for every `n` in the range, joined by a space.
fn ngrams(roots: &[&str], (min_n, max_n): (usize, usize)) -> Vec<String> {
    let mut grams = Vec::new();
    for n in min_n..=max_n {
        if n > roots.len() {
            break;
        }
        grams.extend(roots.windows(n).map(|window| window.join(" ")));
    }
    grams
}

impl TfIdfVectorizer {
    /// Build a vectorizer from explicit terms and IDF weights.
    pub fn from_parts(
        terms: Vec<String>,
        idf: Vec<f32>,
        ngram_range: (usize, usize),
        tf: TfScheme,
        norm: VectorNorm,
    ) -> Result<Self> {
        Self::try_from(VocabularyArtifact {
            ngram_range,
            tf,
            norm,
            terms,
            idf,
        })
    }

    /// Load a vocabulary artifact from JSON.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AkarError::artifact(format!("failed to read vocabulary {}: {e}", path.display()))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            AkarError::artifact(format!("malformed vocabulary {}: {e}", path.display()))
        })
    }

    /// Write the vocabulary artifact as JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Fit a vocabulary on training documents.
    ///
    /// IDF is smoothed: `ln((N + 1) / (df + 1)) + 1`. When `max_features`
    /// truncates, the most frequent terms (by document frequency, then
    /// lexically) are kept. Indices are assigned in lexical order.
    pub fn fit(documents: &[Document], options: &FitOptions) -> Result<Self> {
        if documents.is_empty() {
            return Err(AkarError::invalid_input("cannot fit a vocabulary on zero documents"));
        }
        let (min_n, max_n) = options.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(AkarError::config(format!(
                "invalid ngram_range ({min_n}, {max_n})"
            )));
        }

        let mut document_frequency: AHashMap<String, usize> = AHashMap::new();
        for document in documents {
            let unique: BTreeSet<String> = ngrams(&document.roots(), options.ngram_range)
                .into_iter()
                .collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let n_documents = documents.len();
        let max_doc_count = options.max_df * n_documents as f32;
        let mut kept: Vec<(String, usize)> = document_frequency
            .into_iter()
            .filter(|(_, df)| *df >= options.min_df && *df as f32 <= max_doc_count)
            .collect();
        if kept.is_empty() {
            return Err(AkarError::classification(
                "no terms remain after document-frequency pruning",
            ));
        }

        if let Some(max_features) = options.max_features {
            kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            kept.truncate(max_features);
        }
        kept.sort_by(|a, b| a.0.cmp(&b.0));

        let n = n_documents as f32;
        let (terms, idf): (Vec<String>, Vec<f32>) = kept
            .into_iter()
            .map(|(term, df)| {
                let weight = ((n + 1.0) / (df as f32 + 1.0)).ln() + 1.0;
                (term, weight)
            })
            .unzip();

        Self::from_parts(terms, idf, options.ngram_range, options.tf, options.norm)
    }

    /// Map a document onto the frozen vocabulary.
    ///
    /// Out-of-vocabulary terms contribute nothing; the dimension is always
    /// [`TfIdfVectorizer::dimension`].
    pub fn vectorize(&self, document: &Document) -> FeatureVector {
        let grams = ngrams(&document.roots(), self.ngram_range);
        let mut values = vec![0.0f32; self.terms.len()];

        for gram in &grams {
            if let Some(&i) = self.index.get(gram) {
                values[i] += 1.0;
            }
        }

        let total = grams.len() as f32;
        for (i, value) in values.iter_mut().enumerate() {
            if *value == 0.0 {
                continue;
            }
            let tf = match self.tf {
                TfScheme::Raw => *value,
                TfScheme::Relative => *value / total,
                TfScheme::Sublinear => 1.0 + value.ln(),
            };
            *value = tf * self.idf[i];
        }

        let norm = match self.norm {
            VectorNorm::None => 0.0,
            VectorNorm::L1 => values.iter().map(|v| v.abs()).sum(),
            VectorNorm::L2 => l2_norm(&values),
        };
        if norm > 0.0 {
            for value in &mut values {
                *value /= norm;
            }
        }

        FeatureVector::new(document.fingerprint, values)
    }

    /// Size of the vocabulary, which is the length of every feature vector.
    pub fn dimension(&self) -> usize {
        self.terms.len()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn idf(&self) -> &[f32] {
        &self.idf
    }

    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn ngram_range(&self) -> (usize, usize) {
        self.ngram_range
    }

    pub fn tf_scheme(&self) -> TfScheme {
        self.tf
    }

    pub fn norm(&self) -> VectorNorm {
        self.norm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;
    use crate::pipeline::fingerprint::Fingerprint;

    fn document(text: &str) -> Document {
        let tokens = text
            .split_whitespace()
            .enumerate()
            .map(|(i, word)| Token::new(word, i))
            .collect();
        Document::new(Fingerprint::of(text), tokens)
    }

    fn vectorizer() -> TfIdfVectorizer {
        TfIdfVectorizer::from_parts(
            vec!["buku".into(), "main".into(), "main taman".into(), "taman".into()],
            vec![1.0, 1.5, 2.0, 1.0],
            (1, 2),
            TfScheme::Raw,
            VectorNorm::None,
        )
        .unwrap()
    }

    #[test]
    fn test_ngrams() {
        assert_eq!(
            ngrams(&["main", "di", "taman"], (1, 2)),
            vec!["main", "di", "taman", "main di", "di taman"]
        );
        assert_eq!(ngrams(&["main"], (2, 3)), Vec::<String>::new());
    }

    #[test]
    fn test_vectorize_ignores_oov() {
        let vector = vectorizer().vectorize(&document("main taman xyz"));

        assert_eq!(vector.values, vec![0.0, 1.5, 2.0, 1.0]);
        assert_eq!(vector.fingerprint, Fingerprint::of("main taman xyz"));
    }

    #[test]
    fn test_dimension_is_constant() {
        let vectorizer = vectorizer();
        let short = document("main taman buku");
        let long = document(&"main taman buku sayur ".repeat(75));

        assert_eq!(vectorizer.vectorize(&short).dimension(), 4);
        assert_eq!(vectorizer.vectorize(&long).dimension(), 4);
        assert_eq!(vectorizer.vectorize(&document("")).dimension(), 4);
    }

    #[test]
    fn test_l2_norm() {
        let vectorizer = TfIdfVectorizer::from_parts(
            vec!["a".into(), "b".into()],
            vec![3.0, 4.0],
            (1, 1),
            TfScheme::Raw,
            VectorNorm::L2,
        )
        .unwrap();

        let vector = vectorizer.vectorize(&document("a b"));
        assert!((vector.values[0] - 0.6).abs() < 1e-6);
        assert!((vector.values[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_tf_schemes() {
        let build = |tf| {
            TfIdfVectorizer::from_parts(vec!["a".into()], vec![1.0], (1, 1), tf, VectorNorm::None)
                .unwrap()
        };
        let doc = document("a a b b");

        assert_eq!(build(TfScheme::Raw).vectorize(&doc).values, vec![2.0]);
        assert_eq!(build(TfScheme::Relative).vectorize(&doc).values, vec![0.5]);
        let sublinear = build(TfScheme::Sublinear).vectorize(&doc).values[0];
        assert!((sublinear - (1.0 + 2.0f32.ln())).abs() < 1e-6);
    }

    #[test]
    fn test_fit_prunes_by_document_frequency() {
        let documents = vec![
            document("tani padi sawah"),
            document("tani padi pupuk"),
            document("tani jagung sawah"),
            document("tani kopi kebun"),
        ];
        let options = FitOptions {
            ngram_range: (1, 1),
            ..FitOptions::default()
        };

        let vectorizer = TfIdfVectorizer::fit(&documents, &options).unwrap();

        // "tani" is in every document (> 0.85), singletons are under min_df
        assert_eq!(vectorizer.terms(), &["padi".to_string(), "sawah".to_string()]);
        let expected = (5.0f32 / 3.0).ln() + 1.0;
        assert!((vectorizer.idf()[0] - expected).abs() < 1e-6);
    }

    #[test]
    fn test_fit_max_features_and_bigrams() {
        let documents = vec![
            document("padi sawah subur"),
            document("padi sawah subur"),
            document("padi sawah kering"),
            document("kopi kebun"),
            document("kopi kebun"),
        ];
        let options = FitOptions {
            max_features: Some(2),
            ..FitOptions::default()
        };

        let vectorizer = TfIdfVectorizer::fit(&documents, &options).unwrap();
        // df: padi 3, sawah 3, "padi sawah" 3, kopi 2, kebun 2, ...
        assert_eq!(
            vectorizer.terms(),
            &["padi".to_string(), "padi sawah".to_string()]
        );
    }

    #[test]
    fn test_fit_errors() {
        assert!(TfIdfVectorizer::fit(&[], &FitOptions::default()).is_err());

        let documents = vec![document("satu"), document("dua")];
        let err = TfIdfVectorizer::fit(&documents, &FitOptions::default()).unwrap_err();
        assert!(err.to_string().contains("no terms remain"));
    }

    #[test]
    fn test_invalid_artifacts() {
        let mismatch =
            TfIdfVectorizer::from_parts(vec!["a".into()], vec![], (1, 1), TfScheme::Raw, VectorNorm::L2);
        assert!(matches!(mismatch, Err(AkarError::Artifact(_))));

        let duplicate = TfIdfVectorizer::from_parts(
            vec!["a".into(), "a".into()],
            vec![1.0, 1.0],
            (1, 1),
            TfScheme::Raw,
            VectorNorm::L2,
        );
        assert!(duplicate.is_err());

        let bad_range =
            TfIdfVectorizer::from_parts(vec![], vec![], (2, 1), TfScheme::Raw, VectorNorm::L2);
        assert!(bad_range.is_err());

        let json = r#"{"terms": ["a"], "idf": [null]}"#;
        assert!(serde_json::from_str::<TfIdfVectorizer>(json).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocabulary.json");

        let vectorizer = vectorizer();
        vectorizer.save(&path).unwrap();
        let loaded = TfIdfVectorizer::load(&path).unwrap();

        assert_eq!(loaded.terms(), vectorizer.terms());
        assert_eq!(loaded.term_index("main taman"), Some(2));
        assert_eq!(loaded.ngram_range(), (1, 2));
    }
}
