use regex::Regex;
use serde::{Deserialize, Serialize};
use sprs::CsMat;
use std::collections::{BTreeMap, HashMap};

use crate::shared::{
    config::TfidfConfig,
    errors::{AppError, AppResult},
};

use super::{stop_words::is_stop_word, text_normalizer::TextNormalizer};

/// Tokens are runs of word characters
pub const TOKEN_PATTERN: &str = r"\w+";

/// Splits a document into word n-grams
struct Analyzer {
    normalizer: TextNormalizer,
    token_re: Regex,
    ngram_range: (usize, usize),
    use_stop_words: bool,
}

impl Analyzer {
    fn new(config: &TfidfConfig) -> AppResult<Self> {
        let token_re = Regex::new(TOKEN_PATTERN)
            .map_err(|e| AppError::InternalError(format!("Invalid token pattern: {}", e)))?;
        Ok(Self {
            normalizer: TextNormalizer::from_config(config),
            token_re,
            ngram_range: config.ngram_range,
            use_stop_words: config.use_stop_words,
        })
    }

    fn analyze(&self, doc: &str) -> Vec<String> {
        let normalized = self.normalizer.normalize(doc);
        let tokens: Vec<&str> = self
            .token_re
            .find_iter(&normalized)
            .map(|m| m.as_str())
            .filter(|t| !(self.use_stop_words && is_stop_word(t)))
            .collect();

        let (low, high) = self.ngram_range;
        let mut terms = Vec::new();
        for size in low..=high {
            if size > tokens.len() {
                break;
            }
            terms.extend(tokens.windows(size).map(|w| w.join(" ")));
        }
        terms
    }

    fn term_counts(&self, doc: &str) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for term in self.analyze(doc) {
            *counts.entry(term).or_insert(0) += 1;
        }
        counts
    }
}

/// TF-IDF weighting of word n-grams with L2-normalized rows
///
/// Term frequencies are raw counts. The inverse document frequency is
/// smoothed as `ln((1 + n) / (1 + df)) + 1`, so terms present in every
/// document still carry weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    config: TfidfConfig,
    /// Term to column, in sorted term order
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    pub fn new(config: TfidfConfig) -> Self {
        Self {
            config,
            vocabulary: BTreeMap::new(),
            idf: Vec::new(),
        }
    }

    pub fn config(&self) -> &TfidfConfig {
        &self.config
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Terms in column order
    pub fn feature_names(&self) -> Vec<&str> {
        self.vocabulary.keys().map(String::as_str).collect()
    }

    pub fn idf(&self, term: &str) -> Option<f32> {
        self.vocabulary.get(term).map(|&col| self.idf[col])
    }

    /// Learn the vocabulary and idf from `docs`, returning their TF-IDF rows
    pub fn fit_transform(&mut self, docs: &[&str]) -> AppResult<CsMat<f32>> {
        self.config
            .validate()
            .map_err(AppError::ValidationError)?;
        let analyzer = Analyzer::new(&self.config)?;
        let counts: Vec<HashMap<String, usize>> =
            docs.iter().map(|doc| analyzer.term_counts(doc)).collect();

        let mut document_frequency: HashMap<&str, usize> = HashMap::new();
        for doc in &counts {
            for term in doc.keys() {
                *document_frequency.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let kept: BTreeMap<&str, usize> = document_frequency
            .into_iter()
            .filter(|(_, df)| *df >= self.config.min_df)
            .collect();
        if kept.is_empty() {
            return Err(AppError::ModelError(format!(
                "After pruning, no terms remain (min_df = {}, documents = {})",
                self.config.min_df,
                docs.len()
            )));
        }

        let n_docs = docs.len() as f32;
        self.vocabulary = kept
            .keys()
            .enumerate()
            .map(|(col, term)| (term.to_string(), col))
            .collect();
        self.idf = kept
            .values()
            .map(|&df| ((1.0 + n_docs) / (1.0 + df as f32)).ln() + 1.0)
            .collect();

        log::debug!(
            "TF-IDF vocabulary has {} terms over {} documents",
            self.vocabulary.len(),
            docs.len()
        );
        self.build_matrix(&counts)
    }

    /// TF-IDF rows for new documents using the fitted vocabulary
    pub fn transform(&self, docs: &[&str]) -> AppResult<CsMat<f32>> {
        if self.vocabulary.is_empty() {
            return Err(AppError::ModelError(
                "TF-IDF vectorizer is not fitted".to_string(),
            ));
        }
        let analyzer = Analyzer::new(&self.config)?;
        let counts: Vec<HashMap<String, usize>> =
            docs.iter().map(|doc| analyzer.term_counts(doc)).collect();
        self.build_matrix(&counts)
    }

    fn build_matrix(&self, counts: &[HashMap<String, usize>]) -> AppResult<CsMat<f32>> {
        let mut indptr = Vec::with_capacity(counts.len() + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0usize);

        for doc in counts {
            let mut row: Vec<(usize, f32)> = doc
                .iter()
                .filter_map(|(term, &count)| {
                    self.vocabulary
                        .get(term)
                        .map(|&col| (col, count as f32 * self.idf[col]))
                })
                .collect();
            row.sort_by_key(|(col, _)| *col);

            let norm = row.iter().map(|(_, v)| v * v).sum::<f32>().sqrt();
            for (col, value) in row {
                indices.push(col);
                data.push(if norm > 0.0 { value / norm } else { 0.0 });
            }
            indptr.push(indices.len());
        }

        CsMat::try_new((counts.len(), self.vocabulary.len()), indptr, indices, data).map_err(
            |(_, _, _, e)| AppError::InternalError(format!("Invalid TF-IDF matrix: {}", e)),
        )
    }
}
