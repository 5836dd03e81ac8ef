use std::collections::HashSet;

use strsim::{jaro_winkler, normalized_levenshtein};

use crate::shared::errors::{AppError, AppResult};

/// Scores how close a typed title is to a catalog title, in `[0, 1]`
pub trait SimilarityStrategy: Send + Sync {
    fn calculate(&self, query: &str, target: &str) -> f64;

    fn name(&self) -> &'static str;
}

/// Prefix-weighted edit similarity, forgiving of truncated titles
#[derive(Debug, Clone, Copy, Default)]
pub struct JaroWinklerStrategy;

impl SimilarityStrategy for JaroWinklerStrategy {
    fn calculate(&self, query: &str, target: &str) -> f64 {
        jaro_winkler(query, target)
    }

    fn name(&self) -> &'static str {
        "jaro-winkler"
    }
}

/// Edit distance scaled by the longer title
#[derive(Debug, Clone, Copy, Default)]
pub struct LevenshteinStrategy;

impl SimilarityStrategy for LevenshteinStrategy {
    fn calculate(&self, query: &str, target: &str) -> f64 {
        normalized_levenshtein(query, target)
    }

    fn name(&self) -> &'static str {
        "levenshtein"
    }
}

/// Jaccard overlap of whitespace-separated words
///
/// Catches reordered titles ("Kyojin no Shingeki") that character metrics
/// punish.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordOverlapStrategy;

impl SimilarityStrategy for WordOverlapStrategy {
    fn calculate(&self, query: &str, target: &str) -> f64 {
        let left: HashSet<&str> = query.split_whitespace().collect();
        let right: HashSet<&str> = target.split_whitespace().collect();
        if left.is_empty() && right.is_empty() {
            return 1.0;
        }
        let shared = left.intersection(&right).count() as f64;
        shared / left.union(&right).count() as f64
    }

    fn name(&self) -> &'static str {
        "word-overlap"
    }
}

/// Weighted blend of several strategies
pub struct HybridStrategy {
    parts: Vec<(Box<dyn SimilarityStrategy>, f64)>,
}

impl HybridStrategy {
    /// Weights must be non-negative and add up to one
    pub fn new(parts: Vec<(Box<dyn SimilarityStrategy>, f64)>) -> AppResult<Self> {
        if parts.is_empty() {
            return Err(AppError::InvalidInput(
                "A hybrid title matcher needs at least one strategy".to_string(),
            ));
        }
        if let Some((strategy, weight)) = parts.iter().find(|(_, w)| *w < 0.0) {
            return Err(AppError::InvalidInput(format!(
                "Weight for {} is negative: {}",
                strategy.name(),
                weight
            )));
        }
        let total: f64 = parts.iter().map(|(_, w)| w).sum();
        if (total - 1.0).abs() > 1e-6 {
            return Err(AppError::InvalidInput(format!(
                "Title matcher weights add up to {}, expected 1",
                total
            )));
        }
        Ok(Self { parts })
    }

    /// Jaro-Winkler 0.6, Levenshtein 0.25, word overlap 0.15
    pub fn default_hybrid() -> Self {
        Self {
            parts: vec![
                (Box::new(JaroWinklerStrategy), 0.6),
                (Box::new(LevenshteinStrategy), 0.25),
                (Box::new(WordOverlapStrategy), 0.15),
            ],
        }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.parts.iter().map(|(s, _)| s.name()).collect()
    }
}

impl Default for HybridStrategy {
    fn default() -> Self {
        Self::default_hybrid()
    }
}

impl SimilarityStrategy for HybridStrategy {
    fn calculate(&self, query: &str, target: &str) -> f64 {
        if query == target {
            return 1.0;
        }
        self.parts
            .iter()
            .fold(0.0, |acc, (strategy, weight)| {
                acc + weight * strategy.calculate(query, target)
            })
            .clamp(0.0, 1.0)
    }

    fn name(&self) -> &'static str {
        "hybrid"
    }
}
