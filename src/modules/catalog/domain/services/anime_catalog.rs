use std::collections::HashMap;

use crate::modules::catalog::domain::entities::{
    AnimeRecommendation, AnimeRecord, MergedRating, RecommendationTable,
};
use crate::shared::errors::AppError;

use super::title_similarity::{HybridStrategy, SimilarityStrategy};

/// Minimum similarity for a title to be offered as a suggestion
const SUGGESTION_THRESHOLD: f64 = 0.75;
const MAX_SUGGESTIONS: usize = 3;

/// Lookup table from anime identity to the metadata shown in results
///
/// Entries keep dataset order. When several rows share a name, lookups by
/// name resolve to the first one, matching how the dataset is indexed.
pub struct AnimeCatalog {
    entries: Vec<AnimeRecommendation>,
    ids: Vec<i64>,
    by_id: HashMap<i64, usize>,
    by_name: HashMap<String, usize>,
    similarity: Box<dyn SimilarityStrategy>,
}

impl AnimeCatalog {
    fn empty() -> Self {
        Self {
            entries: Vec::new(),
            ids: Vec::new(),
            by_id: HashMap::new(),
            by_name: HashMap::new(),
            similarity: Box::new(HybridStrategy::default_hybrid()),
        }
    }

    fn insert(&mut self, anime_id: i64, entry: AnimeRecommendation) {
        if self.by_id.contains_key(&anime_id) {
            return;
        }
        let idx = self.entries.len();
        self.by_name.entry(entry.name.clone()).or_insert(idx);
        self.by_id.insert(anime_id, idx);
        self.ids.push(anime_id);
        self.entries.push(entry);
    }

    pub fn from_records(records: &[AnimeRecord]) -> Self {
        let mut catalog = Self::empty();
        for record in records {
            catalog.insert(record.anime_id, AnimeRecommendation::from(record));
        }
        catalog
    }

    /// Build from the merged dataset; the first row of each anime wins
    pub fn from_merged(rows: &[MergedRating]) -> Self {
        let mut catalog = Self::empty();
        for row in rows {
            catalog.insert(row.anime_id, AnimeRecommendation::from(row));
        }
        catalog
    }

    /// Rebuild from `(anime_id, entry)` pairs, e.g. those stored in a model
    pub fn from_entries(entries: impl IntoIterator<Item = (i64, AnimeRecommendation)>) -> Self {
        let mut catalog = Self::empty();
        for (anime_id, entry) in entries {
            catalog.insert(anime_id, entry);
        }
        catalog
    }

    pub fn with_similarity(mut self, similarity: Box<dyn SimilarityStrategy>) -> Self {
        self.similarity = similarity;
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Anime ids in dataset order
    pub fn anime_ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn get(&self, anime_id: i64) -> Option<&AnimeRecommendation> {
        self.by_id.get(&anime_id).map(|&idx| &self.entries[idx])
    }

    pub fn id_by_name(&self, name: &str) -> Option<i64> {
        self.by_name.get(name).map(|&idx| self.ids[idx])
    }

    /// Dataset position of an anime
    pub fn position(&self, anime_id: i64) -> Option<usize> {
        self.by_id.get(&anime_id).copied()
    }

    pub fn id_at(&self, position: usize) -> Option<i64> {
        self.ids.get(position).copied()
    }

    /// `(anime_id, entry)` pairs in dataset order
    pub fn entries(&self) -> impl Iterator<Item = (i64, &AnimeRecommendation)> + '_ {
        self.ids.iter().copied().zip(self.entries.iter())
    }

    /// Project a ranked list of anime ids to a result table, skipping ids
    /// the catalog does not know
    pub fn table_for(&self, anime_ids: impl IntoIterator<Item = i64>) -> RecommendationTable {
        anime_ids
            .into_iter()
            .filter_map(|id| self.get(id).cloned())
            .collect()
    }

    /// Closest known titles to `name`, best first
    pub fn suggest(&self, name: &str) -> Vec<String> {
        let query = name.trim().to_lowercase();
        let mut scored: Vec<(f64, &str)> = self
            .by_name
            .keys()
            .map(|title| (self.similarity.calculate(&query, &title.to_lowercase()), title.as_str()))
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(_, title)| title.to_string())
            .collect()
    }

    /// `NotFound` error for an unknown title, with suggestions when any exist
    pub fn unknown_title(&self, name: &str) -> AppError {
        let suggestions = self.suggest(name);
        if suggestions.is_empty() {
            AppError::NotFound(format!("Anime title '{}' not found in the dataset", name))
        } else {
            AppError::NotFound(format!(
                "Anime title '{}' not found in the dataset. Did you mean: {}?",
                name,
                suggestions.join(", ")
            ))
        }
    }
}
