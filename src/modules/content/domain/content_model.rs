use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::modules::catalog::{AnimeCatalog, AnimeRecommendation, AnimeRecord};
use crate::shared::{
    config::ContentBasedModelConfig,
    errors::{AppError, AppResult},
};

use super::{similarity_index::SimilarityIndex, tfidf_vectorizer::TfidfVectorizer};

/// Trained content model: the fitted vectorizer, the neighbor lists and the
/// anime each similarity row stands for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentModel {
    pub vectorizer: TfidfVectorizer,
    pub similarity: SimilarityIndex,
    /// Row `i` of the similarity index describes `items[i]`
    pub items: Vec<(i64, AnimeRecommendation)>,
}

impl ContentModel {
    /// Fit on the complete records, one row per anime id
    pub fn fit(records: &[AnimeRecord], config: &ContentBasedModelConfig) -> AppResult<Self> {
        config.validate().map_err(AppError::ValidationError)?;

        let mut seen = HashSet::new();
        let usable: Vec<&AnimeRecord> = records
            .iter()
            .filter(|r| r.is_complete())
            .filter(|r| seen.insert(r.anime_id))
            .collect();
        log::info!(
            "Content model uses {} of {} anime (rows with missing values dropped)",
            usable.len(),
            records.len()
        );
        if usable.is_empty() {
            return Err(AppError::ModelError(
                "No anime with genres, image url and rating to train on".to_string(),
            ));
        }

        let docs: Vec<&str> = usable
            .iter()
            .map(|r| r.genres.as_deref().unwrap_or_default())
            .collect();
        let mut vectorizer = TfidfVectorizer::new(config.tfidf.clone());
        let matrix = vectorizer.fit_transform(&docs)?;
        let similarity = SimilarityIndex::build(&matrix, config.max_neighbors);

        Ok(Self {
            vectorizer,
            similarity,
            items: usable
                .iter()
                .map(|r| (r.anime_id, AnimeRecommendation::from(*r)))
                .collect(),
        })
    }

    pub fn catalog(&self) -> AnimeCatalog {
        AnimeCatalog::from_entries(self.items.iter().cloned())
    }

    pub fn check_consistency(&self) -> AppResult<()> {
        if self.similarity.len() != self.items.len() {
            return Err(AppError::ModelError(format!(
                "Content model has {} similarity rows for {} anime",
                self.similarity.len(),
                self.items.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::{TfidfConfig, TrainingPipelineConfig};

    fn complete(id: i64, name: &str, genres: &str) -> AnimeRecord {
        AnimeRecord {
            genres: Some(genres.to_string()),
            image_url: Some(format!("https://img/{}.jpg", id)),
            average_rating: Some(8.0),
            ..AnimeRecord::new(id, name)
        }
    }

    fn config() -> ContentBasedModelConfig {
        ContentBasedModelConfig {
            tfidf: TfidfConfig {
                min_df: 1,
                ..TfidfConfig::default()
            },
            ..ContentBasedModelConfig::new(&TrainingPipelineConfig::default())
        }
    }

    #[test]
    fn test_fit_drops_incomplete_and_duplicate_rows() {
        let records = vec![
            complete(1, "Naruto", "Action, Adventure"),
            AnimeRecord::new(2, "No Genres"),
            complete(1, "Naruto Again", "Drama"),
            complete(3, "Bleach", "Action, Supernatural"),
        ];

        let model = ContentModel::fit(&records, &config()).unwrap();

        assert_eq!(model.items.len(), 2);
        assert_eq!(model.items[1].0, 3);
        assert!(model.check_consistency().is_ok());
        assert_eq!(model.catalog().id_by_name("Bleach"), Some(3));
    }

    #[test]
    fn test_fit_without_usable_rows_fails() {
        let err = ContentModel::fit(&[AnimeRecord::new(1, "Naruto")], &config()).unwrap_err();
        assert!(matches!(err, AppError::ModelError(_)));
    }
}
