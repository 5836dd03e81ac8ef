use std::collections::{HashMap, HashSet};

use crate::modules::catalog::{AnimeCatalog, MergedRating, RatingRecord, RecommendationTable};
use crate::modules::collaborative::domain::{
    InteractionMatrix, KnnModel, KnnOrientation, SvdModel,
};
use crate::shared::{
    config::SvdConfig,
    errors::{AppError, AppResult},
    utils::{LogContext, Validator},
};

/// Rating-based recommendations over the merged dataset
///
/// Holds the anime catalog and the user x anime matrix. Models are trained
/// from the matrix and passed back in for inference, so a model loaded from
/// disk can be used the same way as a freshly trained one.
pub struct CollaborativeAnimeRecommender {
    catalog: AnimeCatalog,
    matrix: InteractionMatrix,
    svd_config: SvdConfig,
    exclude_rated: bool,
}

impl CollaborativeAnimeRecommender {
    pub fn new(rows: &[MergedRating]) -> AppResult<Self> {
        let ratings: Vec<RatingRecord> = rows.iter().map(MergedRating::as_rating).collect();
        let matrix = InteractionMatrix::build(&ratings)?;
        let catalog = AnimeCatalog::from_merged(rows);
        log::info!(
            "Collaborative recommender: {} users, {} anime, {} ratings",
            matrix.users().len(),
            catalog.len(),
            matrix.nnz()
        );

        Ok(Self {
            catalog,
            matrix,
            svd_config: SvdConfig::default(),
            exclude_rated: false,
        })
    }

    pub fn with_svd_config(mut self, config: SvdConfig) -> Self {
        self.svd_config = config;
        self
    }

    /// Leave out anime the user already rated from SVD recommendations
    pub fn with_exclude_rated(mut self, exclude_rated: bool) -> Self {
        self.exclude_rated = exclude_rated;
        self
    }

    pub fn catalog(&self) -> &AnimeCatalog {
        &self.catalog
    }

    pub fn matrix(&self) -> &InteractionMatrix {
        &self.matrix
    }

    pub fn train_svd(&self) -> AppResult<SvdModel> {
        SvdModel::fit(&self.matrix, &self.svd_config)
    }

    pub fn train_knn_item_based(&self) -> KnnModel {
        KnnModel::item_based(&self.matrix)
    }

    pub fn train_knn_user_based(&self) -> KnnModel {
        KnnModel::user_based(&self.matrix)
    }

    /// Highest predicted ratings for `user_id` across every anime
    pub fn get_svd_recommendations(
        &self,
        user_id: i64,
        n: usize,
        model: &SvdModel,
    ) -> AppResult<RecommendationTable> {
        Validator::validate_top_n(n)?;
        let query = format!("user {}", user_id);
        LogContext::recommendation("svd", &query, None);

        if !model.knows_user(user_id) {
            log::warn!(
                "User {} is not in the SVD model, predictions use item biases only",
                user_id
            );
        }

        let mut scored: Vec<(i64, f32)> = self
            .catalog
            .anime_ids()
            .iter()
            .filter(|&&anime_id| {
                !self.exclude_rated || self.matrix.rating(user_id, anime_id).is_none()
            })
            .map(|&anime_id| (anime_id, model.predict(user_id, anime_id)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        let table = self
            .catalog
            .table_for(scored.into_iter().take(n).map(|(id, _)| id));
        LogContext::recommendation("svd", &query, Some(table.len()));
        Ok(table)
    }

    /// Anime rated most like `anime_name` by the same users
    pub fn get_item_based_recommendations(
        &self,
        anime_name: &str,
        n: usize,
        model: &KnnModel,
    ) -> AppResult<RecommendationTable> {
        Validator::validate_anime_title(anime_name)?;
        Validator::validate_top_n(n)?;
        Self::expect_orientation(model, KnnOrientation::ItemBased)?;
        LogContext::recommendation("item-based knn", anime_name, None);

        let anime_id = self
            .catalog
            .id_by_name(anime_name)
            .ok_or_else(|| self.catalog.unknown_title(anime_name))?;
        let neighbors = model.neighbors(anime_id, n.saturating_add(1)).ok_or_else(|| {
            AppError::NotFound(format!(
                "Anime '{}' has no ratings in the item-based model",
                anime_name
            ))
        })?;

        let ids = neighbors
            .into_iter()
            .map(|(id, _)| id)
            .filter(|&id| id != anime_id)
            .take(n);
        let table = self.catalog.table_for(ids);
        LogContext::recommendation("item-based knn", anime_name, Some(table.len()));
        Ok(table)
    }

    /// Anime liked by the users closest to `user_id` that the user has not
    /// rated yet, ranked by the neighbors' average rating
    pub fn get_user_based_recommendations(
        &self,
        user_id: i64,
        n: usize,
        model: &KnnModel,
    ) -> AppResult<RecommendationTable> {
        Validator::validate_top_n(n)?;
        Self::expect_orientation(model, KnnOrientation::UserBased)?;
        let query = format!("user {}", user_id);
        LogContext::recommendation("user-based knn", &query, None);

        let neighbors = model
            .neighbors(user_id, n.saturating_add(1))
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;
        let rated: HashSet<i64> = model
            .row_entries(user_id)
            .into_iter()
            .map(|(anime_id, _)| anime_id)
            .collect();

        // (anime_id, sum, count) in order of first appearance
        let mut totals: Vec<(i64, f32, u32)> = Vec::new();
        let mut slots: HashMap<i64, usize> = HashMap::new();
        for (neighbor, _) in neighbors.into_iter().filter(|(id, _)| *id != user_id) {
            for (anime_id, rating) in model.row_entries(neighbor) {
                if rated.contains(&anime_id) {
                    continue;
                }
                let slot = *slots.entry(anime_id).or_insert_with(|| {
                    totals.push((anime_id, 0.0, 0));
                    totals.len() - 1
                });
                totals[slot].1 += rating;
                totals[slot].2 += 1;
            }
        }

        let mut averaged: Vec<(i64, f32)> = totals
            .into_iter()
            .map(|(anime_id, sum, count)| (anime_id, sum / count as f32))
            .collect();
        averaged.sort_by(|a, b| b.1.total_cmp(&a.1));

        let table = self
            .catalog
            .table_for(averaged.into_iter().take(n).map(|(id, _)| id));
        LogContext::recommendation("user-based knn", &query, Some(table.len()));
        Ok(table)
    }

    fn expect_orientation(model: &KnnModel, expected: KnnOrientation) -> AppResult<()> {
        if model.orientation() != expected {
            return Err(AppError::ModelError(format!(
                "Expected a {} KNN model, got a {} one",
                expected,
                model.orientation()
            )));
        }
        if !model.consistent() {
            return Err(AppError::ModelError(
                "KNN model index does not match its id maps".to_string(),
            ));
        }
        Ok(())
    }
}
