use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::modules::catalog::{csv_dataset::load_merged_csv, RecommendationTable};
use crate::modules::collaborative::{
    application::{ITEM_KNN_MODEL_KIND, SVD_MODEL_KIND, USER_KNN_MODEL_KIND},
    CollaborativeAnimeRecommender, KnnModel, ModelType, SvdModel,
};
use crate::modules::content::ContentBasedRecommender;
use crate::modules::popularity::{FilterType, PopularityBasedRecommender};
use crate::shared::{
    application::{Query, UseCase},
    config::{
        TrainingPipelineConfig, ANIME_FILE_NAME, CONTENT_BASED_MODEL_FILE_NAME,
        ITEM_KNN_MODEL_FILE_NAME, MERGED_FILE_NAME, RATING_FILE_NAME, SVD_MODEL_FILE_NAME,
        USER_KNN_MODEL_FILE_NAME,
    },
    domain::{ArtifactStore, DataIngestionArtifact},
    errors::AppResult,
    infrastructure::{load_model, CachingArtifactStore, FileArtifactStore},
};

use super::training_pipeline::{PipelineReport, TrainingPipeline};

/// Train everything, then the listed collaborative models
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainCommand {
    pub models: Vec<ModelType>,
    pub min_ratings_per_user: usize,
    pub min_ratings_per_anime: usize,
}

impl TrainCommand {
    pub fn new(models: Vec<ModelType>) -> Self {
        Self {
            models,
            min_ratings_per_user: 0,
            min_ratings_per_anime: 0,
        }
    }
}

pub struct TrainPipelineHandler {
    config: TrainingPipelineConfig,
    store: Arc<dyn ArtifactStore>,
}

impl TrainPipelineHandler {
    pub fn new(config: TrainingPipelineConfig) -> Self {
        Self {
            config,
            store: Arc::new(FileArtifactStore::new()),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn ArtifactStore>) -> Self {
        self.store = store;
        self
    }
}

impl UseCase<TrainCommand, PipelineReport> for TrainPipelineHandler {
    fn execute(&self, command: TrainCommand) -> AppResult<PipelineReport> {
        TrainingPipeline::new(self.config.clone())
            .with_store(self.store.clone())
            .with_min_ratings(command.min_ratings_per_user, command.min_ratings_per_anime)
            .run(&command.models)
    }
}

/// A recommendation request answered from the final model directory
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationQuery {
    Popular { filter: FilterType, n: usize },
    Content { title: String, n: usize },
    Svd { user_id: i64, n: usize },
    ItemKnn { anime_name: String, n: usize },
    UserKnn { user_id: i64, n: usize },
}

/// Serves recommendations from published models
pub struct RecommendationQueryHandler {
    model_dir: PathBuf,
    store: Arc<dyn ArtifactStore>,
}

impl RecommendationQueryHandler {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            store: Arc::new(CachingArtifactStore::new(Arc::new(FileArtifactStore::new()))),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn ArtifactStore>) -> Self {
        self.store = store;
        self
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    fn path(&self, file_name: &str) -> PathBuf {
        self.model_dir.join(file_name)
    }

    fn collaborative(&self) -> AppResult<CollaborativeAnimeRecommender> {
        let rows = load_merged_csv(&self.path(MERGED_FILE_NAME))?;
        CollaborativeAnimeRecommender::new(&rows)
    }
}

impl Query<RecommendationQuery, RecommendationTable> for RecommendationQueryHandler {
    fn execute(&self, query: RecommendationQuery) -> AppResult<RecommendationTable> {
        match query {
            RecommendationQuery::Popular { filter, n } => {
                PopularityBasedRecommender::new(DataIngestionArtifact {
                    feature_store_anime_file_path: self.path(ANIME_FILE_NAME),
                    feature_store_userrating_file_path: self.path(RATING_FILE_NAME),
                })
                .run(filter, n)
            }
            RecommendationQuery::Content { title, n } => ContentBasedRecommender::load(
                self.store.clone(),
                &self.path(CONTENT_BASED_MODEL_FILE_NAME),
            )?
            .recommend(&title, n),
            RecommendationQuery::Svd { user_id, n } => {
                let model: SvdModel = load_model(
                    self.store.as_ref(),
                    &self.path(SVD_MODEL_FILE_NAME),
                    SVD_MODEL_KIND,
                )?;
                self.collaborative()?
                    .get_svd_recommendations(user_id, n, &model)
            }
            RecommendationQuery::ItemKnn { anime_name, n } => {
                let model: KnnModel = load_model(
                    self.store.as_ref(),
                    &self.path(ITEM_KNN_MODEL_FILE_NAME),
                    ITEM_KNN_MODEL_KIND,
                )?;
                self.collaborative()?
                    .get_item_based_recommendations(&anime_name, n, &model)
            }
            RecommendationQuery::UserKnn { user_id, n } => {
                let model: KnnModel = load_model(
                    self.store.as_ref(),
                    &self.path(USER_KNN_MODEL_FILE_NAME),
                    USER_KNN_MODEL_KIND,
                )?;
                self.collaborative()?
                    .get_user_based_recommendations(user_id, n, &model)
            }
        }
    }
}
