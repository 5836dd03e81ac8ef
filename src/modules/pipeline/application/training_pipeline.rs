use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::modules::collaborative::{CollaborativeModelTrainer, ModelType};
use crate::modules::content::ContentBasedModelTrainer;
use crate::modules::ingestion::DataIngestion;
use crate::modules::popularity::{application::DEFAULT_TOP_N, FilterType, PopularityBasedRecommender};
use crate::modules::transformation::DataTransformation;
use crate::shared::{
    config::{
        CollaborativeModelConfig, ContentBasedModelConfig, DataIngestionConfig,
        DataTransformationConfig, TrainingPipelineConfig, ITEM_KNN_MODEL_FILE_NAME,
        SVD_MODEL_FILE_NAME, USER_KNN_MODEL_FILE_NAME,
    },
    domain::{
        ArtifactStore, CollaborativeModelArtifact, ContentBasedModelArtifact,
        DataIngestionArtifact, DataTransformationArtifact,
    },
    errors::{AppError, AppResult},
    infrastructure::FileArtifactStore,
    utils::{LogContext, TimedOperation},
};

const STAGE: &str = "TrainingPipeline";

/// Wall-clock time spent in one pipeline stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTiming {
    pub stage: String,
    pub duration_ms: u64,
}

/// Everything a training run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub data_ingestion: DataIngestionArtifact,
    pub content_model: ContentBasedModelArtifact,
    pub data_transformation: DataTransformationArtifact,
    pub collaborative_model: CollaborativeModelArtifact,
    /// Files copied into the final model directory
    pub final_model_files: Vec<PathBuf>,
    /// Collaborative models from earlier runs deleted because this run did
    /// not retrain them
    #[serde(default)]
    pub removed_model_files: Vec<PathBuf>,
    pub timings: Vec<StageTiming>,
}

impl PipelineReport {
    pub fn total_duration_ms(&self) -> u64 {
        self.timings.iter().map(|t| t.duration_ms).sum()
    }
}

/// Runs every stage in order and publishes the trained models
pub struct TrainingPipeline {
    config: TrainingPipelineConfig,
    store: Arc<dyn ArtifactStore>,
    min_ratings: (usize, usize),
}

impl TrainingPipeline {
    pub fn new(config: TrainingPipelineConfig) -> Self {
        Self {
            config,
            store: Arc::new(FileArtifactStore::new()),
            min_ratings: (0, 0),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn ArtifactStore>) -> Self {
        self.store = store;
        self
    }

    /// Minimum ratings a user and an anime need to stay in the merged data
    pub fn with_min_ratings(mut self, per_user: usize, per_anime: usize) -> Self {
        self.min_ratings = (per_user, per_anime);
        self
    }

    pub fn config(&self) -> &TrainingPipelineConfig {
        &self.config
    }

    pub fn run(&self, models: &[ModelType]) -> AppResult<PipelineReport> {
        LogContext::stage(STAGE, "started");
        let timer = TimedOperation::new(STAGE);

        match self.run_stages(models) {
            Ok(report) => {
                timer.finish_with_info(&format!("{} stages", report.timings.len()));
                LogContext::stage(STAGE, "completed");
                Ok(report)
            }
            Err(e) => {
                LogContext::error_with_context(&e, STAGE);
                Err(e.with_context(STAGE))
            }
        }
    }

    fn run_stages(&self, models: &[ModelType]) -> AppResult<PipelineReport> {
        self.config.validate().map_err(AppError::ValidationError)?;
        log::info!(
            "Running {} into {}",
            self.config.pipeline_name,
            self.config.artifact_dir().display()
        );
        let mut timings = Vec::new();

        let data_ingestion = timed(&mut timings, "data_ingestion", || {
            DataIngestion::new(DataIngestionConfig::new(&self.config)).ingest_data()
        })?;

        timed(&mut timings, "popularity_report", || {
            let recommender = PopularityBasedRecommender::new(data_ingestion.clone());
            for filter in FilterType::ALL {
                recommender.run(filter, DEFAULT_TOP_N)?;
            }
            Ok(())
        })?;

        let content_model = timed(&mut timings, "content_based_model", || {
            ContentBasedModelTrainer::new(
                ContentBasedModelConfig::new(&self.config),
                data_ingestion.clone(),
            )
            .with_store(self.store.clone())
            .initiate_model_trainer()
        })?;

        let data_transformation = timed(&mut timings, "data_transformation", || {
            let (per_user, per_anime) = self.min_ratings;
            DataTransformation::new(
                data_ingestion.clone(),
                DataTransformationConfig::new(&self.config).with_min_ratings(per_user, per_anime),
            )
            .transform()
        })?;

        let collaborative_trainer = CollaborativeModelTrainer::new(
            CollaborativeModelConfig::new(&self.config),
            data_transformation.clone(),
        )
        .with_store(self.store.clone());
        let requested = dedup(models);
        let mut collaborative_model = CollaborativeModelArtifact::default();
        for &model_type in &requested {
            let artifact = timed(&mut timings, model_type.as_str(), || {
                collaborative_trainer.initiate_model_trainer(model_type)
            })?;
            collaborative_model = collaborative_model.merge(artifact);
        }

        let (final_model_files, removed_model_files) =
            timed(&mut timings, "publish_final_model", || {
                let mut sources = vec![
                    content_model.cosine_similarity_model_file_path.as_path(),
                    data_ingestion.feature_store_anime_file_path.as_path(),
                    data_transformation.merged_file_path.as_path(),
                ];
                sources.extend(collaborative_model.paths().into_iter().map(PathBuf::as_path));
                let published = self.publish(&sources)?;
                let removed = self.remove_stale_models(&requested)?;
                Ok((published, removed))
            })?;

        Ok(PipelineReport {
            data_ingestion,
            content_model,
            data_transformation,
            collaborative_model,
            final_model_files,
            removed_model_files,
            timings,
        })
    }

    /// Copy artifacts into the final model directory under their file names
    fn publish(&self, sources: &[&Path]) -> AppResult<Vec<PathBuf>> {
        sources
            .iter()
            .map(|source| {
                let file_name = source.file_name().ok_or_else(|| {
                    AppError::InternalError(format!(
                        "Artifact path has no file name: {}",
                        source.display()
                    ))
                })?;
                let target = self.config.final_model_path(file_name);
                let bytes = self.store.load(source)?;
                self.store.save(&target, &bytes)?;
                LogContext::artifact_saved("final model file", &target);
                Ok(target)
            })
            .collect()
    }

    /// Delete published collaborative models this run did not retrain
    fn remove_stale_models(&self, trained: &[ModelType]) -> AppResult<Vec<PathBuf>> {
        let mut removed = Vec::new();
        for model_type in ModelType::ALL {
            if trained.contains(&model_type) {
                continue;
            }
            let path = self.config.final_model_path(published_file_name(model_type));
            if self.store.exists(&path) {
                log::warn!(
                    "Removing {} model from an earlier run: {}",
                    model_type,
                    path.display()
                );
                self.store.remove(&path)?;
                removed.push(path);
            }
        }
        Ok(removed)
    }
}

fn published_file_name(model_type: ModelType) -> &'static str {
    match model_type {
        ModelType::Svd => SVD_MODEL_FILE_NAME,
        ModelType::ItemKnn => ITEM_KNN_MODEL_FILE_NAME,
        ModelType::UserKnn => USER_KNN_MODEL_FILE_NAME,
    }
}

fn timed<T>(
    timings: &mut Vec<StageTiming>,
    stage: &str,
    f: impl FnOnce() -> AppResult<T>,
) -> AppResult<T> {
    let start = Instant::now();
    let value = f()?;
    timings.push(StageTiming {
        stage: stage.to_string(),
        duration_ms: start.elapsed().as_millis() as u64,
    });
    Ok(value)
}

/// Requested models in order, each at most once
fn dedup(models: &[ModelType]) -> Vec<ModelType> {
    let mut unique = Vec::new();
    for &model in models {
        if !unique.contains(&model) {
            unique.push(model);
        }
    }
    unique
}
