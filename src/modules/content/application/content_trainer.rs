use std::sync::Arc;

use crate::modules::catalog::csv_dataset::load_anime_csv;
use crate::shared::{
    config::ContentBasedModelConfig,
    domain::{ArtifactStore, ContentBasedModelArtifact, DataIngestionArtifact},
    errors::AppResult,
    infrastructure::FileArtifactStore,
    utils::{LogContext, TimedOperation},
};

use super::content_recommender::ContentBasedRecommender;

const STAGE: &str = "ContentBasedModelTrainer";

/// Trains the genre similarity model and persists it
pub struct ContentBasedModelTrainer {
    config: ContentBasedModelConfig,
    data_ingestion_artifact: DataIngestionArtifact,
    store: Arc<dyn ArtifactStore>,
}

impl ContentBasedModelTrainer {
    pub fn new(
        config: ContentBasedModelConfig,
        data_ingestion_artifact: DataIngestionArtifact,
    ) -> Self {
        Self {
            config,
            data_ingestion_artifact,
            store: Arc::new(FileArtifactStore::new()),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn ArtifactStore>) -> Self {
        self.store = store;
        self
    }

    pub fn initiate_model_trainer(&self) -> AppResult<ContentBasedModelArtifact> {
        LogContext::stage(STAGE, "started");
        let timer = TimedOperation::new(STAGE);

        match self.train() {
            Ok(artifact) => {
                timer.finish();
                LogContext::stage(STAGE, "completed");
                Ok(artifact)
            }
            Err(e) => {
                LogContext::error_with_context(&e, STAGE);
                Err(e.with_context(STAGE))
            }
        }
    }

    fn train(&self) -> AppResult<ContentBasedModelArtifact> {
        log::info!("Loading ingested data...");
        let records = load_anime_csv(&self.data_ingestion_artifact.feature_store_anime_file_path)?;

        log::info!("Training ContentBasedRecommender model...");
        let mut recommender =
            ContentBasedRecommender::new(&records, &self.config)?.with_store(self.store.clone());

        let model_path = &self.config.cosine_similarity_model_file_path;
        recommender.save_model(model_path)?;

        log::info!("Loading saved model to get recommendations...");
        match recommender.get_rec_cosine(&self.config.sample_title, model_path, 10) {
            Ok(table) => log::info!("Cosine similarity recommendations:\n{}", table),
            Err(e) if e.is_not_found() => log::warn!("Sample recommendation skipped: {}", e),
            Err(e) => return Err(e),
        }

        Ok(ContentBasedModelArtifact {
            cosine_similarity_model_file_path: model_path.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::catalog::{csv_dataset::export_csv, AnimeRecord};
    use crate::shared::config::{TfidfConfig, TrainingPipelineConfigBuilder};
    use crate::shared::domain::repositories::MockArtifactStore;
    use crate::shared::errors::AppError;

    fn setup(dir: &std::path::Path) -> (ContentBasedModelConfig, DataIngestionArtifact) {
        let anime_path = dir.join("anime.csv");
        let records: Vec<AnimeRecord> = ["Action, Drama", "Action, Comedy", "Drama"]
            .iter()
            .enumerate()
            .map(|(i, genres)| AnimeRecord {
                genres: Some(genres.to_string()),
                image_url: Some("url".to_string()),
                average_rating: Some(7.5),
                ..AnimeRecord::new(i as i64 + 1, format!("Show {}", i + 1))
            })
            .collect();
        export_csv(&records, &anime_path).unwrap();

        let pipeline = TrainingPipelineConfigBuilder::new()
            .artifact_root(dir.join("Artifacts"))
            .timestamp("run")
            .build()
            .unwrap();
        let config = ContentBasedModelConfig {
            tfidf: TfidfConfig {
                min_df: 1,
                ..TfidfConfig::default()
            },
            sample_title: "Show 1".to_string(),
            ..ContentBasedModelConfig::new(&pipeline)
        };
        let artifact = DataIngestionArtifact {
            feature_store_anime_file_path: anime_path,
            feature_store_userrating_file_path: dir.join("ratings.csv"),
        };
        (config, artifact)
    }

    #[test]
    fn test_initiate_model_trainer_writes_model() {
        let dir = tempfile::tempdir().unwrap();
        let (config, ingestion) = setup(dir.path());

        let artifact = ContentBasedModelTrainer::new(config.clone(), ingestion)
            .initiate_model_trainer()
            .unwrap();

        assert_eq!(
            artifact.cosine_similarity_model_file_path,
            config.cosine_similarity_model_file_path
        );
        assert!(artifact.cosine_similarity_model_file_path.is_file());
    }

    #[test]
    fn test_unknown_sample_title_does_not_fail_training() {
        let dir = tempfile::tempdir().unwrap();
        let (mut config, ingestion) = setup(dir.path());
        config.sample_title = "Not In Dataset".to_string();

        assert!(ContentBasedModelTrainer::new(config, ingestion)
            .initiate_model_trainer()
            .is_ok());
    }

    #[test]
    fn test_store_failure_is_reported_with_stage() {
        let dir = tempfile::tempdir().unwrap();
        let (config, ingestion) = setup(dir.path());

        let mut store = MockArtifactStore::new();
        store
            .expect_save()
            .returning(|_, _| Err(AppError::IoError("disk full".to_string())));

        let err = ContentBasedModelTrainer::new(config, ingestion)
            .with_store(Arc::new(store))
            .initiate_model_trainer()
            .unwrap_err();

        assert!(matches!(err, AppError::IoError(_)));
        assert!(err.to_string().contains(STAGE));
    }
}
