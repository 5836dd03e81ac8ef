use std::path::Path;
use std::sync::Arc;

use crate::modules::catalog::{csv_dataset::load_merged_csv, RecommendationTable};
use crate::modules::collaborative::domain::{KnnModel, ModelType, SvdModel};
use crate::shared::{
    config::CollaborativeModelConfig,
    domain::{ArtifactStore, CollaborativeModelArtifact, DataTransformationArtifact},
    errors::{AppError, AppResult},
    infrastructure::{load_model, save_model, FileArtifactStore},
    utils::{LogContext, TimedOperation},
};

use super::collaborative_recommender::CollaborativeAnimeRecommender;

const STAGE: &str = "CollaborativeModelTrainer";
pub const SVD_MODEL_KIND: &str = "SVD model";
pub const ITEM_KNN_MODEL_KIND: &str = "item-based KNN model";
pub const USER_KNN_MODEL_KIND: &str = "user-based KNN model";

/// Trains one collaborative model on the merged dataset and persists it
pub struct CollaborativeModelTrainer {
    config: CollaborativeModelConfig,
    data_transformation_artifact: DataTransformationArtifact,
    store: Arc<dyn ArtifactStore>,
}

impl CollaborativeModelTrainer {
    pub fn new(
        config: CollaborativeModelConfig,
        data_transformation_artifact: DataTransformationArtifact,
    ) -> Self {
        Self {
            config,
            data_transformation_artifact,
            store: Arc::new(FileArtifactStore::new()),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn ArtifactStore>) -> Self {
        self.store = store;
        self
    }

    pub fn initiate_model_trainer(
        &self,
        model_type: ModelType,
    ) -> AppResult<CollaborativeModelArtifact> {
        let stage = format!("{}({})", STAGE, model_type);
        LogContext::stage(&stage, "started");
        let timer = TimedOperation::new(&stage);

        match self.train(model_type) {
            Ok(artifact) => {
                timer.finish();
                LogContext::stage(&stage, "completed");
                Ok(artifact)
            }
            Err(e) => {
                LogContext::error_with_context(&e, &stage);
                Err(e.with_context(STAGE))
            }
        }
    }

    fn train(&self, model_type: ModelType) -> AppResult<CollaborativeModelArtifact> {
        self.config.validate().map_err(AppError::ValidationError)?;

        log::info!("Loading transformed data...");
        let rows = load_merged_csv(&self.data_transformation_artifact.merged_file_path)?;
        let recommender =
            CollaborativeAnimeRecommender::new(&rows)?.with_svd_config(self.config.svd.clone());
        let n = self.config.sample_size;

        match model_type {
            ModelType::Svd => {
                let path = &self.config.svd_trained_model_file_path;
                log::info!("Training and saving SVD model...");
                let model = recommender.train_svd()?;
                save_model(self.store.as_ref(), path, &model, SVD_MODEL_KIND)?;

                log::info!("Loading pre-trained SVD model...");
                let model: SvdModel = load_model(self.store.as_ref(), path, SVD_MODEL_KIND)?;
                log_sample(
                    "SVD",
                    recommender.get_svd_recommendations(self.config.sample_user_id, n, &model),
                )?;

                Ok(CollaborativeModelArtifact {
                    svd_file_path: Some(path.clone()),
                    ..Default::default()
                })
            }
            ModelType::ItemKnn => {
                let path = &self.config.item_knn_trained_model_file_path;
                log::info!("Training and saving KNN item-based model...");
                self.save_knn(path, &recommender.train_knn_item_based(), ITEM_KNN_MODEL_KIND)?;

                log::info!("Loading pre-trained item-based KNN model...");
                let model: KnnModel = load_model(self.store.as_ref(), path, ITEM_KNN_MODEL_KIND)?;
                log_sample(
                    "Item based",
                    recommender.get_item_based_recommendations(
                        &self.config.sample_anime_name,
                        n,
                        &model,
                    ),
                )?;

                Ok(CollaborativeModelArtifact {
                    item_based_knn_file_path: Some(path.clone()),
                    ..Default::default()
                })
            }
            ModelType::UserKnn => {
                let path = &self.config.user_knn_trained_model_file_path;
                log::info!("Training and saving KNN user-based model...");
                self.save_knn(path, &recommender.train_knn_user_based(), USER_KNN_MODEL_KIND)?;

                log::info!("Loading pre-trained user-based KNN model...");
                let model: KnnModel = load_model(self.store.as_ref(), path, USER_KNN_MODEL_KIND)?;
                log_sample(
                    "User based",
                    recommender.get_user_based_recommendations(
                        self.config.sample_knn_user_id,
                        n,
                        &model,
                    ),
                )?;

                Ok(CollaborativeModelArtifact {
                    user_based_knn_file_path: Some(path.clone()),
                    ..Default::default()
                })
            }
        }
    }

    fn save_knn(&self, path: &Path, model: &KnnModel, kind: &str) -> AppResult<()> {
        save_model(self.store.as_ref(), path, model, kind)
    }
}

/// Sample ids come from config and may be absent from a small dataset
fn log_sample(label: &str, result: AppResult<RecommendationTable>) -> AppResult<()> {
    match result {
        Ok(table) => {
            log::info!("{} recommendations:\n{}", label, table);
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            log::warn!("{} sample recommendation skipped: {}", label, e);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::catalog::{csv_dataset::export_csv, AnimeRecord, MergedRating, RatingRecord};
    use crate::shared::config::{SvdConfig, TrainingPipelineConfigBuilder};
    use crate::shared::domain::repositories::MockArtifactStore;

    fn setup(dir: &Path) -> (CollaborativeModelConfig, DataTransformationArtifact) {
        let shows = [AnimeRecord::new(1, "One Piece"), AnimeRecord::new(2, "Naruto"), AnimeRecord::new(3, "Bleach")];
        let mut rows = Vec::new();
        for user in [436_i64, 817, 5] {
            for show in &shows {
                let rating = RatingRecord::new(user, show.anime_id, (user % 7 + show.anime_id) as f32);
                rows.push(MergedRating::from_parts(&rating, show));
            }
        }
        let merged_path = dir.join("merged.csv");
        export_csv(&rows, &merged_path).unwrap();

        let pipeline = TrainingPipelineConfigBuilder::new()
            .artifact_root(dir.join("Artifacts"))
            .timestamp("run")
            .build()
            .unwrap();
        let config = CollaborativeModelConfig {
            svd: SvdConfig {
                n_factors: 2,
                n_epochs: 5,
                ..SvdConfig::default()
            },
            sample_size: 2,
            ..CollaborativeModelConfig::new(&pipeline)
        };
        (
            config,
            DataTransformationArtifact {
                merged_file_path: merged_path,
            },
        )
    }

    #[test]
    fn test_each_model_type_sets_only_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let (config, transformation) = setup(dir.path());
        let trainer = CollaborativeModelTrainer::new(config.clone(), transformation);

        let svd = trainer.initiate_model_trainer(ModelType::Svd).unwrap();
        assert_eq!(svd.svd_file_path.as_ref(), Some(&config.svd_trained_model_file_path));
        assert!(svd.item_based_knn_file_path.is_none());

        let item = trainer.initiate_model_trainer(ModelType::ItemKnn).unwrap();
        assert_eq!(item.paths(), vec![&config.item_knn_trained_model_file_path]);

        let user = trainer.initiate_model_trainer(ModelType::UserKnn).unwrap();
        assert_eq!(user.paths(), vec![&config.user_knn_trained_model_file_path]);

        for path in svd.merge(item).merge(user).paths() {
            assert!(path.is_file(), "{} was not written", path.display());
        }
    }

    #[test]
    fn test_missing_sample_ids_only_warn() {
        let dir = tempfile::tempdir().unwrap();
        let (mut config, transformation) = setup(dir.path());
        config.sample_anime_name = "Unknown Show".to_string();
        config.sample_knn_user_id = 9999;

        let trainer = CollaborativeModelTrainer::new(config, transformation);
        assert!(trainer.initiate_model_trainer(ModelType::ItemKnn).is_ok());
        assert!(trainer.initiate_model_trainer(ModelType::UserKnn).is_ok());
    }

    #[test]
    fn test_missing_merged_file_is_reported_with_stage() {
        let dir = tempfile::tempdir().unwrap();
        let (config, _) = setup(dir.path());
        let transformation = DataTransformationArtifact {
            merged_file_path: dir.path().join("absent.csv"),
        };

        let err = CollaborativeModelTrainer::new(config, transformation)
            .initiate_model_trainer(ModelType::Svd)
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains(STAGE));
    }

    #[test]
    fn test_store_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let (config, transformation) = setup(dir.path());

        let mut store = MockArtifactStore::new();
        store
            .expect_save()
            .returning(|_, _| Err(AppError::IoError("read-only".to_string())));

        let err = CollaborativeModelTrainer::new(config, transformation)
            .with_store(Arc::new(store))
            .initiate_model_trainer(ModelType::UserKnn)
            .unwrap_err();
        assert!(matches!(err, AppError::IoError(_)));
    }
}
