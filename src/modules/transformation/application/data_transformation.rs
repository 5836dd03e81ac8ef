use crate::modules::catalog::csv_dataset::{export_csv, load_anime_csv, load_ratings_csv};
use crate::modules::transformation::domain::{MergeOptions, RatingMerger};
use crate::shared::{
    config::DataTransformationConfig,
    domain::{DataIngestionArtifact, DataTransformationArtifact},
    errors::{AppError, AppResult},
    utils::{LogContext, TimedOperation},
};

const STAGE: &str = "DataTransformation";

pub struct DataTransformation {
    ingestion_artifact: DataIngestionArtifact,
    config: DataTransformationConfig,
}

impl DataTransformation {
    pub fn new(ingestion_artifact: DataIngestionArtifact, config: DataTransformationConfig) -> Self {
        Self {
            ingestion_artifact,
            config,
        }
    }

    /// Merge the feature store datasets and export the result
    pub fn transform(&self) -> AppResult<DataTransformationArtifact> {
        LogContext::stage(STAGE, "started");
        let timer = TimedOperation::new(STAGE);

        match self.run() {
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

    fn run(&self) -> AppResult<DataTransformationArtifact> {
        let anime = load_anime_csv(&self.ingestion_artifact.feature_store_anime_file_path)?;
        let ratings = load_ratings_csv(&self.ingestion_artifact.feature_store_userrating_file_path)?;

        let merger = RatingMerger::new(MergeOptions {
            min_ratings_per_user: self.config.min_ratings_per_user,
            min_ratings_per_anime: self.config.min_ratings_per_anime,
        });
        let (merged, summary) = merger.merge(&anime, &ratings);
        log::info!(
            "Merged {} of {} ratings (unrated: {}, unmatched: {}, duplicates: {}, below min count: {})",
            summary.output_rows,
            summary.input_ratings,
            summary.unrated,
            summary.unmatched,
            summary.duplicates,
            summary.below_min_count
        );

        if merged.is_empty() {
            return Err(AppError::DataError(
                "No ratings left after merging with anime metadata".to_string(),
            ));
        }

        export_csv(&merged, &self.config.merged_file_path)?;

        Ok(DataTransformationArtifact {
            merged_file_path: self.config.merged_file_path.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::catalog::csv_dataset::load_merged_csv;
    use crate::modules::catalog::{AnimeRecord, RatingRecord};
    use crate::shared::config::TrainingPipelineConfigBuilder;

    fn setup(dir: &std::path::Path, ratings: &[RatingRecord]) -> DataTransformation {
        let anime_path = dir.join("fs/anime.csv");
        let ratings_path = dir.join("fs/ratings.csv");
        let mut naruto = AnimeRecord::new(1, "Naruto");
        naruto.genres = Some("Action, Adventure".to_string());
        export_csv(&[naruto, AnimeRecord::new(2, "Bleach")], &anime_path).unwrap();
        export_csv(ratings, &ratings_path).unwrap();

        let pipeline = TrainingPipelineConfigBuilder::new()
            .artifact_root(dir.join("Artifacts"))
            .timestamp("run")
            .build()
            .unwrap();
        DataTransformation::new(
            DataIngestionArtifact {
                feature_store_anime_file_path: anime_path,
                feature_store_userrating_file_path: ratings_path,
            },
            DataTransformationConfig::new(&pipeline),
        )
    }

    #[test]
    fn test_transform_writes_merged_file() {
        let dir = tempfile::tempdir().unwrap();
        let transformation = setup(
            dir.path(),
            &[
                RatingRecord::new(7, 1, 9.0),
                RatingRecord::new(7, 2, -1.0),
                RatingRecord::new(8, 2, 6.0),
            ],
        );

        let artifact = transformation.transform().unwrap();
        let merged = load_merged_csv(&artifact.merged_file_path).unwrap();

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].genres.as_deref(), Some("Action, Adventure"));
        assert_eq!(merged[1].name, "Bleach");
    }

    #[test]
    fn test_empty_merge_is_data_error() {
        let dir = tempfile::tempdir().unwrap();
        let transformation = setup(dir.path(), &[RatingRecord::new(7, 42, 9.0)]);

        let err = transformation.transform().unwrap_err();
        assert!(matches!(err, AppError::DataError(_)));
        assert!(err.to_string().contains("[DataTransformation]"));
    }
}
