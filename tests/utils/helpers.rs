/// Test helper functions and workspace builders
use miru_recommender::modules::catalog::{csv_dataset::export_csv, AnimeRecord, RatingRecord};
use miru_recommender::shared::config::{TrainingPipelineConfig, TrainingPipelineConfigBuilder};
use tempfile::TempDir;

use super::factories::{sample_anime, sample_ratings};

/// A temporary directory holding source datasets and a pipeline config
/// that writes every artifact inside it
pub struct TestWorkspace {
    pub dir: TempDir,
    pub config: TrainingPipelineConfig,
}

impl TestWorkspace {
    pub fn new(anime: &[AnimeRecord], ratings: &[RatingRecord]) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let anime_path = dir.path().join("data/anime.csv");
        let ratings_path = dir.path().join("data/ratings.csv");
        export_csv(anime, &anime_path).expect("write anime csv");
        export_csv(ratings, &ratings_path).expect("write ratings csv");

        let config = TrainingPipelineConfigBuilder::new()
            .artifact_root(dir.path().join("Artifacts"))
            .timestamp("test_run")
            .model_dir(dir.path().join("final_model"))
            .anime_source(anime_path)
            .ratings_source(ratings_path)
            .seed(7)
            .build()
            .expect("valid pipeline config");

        Self { dir, config }
    }

    pub fn sample() -> Self {
        Self::new(&sample_anime(), &sample_ratings())
    }
}
