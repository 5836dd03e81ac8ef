use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

pub const PIPELINE_NAME: &str = "AnimeRecommender";
pub const ARTIFACT_DIR: &str = "Artifacts";
pub const FINAL_MODEL_DIR: &str = "final_model";
pub const TIMESTAMP_FORMAT: &str = "%m_%d_%Y_%H_%M_%S";

pub const DEFAULT_ANIME_SOURCE: &str = "data/anime.csv";
pub const DEFAULT_RATINGS_SOURCE: &str = "data/ratings.csv";

/// Environment variables read by [`TrainingPipelineConfig::from_env`]
pub const ENV_ARTIFACT_DIR: &str = "MIRU_ARTIFACT_DIR";
pub const ENV_MODEL_DIR: &str = "MIRU_MODEL_DIR";
pub const ENV_ANIME_CSV: &str = "MIRU_ANIME_CSV";
pub const ENV_RATINGS_CSV: &str = "MIRU_RATINGS_CSV";
pub const ENV_SEED: &str = "MIRU_SEED";

/// Top-level configuration for a training run
///
/// Every run writes into its own timestamped directory under the artifact
/// root; the final models are copied to `model_dir` once training succeeds.
#[derive(Debug, Clone)]
pub struct TrainingPipelineConfig {
    pub pipeline_name: String,
    pub artifact_root: PathBuf,
    pub timestamp: String,
    pub model_dir: PathBuf,
    pub anime_source: PathBuf,
    pub ratings_source: PathBuf,
    /// Seed for every randomized step (factor initialization, holdout split)
    pub seed: u64,
}

impl TrainingPipelineConfig {
    pub fn new() -> Self {
        Self::at(Local::now())
    }

    /// Configuration stamped with a fixed time, mostly useful in tests
    pub fn at(timestamp: DateTime<Local>) -> Self {
        Self {
            pipeline_name: PIPELINE_NAME.to_string(),
            artifact_root: PathBuf::from(ARTIFACT_DIR),
            timestamp: timestamp.format(TIMESTAMP_FORMAT).to_string(),
            model_dir: PathBuf::from(FINAL_MODEL_DIR),
            anime_source: PathBuf::from(DEFAULT_ANIME_SOURCE),
            ratings_source: PathBuf::from(DEFAULT_RATINGS_SOURCE),
            seed: 42,
        }
    }

    /// Load overrides from the process environment (and `.env` if present)
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let mut builder = TrainingPipelineConfigBuilder::new();
        if let Ok(dir) = std::env::var(ENV_ARTIFACT_DIR) {
            builder = builder.artifact_root(dir);
        }
        if let Ok(dir) = std::env::var(ENV_MODEL_DIR) {
            builder = builder.model_dir(dir);
        }
        if let Ok(path) = std::env::var(ENV_ANIME_CSV) {
            builder = builder.anime_source(path);
        }
        if let Ok(path) = std::env::var(ENV_RATINGS_CSV) {
            builder = builder.ratings_source(path);
        }
        if let Ok(seed) = std::env::var(ENV_SEED) {
            let seed = seed
                .parse::<u64>()
                .map_err(|e| format!("{} must be an unsigned integer: {}", ENV_SEED, e))?;
            builder = builder.seed(seed);
        }

        builder.build()
    }

    /// Directory holding every artifact of this run
    pub fn artifact_dir(&self) -> PathBuf {
        self.artifact_root.join(&self.timestamp)
    }

    /// Path of a file inside the final model directory
    pub fn final_model_path(&self, file_name: impl AsRef<Path>) -> PathBuf {
        self.model_dir.join(file_name)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.pipeline_name.trim().is_empty() {
            return Err("pipeline_name cannot be empty".to_string());
        }

        if self.artifact_root.as_os_str().is_empty() {
            return Err("artifact_root cannot be empty".to_string());
        }

        if self.model_dir.as_os_str().is_empty() {
            return Err("model_dir cannot be empty".to_string());
        }

        if self.anime_source.as_os_str().is_empty() || self.ratings_source.as_os_str().is_empty()
        {
            return Err("source dataset paths cannot be empty".to_string());
        }

        if self.anime_source == self.ratings_source {
            return Err(format!(
                "anime and ratings sources must differ, both are {}",
                self.anime_source.display()
            ));
        }

        Ok(())
    }
}

impl Default for TrainingPipelineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for TrainingPipelineConfig to make test setup easier
#[derive(Default)]
pub struct TrainingPipelineConfigBuilder {
    config: TrainingPipelineConfig,
}

impl TrainingPipelineConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: TrainingPipelineConfig::new(),
        }
    }

    pub fn artifact_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.artifact_root = dir.into();
        self
    }

    pub fn timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.config.timestamp = timestamp.into();
        self
    }

    pub fn model_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.model_dir = dir.into();
        self
    }

    pub fn anime_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.anime_source = path.into();
        self
    }

    pub fn ratings_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.ratings_source = path.into();
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn build(self) -> Result<TrainingPipelineConfig, String> {
        self.config.validate()?;
        Ok(self.config)
    }
}
