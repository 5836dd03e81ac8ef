use std::path::PathBuf;

use super::training_pipeline_config::TrainingPipelineConfig;

pub const DATA_INGESTION_DIR_NAME: &str = "data_ingestion";
pub const DATA_INGESTION_FEATURE_STORE_DIR: &str = "feature_store";
pub const ANIME_FILE_NAME: &str = "anime_data.csv";
pub const RATING_FILE_NAME: &str = "user_rating_data.csv";

pub const DATA_TRANSFORMATION_DIR: &str = "data_transformation";
pub const MERGED_FILE_NAME: &str = "merged_anime_data.csv";

pub const CONTENT_BASED_MODEL_DIR: &str = "content_based_model";
pub const CONTENT_BASED_MODEL_FILE_NAME: &str = "cosine_similarity.json";

pub const COLLABORATIVE_MODEL_DIR: &str = "collaborative_recommender";
pub const SVD_MODEL_FILE_NAME: &str = "svd.json";
pub const ITEM_KNN_MODEL_FILE_NAME: &str = "itembased_knn.json";
pub const USER_KNN_MODEL_FILE_NAME: &str = "userbased_knn.json";

/// Where ingestion reads the raw datasets and writes the feature store
#[derive(Debug, Clone)]
pub struct DataIngestionConfig {
    pub data_ingestion_dir: PathBuf,
    pub feature_store_anime_file_path: PathBuf,
    pub feature_store_userrating_file_path: PathBuf,
    pub anime_filepath: PathBuf,
    pub rating_filepath: PathBuf,
}

impl DataIngestionConfig {
    pub fn new(pipeline: &TrainingPipelineConfig) -> Self {
        let data_ingestion_dir = pipeline.artifact_dir().join(DATA_INGESTION_DIR_NAME);
        let feature_store = data_ingestion_dir.join(DATA_INGESTION_FEATURE_STORE_DIR);
        Self {
            feature_store_anime_file_path: feature_store.join(ANIME_FILE_NAME),
            feature_store_userrating_file_path: feature_store.join(RATING_FILE_NAME),
            data_ingestion_dir,
            anime_filepath: pipeline.anime_source.clone(),
            rating_filepath: pipeline.ratings_source.clone(),
        }
    }
}

/// Output location and row filters of the merge step
#[derive(Debug, Clone)]
pub struct DataTransformationConfig {
    pub data_transformation_dir: PathBuf,
    pub merged_file_path: PathBuf,
    /// Users with fewer ratings are dropped (0 keeps everyone)
    pub min_ratings_per_user: usize,
    /// Anime with fewer ratings are dropped (0 keeps everything)
    pub min_ratings_per_anime: usize,
}

impl DataTransformationConfig {
    pub fn new(pipeline: &TrainingPipelineConfig) -> Self {
        let data_transformation_dir = pipeline.artifact_dir().join(DATA_TRANSFORMATION_DIR);
        Self {
            merged_file_path: data_transformation_dir.join(MERGED_FILE_NAME),
            data_transformation_dir,
            min_ratings_per_user: 0,
            min_ratings_per_anime: 0,
        }
    }

    pub fn with_min_ratings(mut self, per_user: usize, per_anime: usize) -> Self {
        self.min_ratings_per_user = per_user;
        self.min_ratings_per_anime = per_anime;
        self
    }
}

/// Text vectorization parameters for genre strings
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TfidfConfig {
    /// Minimum number of documents a term must appear in
    pub min_df: usize,
    pub ngram_range: (usize, usize),
    pub strip_accents: bool,
    pub use_stop_words: bool,
}

impl TfidfConfig {
    pub fn new() -> Self {
        Self {
            min_df: 3,
            ngram_range: (1, 3),
            strip_accents: true,
            use_stop_words: true,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.min_df == 0 {
            return Err("min_df must be > 0".to_string());
        }

        let (low, high) = self.ngram_range;
        if low == 0 || low > high {
            return Err(format!(
                "ngram_range must satisfy 1 <= low <= high, got ({}, {})",
                low, high
            ));
        }

        Ok(())
    }
}

impl Default for TfidfConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct ContentBasedModelConfig {
    pub content_based_model_dir: PathBuf,
    pub cosine_similarity_model_file_path: PathBuf,
    pub tfidf: TfidfConfig,
    /// Neighbors kept per anime in the similarity index
    pub max_neighbors: usize,
    /// Title used for the sample recommendation logged after training
    pub sample_title: String,
}

impl ContentBasedModelConfig {
    pub fn new(pipeline: &TrainingPipelineConfig) -> Self {
        let content_based_model_dir = pipeline.artifact_dir().join(CONTENT_BASED_MODEL_DIR);
        Self {
            cosine_similarity_model_file_path: content_based_model_dir
                .join(CONTENT_BASED_MODEL_FILE_NAME),
            content_based_model_dir,
            tfidf: TfidfConfig::new(),
            max_neighbors: 50,
            sample_title: "One Piece".to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        self.tfidf.validate()?;
        if self.max_neighbors == 0 {
            return Err("max_neighbors must be > 0".to_string());
        }
        Ok(())
    }
}

/// Hyper-parameters of biased matrix factorization
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SvdConfig {
    pub n_factors: usize,
    pub n_epochs: usize,
    pub lr_all: f32,
    pub reg_all: f32,
    pub init_mean: f32,
    pub init_std: f32,
    pub rating_scale: (f32, f32),
    pub seed: u64,
}

impl SvdConfig {
    pub fn new() -> Self {
        Self {
            n_factors: 100,
            n_epochs: 20,
            lr_all: 0.005,
            reg_all: 0.02,
            init_mean: 0.0,
            init_std: 0.1,
            rating_scale: (1.0, 10.0),
            seed: 42,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.n_factors == 0 {
            return Err("n_factors must be > 0".to_string());
        }

        if self.n_epochs == 0 {
            return Err("n_epochs must be > 0".to_string());
        }

        if !(self.lr_all > 0.0) {
            return Err(format!("lr_all must be positive, got {}", self.lr_all));
        }

        if self.reg_all < 0.0 {
            return Err(format!("reg_all cannot be negative, got {}", self.reg_all));
        }

        if !(self.init_std >= 0.0) {
            return Err(format!("init_std cannot be negative, got {}", self.init_std));
        }

        let (low, high) = self.rating_scale;
        if low >= high {
            return Err(format!(
                "rating_scale lower bound ({}) must be below upper bound ({})",
                low, high
            ));
        }

        Ok(())
    }
}

impl Default for SvdConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct CollaborativeModelConfig {
    pub collaborative_model_dir: PathBuf,
    pub svd_trained_model_file_path: PathBuf,
    pub item_knn_trained_model_file_path: PathBuf,
    pub user_knn_trained_model_file_path: PathBuf,
    pub svd: SvdConfig,
    /// Sample queries logged after each model is trained
    pub sample_user_id: i64,
    pub sample_anime_name: String,
    pub sample_knn_user_id: i64,
    pub sample_size: usize,
}

impl CollaborativeModelConfig {
    pub fn new(pipeline: &TrainingPipelineConfig) -> Self {
        let collaborative_model_dir = pipeline.artifact_dir().join(COLLABORATIVE_MODEL_DIR);
        Self {
            svd_trained_model_file_path: collaborative_model_dir.join(SVD_MODEL_FILE_NAME),
            item_knn_trained_model_file_path: collaborative_model_dir
                .join(ITEM_KNN_MODEL_FILE_NAME),
            user_knn_trained_model_file_path: collaborative_model_dir
                .join(USER_KNN_MODEL_FILE_NAME),
            collaborative_model_dir,
            svd: SvdConfig {
                seed: pipeline.seed,
                ..SvdConfig::new()
            },
            sample_user_id: 436,
            sample_anime_name: "One Piece".to_string(),
            sample_knn_user_id: 817,
            sample_size: 10,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        self.svd.validate()?;
        if self.sample_size == 0 {
            return Err("sample_size must be > 0".to_string());
        }
        Ok(())
    }
}
