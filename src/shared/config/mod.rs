pub mod stage_configs;
pub mod training_pipeline_config;

pub use stage_configs::{
    ANIME_FILE_NAME, CONTENT_BASED_MODEL_FILE_NAME, ITEM_KNN_MODEL_FILE_NAME, MERGED_FILE_NAME,
    RATING_FILE_NAME, SVD_MODEL_FILE_NAME, USER_KNN_MODEL_FILE_NAME,
    CollaborativeModelConfig, ContentBasedModelConfig, DataIngestionConfig,
    DataTransformationConfig, SvdConfig, TfidfConfig,
};
pub use training_pipeline_config::{TrainingPipelineConfig, TrainingPipelineConfigBuilder};
