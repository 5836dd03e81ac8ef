use crate::modules::catalog::csv_dataset::{export_csv, load_anime_csv, load_ratings_csv};
use crate::shared::{
    config::DataIngestionConfig,
    domain::DataIngestionArtifact,
    errors::AppResult,
    utils::{LogContext, TimedOperation},
};

const STAGE: &str = "DataIngestion";

pub struct DataIngestion {
    config: DataIngestionConfig,
}

impl DataIngestion {
    pub fn new(config: DataIngestionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DataIngestionConfig {
        &self.config
    }

    /// Read both source datasets and export them to the feature store
    pub fn ingest_data(&self) -> AppResult<DataIngestionArtifact> {
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

    fn run(&self) -> AppResult<DataIngestionArtifact> {
        log::info!(
            "Fetching anime data from {}",
            self.config.anime_filepath.display()
        );
        let anime = load_anime_csv(&self.config.anime_filepath)?;

        log::info!(
            "Fetching rating data from {}",
            self.config.rating_filepath.display()
        );
        let ratings = load_ratings_csv(&self.config.rating_filepath)?;

        export_csv(&anime, &self.config.feature_store_anime_file_path)?;
        export_csv(&ratings, &self.config.feature_store_userrating_file_path)?;

        Ok(DataIngestionArtifact {
            feature_store_anime_file_path: self.config.feature_store_anime_file_path.clone(),
            feature_store_userrating_file_path: self
                .config
                .feature_store_userrating_file_path
                .clone(),
        })
    }
}
