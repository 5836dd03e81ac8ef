use crate::modules::catalog::{csv_dataset::load_anime_csv, RecommendationTable};
use crate::modules::popularity::domain::{FilterType, PopularityBasedFiltering};
use crate::shared::{
    domain::DataIngestionArtifact,
    errors::AppResult,
    utils::{LogContext, Validator},
};

pub const DEFAULT_TOP_N: usize = 10;

/// Runs a popularity filter over the ingested anime dataset
pub struct PopularityBasedRecommender {
    data_ingestion_artifact: DataIngestionArtifact,
}

impl PopularityBasedRecommender {
    pub fn new(data_ingestion_artifact: DataIngestionArtifact) -> Self {
        Self {
            data_ingestion_artifact,
        }
    }

    pub fn run(&self, filter: FilterType, n: usize) -> AppResult<RecommendationTable> {
        Validator::validate_top_n(n)?;
        LogContext::recommendation(filter.as_str(), "all anime", None);

        log::info!("Loading ingested anime data...");
        let records = load_anime_csv(&self.data_ingestion_artifact.feature_store_anime_file_path)
            .map_err(|e| e.with_context("PopularityBasedRecommender"))?;

        let table = PopularityBasedFiltering::new(records).apply(filter, n);
        LogContext::recommendation(filter.as_str(), "all anime", Some(table.len()));
        log::info!("{} recommendations:\n{}", filter, table);
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::catalog::{csv_dataset::export_csv, AnimeRecord};
    use crate::shared::errors::AppError;
    use std::path::PathBuf;

    fn artifact(anime_path: PathBuf) -> DataIngestionArtifact {
        DataIngestionArtifact {
            feature_store_anime_file_path: anime_path,
            feature_store_userrating_file_path: PathBuf::from("unused.csv"),
        }
    }

    #[test]
    fn test_run_reads_feature_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anime.csv");
        let records = vec![
            AnimeRecord {
                favorites: Some(10),
                ..AnimeRecord::new(1, "Naruto")
            },
            AnimeRecord {
                favorites: Some(99),
                ..AnimeRecord::new(2, "Bleach")
            },
        ];
        export_csv(&records, &path).unwrap();

        let table = PopularityBasedRecommender::new(artifact(path))
            .run(FilterType::FavoriteAnimes, 1)
            .unwrap();

        assert_eq!(table.names(), vec!["Bleach"]);
    }

    #[test]
    fn test_zero_n_is_rejected() {
        let err = PopularityBasedRecommender::new(artifact(PathBuf::from("missing.csv")))
            .run(FilterType::PopularAnimes, 0)
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
