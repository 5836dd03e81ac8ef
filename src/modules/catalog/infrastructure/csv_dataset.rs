use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::Path;

use crate::modules::catalog::domain::entities::{
    anime_record::ANIME_REQUIRED_COLUMNS,
    rating_record::{MERGED_REQUIRED_COLUMNS, RATING_REQUIRED_COLUMNS},
    AnimeRecord, MergedRating, RatingRecord,
};
use crate::shared::{
    errors::{AppError, AppResult},
    utils::LogContext,
};

/// Read every row of a CSV file into `T`, checking required columns first
fn read_csv<T: DeserializeOwned>(
    path: &Path,
    dataset: &str,
    required_columns: &[&str],
) -> AppResult<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(|e| AppError::from(e).with_context(dataset))?;

    let headers = reader.headers()?.clone();
    for column in required_columns {
        if !headers.iter().any(|h| h == *column) {
            return Err(AppError::DataError(format!(
                "Column '{}' missing from {} ({})",
                column,
                dataset,
                path.display()
            )));
        }
    }

    let mut rows = Vec::new();
    for (line, result) in reader.deserialize().enumerate() {
        let row: T = result.map_err(|e| {
            AppError::DataError(format!(
                "Failed to parse row {} of {} ({}): {}",
                line + 1,
                dataset,
                path.display(),
                e
            ))
        })?;
        rows.push(row);
    }

    LogContext::dataset_shape(dataset, rows.len(), headers.len());
    Ok(rows)
}

pub fn load_anime_csv(path: &Path) -> AppResult<Vec<AnimeRecord>> {
    read_csv(path, "anime", ANIME_REQUIRED_COLUMNS)
}

pub fn load_ratings_csv(path: &Path) -> AppResult<Vec<RatingRecord>> {
    read_csv(path, "ratings", RATING_REQUIRED_COLUMNS)
}

pub fn load_merged_csv(path: &Path) -> AppResult<Vec<MergedRating>> {
    read_csv(path, "merged ratings", MERGED_REQUIRED_COLUMNS)
}

/// Write records to `path` with a header row, creating parent directories
pub fn export_csv<T: Serialize>(records: &[T], path: &Path) -> AppResult<()> {
    log::info!("Saving {} rows to file: {}", records.len(), path.display());

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    log::info!("Rows saved successfully to {}", path.display());
    Ok(())
}
