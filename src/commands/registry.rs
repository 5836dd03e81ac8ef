use std::path::Path;

use crate::modules::catalog::{csv_dataset::load_merged_csv, MergedRating, RatingRecord};
use crate::modules::collaborative::SvdModel;
use crate::modules::pipeline::{
    PipelineReport, RecommendationQuery, RecommendationQueryHandler, TrainCommand,
    TrainPipelineHandler,
};
use crate::shared::{
    application::{Query, UseCase},
    config::{SvdConfig, TrainingPipelineConfig, MERGED_FILE_NAME},
    errors::{AppError, AppResult},
};

use super::{Cli, Command};

/// Run a parsed command and render its output
pub fn execute(cli: Cli) -> AppResult<String> {
    let mut config = TrainingPipelineConfig::from_env().map_err(AppError::ValidationError)?;
    if let Some(dir) = cli.model_dir {
        config.model_dir = dir;
    }

    let query = match cli.command {
        Command::Train {
            models,
            min_ratings_per_user,
            min_ratings_per_anime,
        } => {
            let command = TrainCommand {
                models,
                min_ratings_per_user,
                min_ratings_per_anime,
            };
            let report = TrainPipelineHandler::new(config).execute(command)?;
            return render_report(&report, cli.json);
        }
        Command::Evaluate { holdout } => {
            return evaluate(&config.model_dir, config.seed, holdout, cli.json);
        }
        Command::Popular { filter, n } => RecommendationQuery::Popular { filter, n },
        Command::Content { title, n } => RecommendationQuery::Content { title, n },
        Command::Svd { user, n } => RecommendationQuery::Svd { user_id: user, n },
        Command::ItemKnn { anime, n } => RecommendationQuery::ItemKnn {
            anime_name: anime,
            n,
        },
        Command::UserKnn { user, n } => RecommendationQuery::UserKnn { user_id: user, n },
    };

    let table = RecommendationQueryHandler::new(&config.model_dir).execute(query)?;
    if cli.json {
        Ok(table.to_json()?)
    } else {
        Ok(table.to_string())
    }
}

fn render_report(report: &PipelineReport, json: bool) -> AppResult<String> {
    if json {
        return Ok(serde_json::to_string_pretty(report)?);
    }

    let mut out = String::from("Training finished\n");
    for timing in &report.timings {
        out.push_str(&format!("  {:<24} {:>8} ms\n", timing.stage, timing.duration_ms));
    }
    out.push_str(&format!("  {:<24} {:>8} ms\n", "total", report.total_duration_ms()));
    out.push_str("Published:\n");
    for path in &report.final_model_files {
        out.push_str(&format!("  {}\n", path.display()));
    }
    if !report.removed_model_files.is_empty() {
        out.push_str("Removed (not retrained):\n");
        for path in &report.removed_model_files {
            out.push_str(&format!("  {}\n", path.display()));
        }
    }
    Ok(out)
}

fn evaluate(model_dir: &Path, seed: u64, holdout: f64, json: bool) -> AppResult<String> {
    let ratings: Vec<RatingRecord> = load_merged_csv(&model_dir.join(MERGED_FILE_NAME))?
        .iter()
        .map(MergedRating::as_rating)
        .collect();
    let config = SvdConfig {
        seed,
        ..SvdConfig::default()
    };
    let evaluation = SvdModel::evaluate(&ratings, &config, holdout)?;

    if json {
        Ok(serde_json::to_string_pretty(&evaluation)?)
    } else {
        Ok(format!(
            "SVD on {} ratings ({} held out): RMSE {:.4}, MAE {:.4}",
            evaluation.train_size + evaluation.test_size,
            evaluation.test_size,
            evaluation.rmse,
            evaluation.mae
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::pipeline::application::StageTiming;
    use crate::shared::domain::{
        CollaborativeModelArtifact, ContentBasedModelArtifact, DataIngestionArtifact,
        DataTransformationArtifact,
    };
    use std::path::PathBuf;

    fn report() -> PipelineReport {
        PipelineReport {
            data_ingestion: DataIngestionArtifact {
                feature_store_anime_file_path: PathBuf::from("a.csv"),
                feature_store_userrating_file_path: PathBuf::from("r.csv"),
            },
            content_model: ContentBasedModelArtifact {
                cosine_similarity_model_file_path: PathBuf::from("c.json"),
            },
            data_transformation: DataTransformationArtifact {
                merged_file_path: PathBuf::from("m.csv"),
            },
            collaborative_model: CollaborativeModelArtifact::default(),
            final_model_files: vec![PathBuf::from("final_model/c.json")],
            removed_model_files: vec![PathBuf::from("final_model/svd.json")],
            timings: vec![
                StageTiming {
                    stage: "data_ingestion".to_string(),
                    duration_ms: 5,
                },
                StageTiming {
                    stage: "content_based_model".to_string(),
                    duration_ms: 7,
                },
            ],
        }
    }

    #[test]
    fn test_render_report_as_text() {
        let text = render_report(&report(), false).unwrap();
        assert!(text.contains("data_ingestion"));
        assert!(text.contains("12 ms"));
        assert!(text.contains("final_model/c.json"));
        assert!(text.contains("Removed (not retrained):\n  final_model/svd.json"));
    }

    #[test]
    fn test_render_report_as_json() {
        let json: serde_json::Value =
            serde_json::from_str(&render_report(&report(), true).unwrap()).unwrap();
        assert_eq!(json["timings"][1]["duration_ms"], 7);
    }

    #[test]
    fn test_evaluate_without_published_ratings() {
        let dir = tempfile::tempdir().unwrap();
        let err = evaluate(dir.path(), 42, 0.2, false).unwrap_err();
        assert!(err.is_not_found());
    }
}
