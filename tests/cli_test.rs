/// Tests for the command-line entry points against a trained model directory
mod utils;

use clap::Parser;
use miru_recommender::commands::{execute, Cli};
use miru_recommender::modules::collaborative::ModelType;
use miru_recommender::modules::pipeline::{TrainCommand, TrainPipelineHandler};
use miru_recommender::shared::application::UseCase;
use utils::helpers::TestWorkspace;

fn run(workspace: &TestWorkspace, args: &[&str]) -> String {
    let model_dir = workspace.config.model_dir.display().to_string();
    let mut argv = vec!["miru-recommender", "--model-dir", model_dir.as_str()];
    argv.extend_from_slice(args);
    execute(Cli::try_parse_from(argv).unwrap()).unwrap()
}

fn trained() -> TestWorkspace {
    let workspace = TestWorkspace::sample();
    TrainPipelineHandler::new(workspace.config.clone())
        .execute(TrainCommand::new(vec![ModelType::Svd, ModelType::ItemKnn]))
        .unwrap();
    workspace
}

#[test]
fn content_query_renders_a_table() {
    let workspace = trained();
    let output = run(&workspace, &["content", "--title", "Naruto", "-n", "2"]);

    assert!(output.contains("Anime name"));
    assert!(output.contains("Hunter x Hunter"));
}

#[test]
fn json_flag_switches_output_format() {
    let workspace = trained();
    let output = run(&workspace, &["--json", "item-knn", "--anime", "One Piece", "-n", "2"]);

    let rows: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(rows.as_array().map(Vec::len), Some(2));
}

#[test]
fn evaluate_reports_error_metrics() {
    let workspace = trained();
    let output = run(&workspace, &["evaluate", "--holdout", "0.25"]);

    assert!(output.contains("RMSE"));
    assert!(output.contains("MAE"));
}

#[test]
fn untrained_model_is_an_error() {
    let workspace = trained();
    let model_dir = workspace.config.model_dir.display().to_string();
    let cli = Cli::try_parse_from([
        "miru-recommender",
        "--model-dir",
        model_dir.as_str(),
        "user-knn",
        "--user",
        "436",
    ])
    .unwrap();

    assert!(execute(cli).unwrap_err().is_not_found());
}
