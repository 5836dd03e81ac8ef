//! Command-line surface of the `miru-recommender` binary.
pub mod registry;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::modules::collaborative::ModelType;
use crate::modules::popularity::{application::DEFAULT_TOP_N, FilterType};

pub use registry::execute;

#[derive(Debug, Parser)]
#[command(name = "miru-recommender")]
#[command(about = "Train anime recommenders and query the published models")]
#[command(version)]
pub struct Cli {
    /// Print results as JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,

    /// Final model directory (defaults to MIRU_MODEL_DIR or `final_model`)
    #[arg(long, global = true)]
    pub model_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full training pipeline and publish the models
    Train {
        /// Collaborative models to train
        #[arg(long, value_delimiter = ',', default_value = "svd,item_knn,user_knn")]
        models: Vec<ModelType>,

        /// Drop users with fewer ratings than this
        #[arg(long, default_value_t = 0)]
        min_ratings_per_user: usize,

        /// Drop anime with fewer ratings than this
        #[arg(long, default_value_t = 0)]
        min_ratings_per_anime: usize,
    },

    /// Rank anime by a popularity statistic
    Popular {
        #[arg(short, long)]
        filter: FilterType,

        #[arg(short, default_value_t = DEFAULT_TOP_N)]
        n: usize,
    },

    /// Anime with genres similar to a title
    Content {
        #[arg(short, long)]
        title: String,

        #[arg(short, default_value_t = DEFAULT_TOP_N)]
        n: usize,
    },

    /// Highest predicted ratings for a user
    Svd {
        #[arg(short, long)]
        user: i64,

        #[arg(short, default_value_t = DEFAULT_TOP_N)]
        n: usize,
    },

    /// Anime rated like the given one by the same users
    ItemKnn {
        #[arg(short, long)]
        anime: String,

        #[arg(short, default_value_t = DEFAULT_TOP_N)]
        n: usize,
    },

    /// Anime liked by the users most similar to a user
    UserKnn {
        #[arg(short, long)]
        user: i64,

        #[arg(short, default_value_t = DEFAULT_TOP_N)]
        n: usize,
    },

    /// Held-out RMSE and MAE of SVD on the published ratings
    Evaluate {
        #[arg(long, default_value_t = 0.2)]
        holdout: f64,
    },
}
