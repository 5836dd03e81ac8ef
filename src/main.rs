use clap::Parser;

use miru_recommender::commands::{execute, Cli};
use miru_recommender::shared::utils::init_logger;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logger();

    let cli = Cli::parse();
    let output = execute(cli)?;
    println!("{}", output);
    Ok(())
}
