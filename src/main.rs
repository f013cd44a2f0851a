//! coughscreen CLI - Cough Screening Pipeline
//!
//! Command-line interface for dataset assembly, training, and prediction.

use clap::Parser;
use env_logger::Env;
use log::info;

use coughscreen::cli::{commands, Cli, Commands};
use coughscreen::Result;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    info!("coughscreen v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::GenDemo { output, seed } => commands::gen_demo(&output, seed),
        Commands::BuildDataset {
            audio_dir,
            features,
            output,
        } => commands::build_dataset(audio_dir, &features, &output),
        Commands::Relabel { input, output } => commands::relabel(&input, &output),
        Commands::InspectDataset { path } => commands::inspect_dataset(&path),
        Commands::Train { dataset, model } => commands::train(&dataset, &model),
        Commands::Predict { input, model } => commands::predict(&input, &model),
    }
}
