//! CLI Module
//!
//! Command-line interface for the offline batch jobs (dataset assembly,
//! training) and one-off predictions.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cough screening pipeline - dataset assembly, training, and prediction
#[derive(Parser, Debug)]
#[command(name = "coughscreen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the synthetic TB-cough demo recording
    #[command(name = "gen-demo")]
    GenDemo {
        /// Output WAV path
        #[arg(short, long, default_value = "demo_tb_cough.wav")]
        output: PathBuf,

        /// RNG seed for the noise component
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },

    /// Assemble the master training table from the configured sources
    #[command(name = "build-dataset")]
    BuildDataset {
        /// Root of the class-named raw-audio directories
        #[arg(short, long)]
        audio_dir: Option<PathBuf>,

        /// Pre-existing feature table (CSV)
        #[arg(short, long, default_value = "train.csv")]
        features: PathBuf,

        /// Output path for the master table
        #[arg(short, long, default_value = "master_dataset.csv")]
        output: PathBuf,
    },

    /// Relabel a feature table from its filename column
    #[command(name = "relabel")]
    Relabel {
        /// Input table with a `filename` column
        input: PathBuf,

        /// Output path for the relabeled table
        #[arg(short, long, default_value = "train_fixed.csv")]
        output: PathBuf,
    },

    /// Report row and per-label counts of a training table
    #[command(name = "inspect-dataset")]
    InspectDataset {
        /// Path to the table
        path: PathBuf,
    },

    /// Train the classifier on an assembled table
    #[command(name = "train")]
    Train {
        /// Path to the master training table
        #[arg(short, long, default_value = "master_dataset.csv")]
        dataset: PathBuf,

        /// Output path for the model artifact
        #[arg(short, long, default_value = "audio_model.json")]
        model: PathBuf,
    },

    /// Classify a single WAV recording
    #[command(name = "predict")]
    Predict {
        /// Path to the recording
        input: PathBuf,

        /// Path to the model artifact
        #[arg(short, long, default_value = "audio_model.json")]
        model: PathBuf,
    },
}
