//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::{Path, PathBuf};

use log::info;

use crate::config::PipelineConfig;
use crate::dataset::{builder, DatasetBuilder, TrainingTable};
use crate::error::Result;
use crate::fixtures;
use crate::model::{RandomForest, TrainParams};
use crate::pipeline;
use crate::service::InferenceService;

/// Generate the synthetic TB-cough demo WAV.
pub fn gen_demo(output: &Path, seed: u64) -> Result<()> {
    info!("generating demo cough (seed {})", seed);

    fixtures::write_demo_wav(output, seed)?;
    println!("Demo recording written: {}", output.display());

    Ok(())
}

/// Assemble the master training table.
pub fn build_dataset(
    audio_dir: Option<PathBuf>,
    features: &Path,
    output: &Path,
) -> Result<()> {
    info!("assembling master dataset into {}", output.display());

    let config = PipelineConfig::default();
    let dataset = DatasetBuilder::new(audio_dir, features.to_path_buf());
    let table = dataset.build(&config, output)?;

    println!("Master dataset created: {} samples", table.len());
    for (label, count) in table.label_counts() {
        println!("  {:<8} {}", label, count);
    }

    Ok(())
}

/// Relabel a feature table from filename substrings.
pub fn relabel(input: &Path, output: &Path) -> Result<()> {
    let relabeled = builder::relabel(input, output)?;

    println!(
        "Relabeled table written: {} ({} rows)",
        output.display(),
        relabeled.len()
    );

    Ok(())
}

/// Report row and per-label counts of a training table.
pub fn inspect_dataset(path: &Path) -> Result<()> {
    let table = TrainingTable::read_csv(path)?;

    println!("Total rows: {}", table.len());
    println!("Labels:");
    for (label, count) in table.label_counts() {
        println!("  {:<8} {}", label, count);
    }

    Ok(())
}

/// Train the classifier and write the artifact.
pub fn train(dataset: &Path, model: &Path) -> Result<()> {
    let table = TrainingTable::read_csv(dataset)?;
    info!("training on {} samples with 45 features", table.len());

    let forest = RandomForest::train(&table, TrainParams::default())?;
    forest.save(model)?;

    println!(
        "Model trained on {} samples ({} trees), saved to {}",
        table.len(),
        forest.num_trees(),
        model.display()
    );

    Ok(())
}

/// Classify one recording and print the result.
pub fn predict(input: &Path, model: &Path) -> Result<()> {
    let vector = pipeline::extract_features(input)?;

    let service = InferenceService::load(model);
    let result = service.predict(&vector)?;

    println!(
        "Result: {} ({:.1}% confidence)",
        result.label, result.confidence
    );

    Ok(())
}
