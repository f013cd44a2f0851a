//! Random forest training, prediction, and artifact persistence.
//!
//! Bagging with per-tree bootstrap samples and per-split random feature
//! subsets. Class imbalance (TB recordings vastly outnumber healthy controls
//! in the source data) is corrected with balanced sample weights:
//! `n_samples / (n_classes * class_count)`.
//!
//! The serialized artifact captures the fitted trees and the label ordering
//! used for probability indexing, so a loaded forest reproduces the trained
//! forest's predictions exactly.

use std::fs;
use std::path::Path;

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::FEATURE_COUNT;
use crate::dataset::TrainingTable;
use crate::error::{Result, ScreenError};
use crate::features::FeatureVector;
use crate::label::ClassLabel;
use crate::model::tree::{DecisionTree, FitContext};

/// Training parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainParams {
    /// Number of trees in the ensemble
    pub num_trees: usize,
    /// Depth cap per tree
    pub max_depth: usize,
    /// Minimum samples required to attempt a split
    pub min_samples_split: usize,
    /// Master seed; per-tree streams are derived from it
    pub seed: u64,
}

impl Default for TrainParams {
    fn default() -> Self {
        TrainParams {
            num_trees: 100,
            max_depth: 32,
            min_samples_split: 2,
            seed: 42,
        }
    }
}

/// A fitted, serializable decision ensemble.
///
/// Read-only after construction; concurrent prediction requires no locking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    /// Label ordering for probability output indexing
    labels: Vec<ClassLabel>,
    params: TrainParams,
}

impl RandomForest {
    /// Fit a forest on the assembled training table.
    ///
    /// # Errors
    /// `SingleClass` if the table holds fewer than two distinct classes;
    /// `MalformedTable` if it is empty.
    pub fn train(table: &TrainingTable, params: TrainParams) -> Result<Self> {
        if table.is_empty() {
            return Err(ScreenError::MalformedTable {
                reason: "training table is empty".to_string(),
            });
        }

        let labels = table.distinct_labels();
        if labels.len() < 2 {
            return Err(ScreenError::SingleClass {
                found: labels.len(),
            });
        }

        let x: Vec<&[f32]> = table
            .samples
            .iter()
            .map(|s| s.features.as_slice())
            .collect();
        let y: Vec<usize> = table
            .samples
            .iter()
            .map(|s| labels.iter().position(|l| *l == s.label).unwrap())
            .collect();

        let weights = balanced_weights(&y, labels.len());

        let features_per_split = (FEATURE_COUNT as f64).sqrt().floor().max(1.0) as usize;
        let ctx = FitContext {
            x: &x,
            y: &y,
            weights: &weights,
            num_classes: labels.len(),
            num_features: FEATURE_COUNT,
            features_per_split,
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
        };

        info!(
            "training {} trees on {} samples, {} classes",
            params.num_trees,
            table.len(),
            labels.len()
        );

        let num_samples = table.len();
        let trees = (0..params.num_trees)
            .map(|t| {
                // Independent deterministic stream per tree
                let mut rng = StdRng::seed_from_u64(params.seed.wrapping_add(t as u64));
                let bootstrap: Vec<usize> = (0..num_samples)
                    .map(|_| rng.gen_range(0..num_samples))
                    .collect();
                DecisionTree::fit(&ctx, bootstrap, &mut rng)
            })
            .collect();

        Ok(RandomForest {
            trees,
            labels,
            params,
        })
    }

    /// Averaged class probabilities, indexed by `labels()`
    pub fn predict_proba(&self, vector: &FeatureVector) -> Vec<f32> {
        let mut sums = vec![0.0_f64; self.labels.len()];
        for tree in &self.trees {
            for (sum, p) in sums.iter_mut().zip(tree.predict_distribution(vector.as_slice())) {
                *sum += *p as f64;
            }
        }
        sums.iter()
            .map(|s| (s / self.trees.len() as f64) as f32)
            .collect()
    }

    /// Most probable class and its probability (0.0..=1.0)
    pub fn predict(&self, vector: &FeatureVector) -> (ClassLabel, f32) {
        let probs = self.predict_proba(vector);
        let (idx, &prob) = probs
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .expect("forest always has at least two classes");
        (self.labels[idx], prob)
    }

    /// Label ordering used for probability indexing
    pub fn labels(&self) -> &[ClassLabel] {
        &self.labels
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Serialize the forest to a JSON artifact, atomically.
    ///
    /// Writes to a temp file in the same directory, then renames over the
    /// target, so a serving process never observes a half-written artifact.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(self)?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        info!("model artifact written to {}", path.display());
        Ok(())
    }

    /// Load a forest from a JSON artifact
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ScreenError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let json = fs::read_to_string(path)?;
        let forest: RandomForest = serde_json::from_str(&json)?;
        Ok(forest)
    }
}

/// Balanced sample weights: `n_samples / (n_classes * class_count)`
fn balanced_weights(y: &[usize], num_classes: usize) -> Vec<f64> {
    let mut counts = vec![0usize; num_classes];
    for &c in y {
        counts[c] += 1;
    }

    let n = y.len() as f64;
    y.iter()
        .map(|&c| n / (num_classes as f64 * counts[c] as f64))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
