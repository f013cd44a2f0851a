//! Inference service.
//!
//! Holds one loaded model artifact for the lifetime of the process. The
//! artifact is loaded exactly once behind a guarded initialization; if it is
//! missing or corrupt the service enters a degraded state where every call
//! returns `ModelUnavailable` instead of crashing, until an explicit reload.
//!
//! The loaded forest is never mutated, so concurrent prediction only ever
//! takes the read side of the lock; the write side exists solely for
//! explicit reloads after retraining.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use log::{info, warn};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::error::{Result, ScreenError};
use crate::features::FeatureVector;
use crate::label::ClassLabel;
use crate::model::RandomForest;

/// Result of one inference call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: ClassLabel,
    /// Max class probability as a percentage, one decimal of precision
    pub confidence: f32,
}

enum ModelState {
    Ready(Arc<RandomForest>),
    Unavailable(String),
}

/// Process-lifetime holder of the loaded model artifact.
pub struct InferenceService {
    state: RwLock<ModelState>,
    artifact_path: PathBuf,
}

impl InferenceService {
    /// Load the artifact from `path`.
    ///
    /// Never fails: a missing or corrupt artifact puts the service in a
    /// degraded state where `predict` returns `ModelUnavailable`.
    pub fn load(path: &Path) -> Self {
        let state = match RandomForest::load(path) {
            Ok(forest) => {
                info!(
                    "model loaded from {} ({} trees, labels {:?})",
                    path.display(),
                    forest.num_trees(),
                    forest.labels()
                );
                ModelState::Ready(Arc::new(forest))
            }
            Err(e) => {
                warn!("model unavailable: {}", e);
                ModelState::Unavailable(e.to_string())
            }
        };

        Self {
            state: RwLock::new(state),
            artifact_path: path.to_path_buf(),
        }
    }

    /// Whether a model is currently loaded
    pub fn is_ready(&self) -> bool {
        matches!(*self.state.read().unwrap(), ModelState::Ready(_))
    }

    /// Classify a feature vector.
    ///
    /// Deterministic: the same vector always yields the same result.
    ///
    /// # Errors
    /// `ModelUnavailable` while the service is degraded.
    pub fn predict(&self, vector: &FeatureVector) -> Result<Classification> {
        let forest = match &*self.state.read().unwrap() {
            ModelState::Ready(forest) => Arc::clone(forest),
            ModelState::Unavailable(reason) => {
                return Err(ScreenError::ModelUnavailable {
                    reason: reason.clone(),
                })
            }
        };

        let (label, prob) = forest.predict(vector);
        Ok(Classification {
            label,
            confidence: round_percent(prob),
        })
    }

    /// Classify raw values, validating shape and finiteness first.
    ///
    /// Rejects anything that is not exactly 45 finite numbers before
    /// touching the model; nothing is ever silently truncated or padded.
    pub fn predict_raw(&self, values: &[f32]) -> Result<Classification> {
        let vector = FeatureVector::new(values.to_vec())?;
        self.predict(&vector)
    }

    /// Re-attempt loading the artifact (after retraining replaced it).
    ///
    /// # Errors
    /// The load error if the artifact is still unavailable; the service
    /// stays degraded in that case.
    pub fn reload(&self) -> Result<()> {
        match RandomForest::load(&self.artifact_path) {
            Ok(forest) => {
                info!("model reloaded from {}", self.artifact_path.display());
                *self.state.write().unwrap() = ModelState::Ready(Arc::new(forest));
                Ok(())
            }
            Err(e) => {
                *self.state.write().unwrap() = ModelState::Unavailable(e.to_string());
                Err(e)
            }
        }
    }
}

/// Probability (0..=1) to a percentage with one decimal of precision
fn round_percent(prob: f32) -> f32 {
    (prob * 1000.0).round() / 10.0
}

// ============================================================================
// Process-wide singleton
// ============================================================================

static SERVICE: OnceCell<InferenceService> = OnceCell::new();

/// Get the process-wide service, loading the artifact on first use.
///
/// Concurrent first callers are serialized by the cell: the artifact is
/// loaded exactly once and no caller can observe a partially-constructed
/// service.
pub fn instance() -> &'static InferenceService {
    SERVICE.get_or_init(|| InferenceService::load(&PipelineConfig::default().model_path))
}

/// Initialize the singleton with an explicit artifact path.
///
/// Returns the already-initialized service if one exists; the configured
/// path wins only on first call.
pub fn init(path: &Path) -> &'static InferenceService {
    SERVICE.get_or_init(|| InferenceService::load(path))
}

// ============================================================================
// Tests
// ============================================================================
