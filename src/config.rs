//! Pipeline configuration.
//!
//! The three coupled values (sample rate, clip duration, coefficient count)
//! must be identical between training and inference or predictions become
//! meaningless. The analysis parameters (FFT size, hop, mel band count) are
//! pinned explicitly here rather than left to library defaults for the same
//! reason.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Sample rate all audio is resampled to before analysis (Hz)
pub const SAMPLE_RATE: u32 = 22050;

/// Maximum clip duration used for analysis (seconds)
pub const CLIP_DURATION_SECS: f32 = 3.0;

/// Number of Mel-frequency cepstral coefficients per feature vector
pub const FEATURE_COUNT: usize = 45;

/// FFT analysis window size in samples
pub const FFT_SIZE: usize = 2048;

/// Hop between successive analysis frames in samples
pub const HOP_SIZE: usize = 512;

/// Number of mel filterbank bands
pub const MEL_BANDS: usize = 128;

/// Floor applied to mel energies before the log, so that silent frames
/// produce finite coefficients instead of -inf/NaN
pub const LOG_FLOOR: f32 = 1e-10;

/// Minimum analyzable signal length: one full analysis window.
/// Anything shorter cannot produce a single frame and is rejected.
pub const MIN_SAMPLES: usize = FFT_SIZE;

/// Configuration for the screening pipeline.
///
/// Covers the coupled analysis values plus the file locations consumed by
/// the batch jobs and the inference service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    /// Target sample rate in Hz
    pub sample_rate: u32,
    /// Clip duration in seconds
    pub clip_duration_secs: f32,
    /// Number of MFCC coefficients
    pub feature_count: usize,
    /// Path to the serialized model artifact
    pub model_path: PathBuf,
    /// Path to the assembled training table
    pub dataset_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            sample_rate: SAMPLE_RATE,
            clip_duration_secs: CLIP_DURATION_SECS,
            feature_count: FEATURE_COUNT,
            model_path: PathBuf::from("audio_model.json"),
            dataset_path: PathBuf::from("master_dataset.csv"),
        }
    }
}

impl PipelineConfig {
    /// Maximum number of samples kept from a clip after resampling
    pub fn max_samples(&self) -> usize {
        (self.sample_rate as f32 * self.clip_duration_secs) as usize
    }
}
