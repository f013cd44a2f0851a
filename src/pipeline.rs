//! The two-operation contract the surrounding application calls into:
//! `extract_features(audio) -> vector` and `classify(vector) -> result`.
//!
//! Extraction decodes, downmixes, resamples, truncates to the first 3
//! seconds, and computes the mean-MFCC descriptor. Classification goes
//! through the process-wide inference service.

use std::path::Path;

use once_cell::sync::Lazy;

use crate::audio;
use crate::config::{PipelineConfig, SAMPLE_RATE};
use crate::error::Result;
use crate::features::{FeatureVector, MfccExtractor};
use crate::service::{self, Classification};

/// Shared extractor: the window, FFT plan, and filterbank are computed once
static EXTRACTOR: Lazy<MfccExtractor> = Lazy::new(|| MfccExtractor::new(SAMPLE_RATE));

/// Extract the 45-dimensional feature vector from a WAV file.
///
/// # Errors
/// * `FileNotFound` / `DecodeError` - unreadable or malformed audio
/// * `TooShort` - signal below the minimum analyzable length
pub fn extract_features(path: &Path) -> Result<FeatureVector> {
    extract_with(&EXTRACTOR, path, &PipelineConfig::default())
}

/// Extract features from WAV bytes held in memory (e.g. a live recording).
///
/// Decoding happens directly from the buffer; no temporary file is staged.
pub fn extract_features_from_bytes(bytes: &[u8]) -> Result<FeatureVector> {
    let mut clip = audio::decode_wav_bytes(bytes)?;
    clip.truncate(PipelineConfig::default().max_samples());
    EXTRACTOR.extract(&clip)
}

/// Extraction against an explicit extractor and configuration.
///
/// The dataset builder uses this to share one extractor across a batch.
pub(crate) fn extract_with(
    extractor: &MfccExtractor,
    path: &Path,
    config: &PipelineConfig,
) -> Result<FeatureVector> {
    let mut clip = audio::load_clip(path)?;
    clip.truncate(config.max_samples());
    extractor.extract(&clip)
}

/// Classify a feature vector with the process-wide inference service.
///
/// # Errors
/// `ModelUnavailable` while no artifact is loaded.
pub fn classify(vector: &FeatureVector) -> Result<Classification> {
    service::instance().predict(vector)
}
