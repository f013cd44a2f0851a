//! coughscreen - Acoustic Cough Screening Pipeline
//!
//! Screens short cough recordings for acoustic patterns associated with
//! respiratory disease (tuberculosis vs. normal). The surrounding
//! application interacts with two operations:
//!
//! 1. `pipeline::extract_features` - raw audio to a fixed 45-dimensional
//!    mean-MFCC descriptor
//! 2. `pipeline::classify` - descriptor to a diagnostic class plus a
//!    confidence percentage
//!
//! # Architecture
//!
//! - `audio`: WAV decode, mono downmix, resample to 22.05kHz
//! - `features`: framing, FFT, mel filterbank, DCT, mean over time
//! - `dataset`: offline assembly of the labeled training table
//! - `model`: seeded class-balanced random forest and its JSON artifact
//! - `service`: process-lifetime inference singleton with a degraded
//!   "unavailable" state instead of crashes

pub mod audio;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod fixtures;
pub mod label;
pub mod model;
pub mod pipeline;
pub mod service;

pub use config::PipelineConfig;
pub use error::{Result, ScreenError};
pub use features::FeatureVector;
pub use label::ClassLabel;
pub use pipeline::{classify, extract_features, extract_features_from_bytes};
pub use service::{Classification, InferenceService};
