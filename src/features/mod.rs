//! Acoustic feature extraction.
//!
//! Turns a variable-length audio clip into a fixed 45-dimensional descriptor:
//! per-frame Mel-frequency cepstral coefficients, collapsed over time by
//! arithmetic mean per coefficient.

pub mod fft;
pub mod mel;
pub mod mfcc;
pub mod vector;

pub use mfcc::MfccExtractor;
pub use vector::FeatureVector;
