//! MFCC extraction.
//!
//! Frames the clip (2048-sample Hann windows, hop 512, no centering pad),
//! computes the power spectrum per frame, applies the 128-band mel
//! filterbank, takes the log with a fixed floor, and keeps the first 45
//! orthonormal DCT-II coefficients. The time axis is collapsed by arithmetic
//! mean per coefficient.
//!
//! The floor on mel energies guarantees silent or near-silent frames still
//! produce finite coefficients.

use log::debug;

use crate::audio::AudioClip;
use crate::config::{FEATURE_COUNT, FFT_SIZE, HOP_SIZE, LOG_FLOOR, MEL_BANDS, MIN_SAMPLES};
use crate::error::{Result, ScreenError};
use crate::features::fft::FftProcessor;
use crate::features::mel::{dct_ii, MelFilterbank};
use crate::features::vector::FeatureVector;

/// Computes mean MFCC feature vectors from audio clips.
///
/// Construction precomputes the Hann window, FFT plan, and mel filterbank;
/// one extractor can be reused across clips and is safe to share behind a
/// shared reference (extraction takes `&self` and holds no mutable state).
pub struct MfccExtractor {
    fft: FftProcessor,
    filterbank: MelFilterbank,
    sample_rate: u32,
}

impl MfccExtractor {
    /// Create an extractor for the given sample rate with the pinned
    /// analysis parameters
    pub fn new(sample_rate: u32) -> Self {
        Self {
            fft: FftProcessor::new(FFT_SIZE),
            filterbank: MelFilterbank::new(MEL_BANDS, FFT_SIZE, sample_rate),
            sample_rate,
        }
    }

    /// Extract the 45-dimensional mean MFCC descriptor from a clip.
    ///
    /// The clip must already be mono at the extractor's sample rate (the
    /// `audio::io` decoders guarantee this). Clips shorter than one full
    /// analysis window are rejected; shorter-than-3s clips are otherwise
    /// used as-is, without padding.
    ///
    /// # Errors
    /// * `TooShort` - fewer samples than one analysis window
    /// * `DecodeError` - non-finite samples in the decoded signal
    pub fn extract(&self, clip: &AudioClip) -> Result<FeatureVector> {
        if clip.len() < MIN_SAMPLES {
            return Err(ScreenError::TooShort {
                samples: clip.len(),
                duration_secs: clip.duration_secs(),
                min_samples: MIN_SAMPLES,
            });
        }

        if !clip.is_finite() {
            return Err(ScreenError::DecodeError {
                reason: "decoded signal contains non-finite samples".to_string(),
                source: None,
            });
        }

        let mut sums = vec![0.0_f64; FEATURE_COUNT];
        let mut num_frames = 0usize;

        let mut start = 0;
        while start + FFT_SIZE <= clip.len() {
            let frame = &clip.samples[start..start + FFT_SIZE];
            let coeffs = self.frame_mfcc(frame);

            for (sum, c) in sums.iter_mut().zip(coeffs.iter()) {
                *sum += *c as f64;
            }
            num_frames += 1;
            start += HOP_SIZE;
        }

        debug!(
            "extracted {} frames from {:.3}s clip at {}Hz",
            num_frames,
            clip.duration_secs(),
            self.sample_rate
        );

        // len >= MIN_SAMPLES guarantees at least one frame
        let means: Vec<f32> = sums
            .iter()
            .map(|sum| (sum / num_frames as f64) as f32)
            .collect();

        FeatureVector::new(means)
    }

    /// MFCCs for a single frame
    fn frame_mfcc(&self, frame: &[f32]) -> Vec<f32> {
        let power = self.fft.power_spectrum(frame);
        let energies = self.filterbank.apply(&power);

        let log_energies: Vec<f32> = energies
            .iter()
            .map(|&e| 10.0 * e.max(LOG_FLOOR).log10())
            .collect();

        dct_ii(&log_energies, FEATURE_COUNT)
    }
}
