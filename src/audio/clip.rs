//! Mono audio clip type.
//!
//! All internal processing uses mono 32-bit float samples at 22.05kHz.

use crate::config::SAMPLE_RATE;

/// A mono time series of floating-point amplitude samples.
///
/// Transient: exists only for the duration of one extraction call.
///
/// # Example
/// ```
/// use coughscreen::audio::AudioClip;
/// use coughscreen::config::SAMPLE_RATE;
///
/// let clip = AudioClip::from_samples(vec![0.0; SAMPLE_RATE as usize], SAMPLE_RATE);
/// assert!((clip.duration_secs() - 1.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct AudioClip {
    /// Sample data, mono
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioClip {
    /// Create a clip from existing samples
    pub fn from_samples(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Create a silent clip of the given length at the internal rate
    pub fn silence(num_samples: usize) -> Self {
        Self {
            samples: vec![0.0; num_samples],
            sample_rate: SAMPLE_RATE,
        }
    }

    /// Number of samples
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the clip contains no samples
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    #[inline]
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.len() as f64 / self.sample_rate as f64
    }

    /// Check if all samples are finite (not NaN or Infinity)
    pub fn is_finite(&self) -> bool {
        self.samples.iter().all(|s| s.is_finite())
    }

    /// Truncate the clip to at most `max_samples` samples.
    ///
    /// Shorter clips are left unchanged; no padding is ever applied.
    pub fn truncate(&mut self, max_samples: usize) {
        if self.samples.len() > max_samples {
            self.samples.truncate(max_samples);
        }
    }

    /// Peak absolute amplitude, 0.0 for an empty clip
    pub fn peak(&self) -> f32 {
        self.samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence() {
        let clip = AudioClip::silence(1000);
        assert_eq!(clip.len(), 1000);
        assert_eq!(clip.sample_rate, SAMPLE_RATE);
        assert!(clip.samples.iter().all(|&s| s == 0.0));
        assert_eq!(clip.peak(), 0.0);
    }

    #[test]
    fn test_duration() {
        let clip = AudioClip::silence(SAMPLE_RATE as usize * 3);
        assert!((clip.duration_secs() - 3.0).abs() < 1e-9);

        let zero_rate = AudioClip::from_samples(vec![0.0; 10], 0);
        assert_eq!(zero_rate.duration_secs(), 0.0);
    }

    #[test]
    fn test_truncate() {
        let mut clip = AudioClip::silence(1000);
        clip.truncate(500);
        assert_eq!(clip.len(), 500);

        // Shorter than the limit: unchanged, never padded
        clip.truncate(2000);
        assert_eq!(clip.len(), 500);
    }

    #[test]
    fn test_is_finite() {
        let clip = AudioClip::from_samples(vec![0.1, -0.2, 0.3], SAMPLE_RATE);
        assert!(clip.is_finite());

        let bad = AudioClip::from_samples(vec![0.1, f32::NAN], SAMPLE_RATE);
        assert!(!bad.is_finite());
    }

    #[test]
    fn test_peak() {
        let clip = AudioClip::from_samples(vec![0.1, -0.8, 0.3], SAMPLE_RATE);
        assert!((clip.peak() - 0.8).abs() < 1e-6);
    }
}
