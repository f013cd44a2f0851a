//! FFT computation with Hann windowing.
//!
//! Windowing reduces spectral leakage before the transform; the power
//! spectrum (squared magnitude, positive frequencies only) feeds the mel
//! filterbank.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// FFT processor that computes power spectra from audio frames
pub struct FftProcessor {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    /// Hann window (pre-computed)
    window: Vec<f32>,
}

impl FftProcessor {
    /// Create a new FFT processor
    ///
    /// # Arguments
    /// * `fft_size` - FFT window size (2048 for MFCC extraction)
    pub fn new(fft_size: usize) -> Self {
        let window = (0..fft_size)
            .map(|i| {
                0.5 * (1.0
                    - ((2.0 * std::f32::consts::PI * i as f32) / (fft_size as f32 - 1.0)).cos())
            })
            .collect();

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        Self {
            fft,
            fft_size,
            window,
        }
    }

    /// FFT window size in samples
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of power spectrum bins produced per frame
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Compute the power spectrum of one frame.
    ///
    /// Applies Hann windowing, performs the FFT, and returns squared
    /// magnitudes for positive frequencies only (exploiting the symmetry of
    /// a real-valued transform). Frames shorter than the FFT size are
    /// zero-padded.
    ///
    /// # Arguments
    /// * `frame` - Audio frame (length <= fft_size)
    ///
    /// # Returns
    /// Power spectrum (size = fft_size / 2 + 1)
    pub fn power_spectrum(&self, frame: &[f32]) -> Vec<f32> {
        let mut buffer: Vec<Complex<f32>> = Vec::with_capacity(self.fft_size);

        for (i, &sample) in frame.iter().take(self.fft_size).enumerate() {
            buffer.push(Complex::new(sample * self.window[i], 0.0));
        }

        while buffer.len() < self.fft_size {
            buffer.push(Complex::new(0.0, 0.0));
        }

        self.fft.process(&mut buffer);

        buffer[..self.num_bins()]
            .iter()
            .map(|c| c.norm_sqr())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_count() {
        let processor = FftProcessor::new(2048);
        assert_eq!(processor.num_bins(), 1025);
        assert_eq!(processor.power_spectrum(&vec![0.1; 2048]).len(), 1025);
    }

    #[test]
    fn test_silence_yields_zero_spectrum() {
        let processor = FftProcessor::new(1024);
        let spectrum = processor.power_spectrum(&vec![0.0; 1024]);
        assert!(spectrum.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn test_sine_peaks_at_expected_bin() {
        let fft_size = 1024;
        let sample_rate = 22050.0_f32;
        let processor = FftProcessor::new(fft_size);

        // Place a tone exactly on bin 64
        let bin = 64;
        let freq = bin as f32 * sample_rate / fft_size as f32;
        let frame: Vec<f32> = (0..fft_size)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate).sin())
            .collect();

        let spectrum = processor.power_spectrum(&frame);
        let peak_bin = spectrum
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();

        assert_eq!(peak_bin, bin);
    }

    #[test]
    fn test_short_frame_zero_padded() {
        let processor = FftProcessor::new(1024);
        let spectrum = processor.power_spectrum(&vec![0.5; 100]);
        assert_eq!(spectrum.len(), 513);
        // Some energy present despite padding
        assert!(spectrum.iter().any(|&p| p > 0.0));
    }

    #[test]
    fn test_spectrum_is_finite() {
        let processor = FftProcessor::new(1024);
        let frame: Vec<f32> = (0..1024).map(|i| ((i % 7) as f32 - 3.0) / 4.0).collect();
        let spectrum = processor.power_spectrum(&frame);
        assert!(spectrum.iter().all(|p| p.is_finite()));
    }
}
