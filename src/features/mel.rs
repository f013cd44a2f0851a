//! Mel filterbank and cepstral transform.
//!
//! The mel scale uses the HTK formula (2595 * log10(1 + f/700)). Filters are
//! triangular, span 0 Hz to Nyquist, and are applied to power spectra. The
//! cepstral step is an orthonormal DCT-II over the log mel energies.

/// Convert a frequency in Hz to mels (HTK formula)
#[inline]
pub fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

/// Convert mels back to Hz
#[inline]
pub fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10.0_f32.powf(mel / 2595.0) - 1.0)
}

/// Triangular mel filterbank.
///
/// Rows are filters, columns are power-spectrum bins.
pub struct MelFilterbank {
    filters: Vec<Vec<f32>>,
}

impl MelFilterbank {
    /// Build a filterbank of `n_mels` triangular filters.
    ///
    /// # Arguments
    /// * `n_mels` - Number of mel bands
    /// * `fft_size` - FFT size the power spectra were computed with
    /// * `sample_rate` - Sample rate in Hz
    pub fn new(n_mels: usize, fft_size: usize, sample_rate: u32) -> Self {
        let num_bins = fft_size / 2 + 1;
        let nyquist = sample_rate as f32 / 2.0;

        // n_mels + 2 edge points, evenly spaced on the mel scale
        let mel_max = hz_to_mel(nyquist);
        let edges: Vec<f32> = (0..n_mels + 2)
            .map(|i| mel_to_hz(mel_max * i as f32 / (n_mels + 1) as f32))
            .collect();

        let hz_per_bin = sample_rate as f32 / fft_size as f32;

        let mut filters = Vec::with_capacity(n_mels);
        for m in 0..n_mels {
            let (lower, center, upper) = (edges[m], edges[m + 1], edges[m + 2]);

            let mut filter = vec![0.0_f32; num_bins];
            for (bin, weight) in filter.iter_mut().enumerate() {
                let freq = bin as f32 * hz_per_bin;
                if freq > lower && freq < upper {
                    *weight = if freq <= center {
                        (freq - lower) / (center - lower)
                    } else {
                        (upper - freq) / (upper - center)
                    };
                }
            }
            filters.push(filter);
        }

        Self { filters }
    }

    /// Number of mel bands
    pub fn num_bands(&self) -> usize {
        self.filters.len()
    }

    /// Apply the filterbank to a power spectrum, producing one energy per band
    pub fn apply(&self, power_spectrum: &[f32]) -> Vec<f32> {
        self.filters
            .iter()
            .map(|filter| {
                filter
                    .iter()
                    .zip(power_spectrum.iter())
                    .map(|(w, p)| w * p)
                    .sum()
            })
            .collect()
    }
}

/// Orthonormal DCT-II, keeping the first `n_out` coefficients.
///
/// # Arguments
/// * `input` - Log mel energies
/// * `n_out` - Number of cepstral coefficients to keep (n_out <= input.len())
pub fn dct_ii(input: &[f32], n_out: usize) -> Vec<f32> {
    let n = input.len();
    debug_assert!(n_out <= n);

    let scale0 = (1.0 / n as f32).sqrt();
    let scale = (2.0 / n as f32).sqrt();

    (0..n_out)
        .map(|k| {
            let sum: f32 = input
                .iter()
                .enumerate()
                .map(|(i, &x)| {
                    x * (std::f32::consts::PI * (i as f32 + 0.5) * k as f32 / n as f32).cos()
                })
                .sum();
            if k == 0 {
                sum * scale0
            } else {
                sum * scale
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mel_scale_roundtrip() {
        for hz in [0.0, 100.0, 440.0, 1000.0, 8000.0, 11025.0] {
            assert_relative_eq!(mel_to_hz(hz_to_mel(hz)), hz, max_relative = 1e-4);
        }
    }

    #[test]
    fn test_mel_scale_reference_point() {
        // 1000 Hz is very close to 1000 mel by construction of the formula
        assert_relative_eq!(hz_to_mel(1000.0), 999.99, max_relative = 1e-3);
    }

    #[test]
    fn test_filterbank_shape() {
        let bank = MelFilterbank::new(128, 2048, 22050);
        assert_eq!(bank.num_bands(), 128);
        assert_eq!(bank.apply(&vec![1.0; 1025]).len(), 128);
    }

    #[test]
    fn test_filters_nonnegative_and_nonempty() {
        let bank = MelFilterbank::new(40, 1024, 22050);
        for filter in &bank.filters {
            assert!(filter.iter().all(|&w| (0.0..=1.0).contains(&w)));
        }
        // Every filter should cover at least one bin at this resolution
        let energies = bank.apply(&vec![1.0; 513]);
        assert!(energies.iter().all(|&e| e > 0.0));
    }

    #[test]
    fn test_flat_spectrum_energy_positive() {
        let bank = MelFilterbank::new(128, 2048, 22050);
        let energies = bank.apply(&vec![1.0; 1025]);
        assert!(energies.iter().all(|&e| e >= 0.0 && e.is_finite()));
    }

    #[test]
    fn test_dct_constant_input() {
        // DCT-II of a constant: only the zeroth coefficient is nonzero
        let input = vec![3.0; 16];
        let coeffs = dct_ii(&input, 8);

        assert_relative_eq!(coeffs[0], 3.0 * 16.0_f32.sqrt(), max_relative = 1e-5);
        for &c in &coeffs[1..] {
            assert!(c.abs() < 1e-4, "expected ~0, got {}", c);
        }
    }

    #[test]
    fn test_dct_orthonormal_energy() {
        // Parseval: full-length orthonormal DCT preserves energy
        let input: Vec<f32> = (0..32).map(|i| ((i * 7 % 13) as f32 - 6.0) / 6.0).collect();
        let coeffs = dct_ii(&input, 32);

        let in_energy: f32 = input.iter().map(|x| x * x).sum();
        let out_energy: f32 = coeffs.iter().map(|x| x * x).sum();
        assert_relative_eq!(in_energy, out_energy, max_relative = 1e-4);
    }

    #[test]
    fn test_dct_truncation() {
        let input = vec![1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        let full = dct_ii(&input, 8);
        let truncated = dct_ii(&input, 3);
        assert_eq!(truncated.len(), 3);
        assert_eq!(&full[..3], truncated.as_slice());
    }
}
