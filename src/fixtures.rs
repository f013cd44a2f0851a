//! Synthetic demo audio.
//!
//! Generates the canonical 3-second TB-style cough used at exhibitions and as
//! the golden input for integration tests: a decaying low-frequency rumble
//! blended with filtered noise, shaped by three cough-burst envelopes.
//!
//! Generation is seeded so a given seed always produces the identical WAV.

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::audio::{write_wav, AudioClip};
use crate::config::{CLIP_DURATION_SECS, SAMPLE_RATE};
use crate::error::Result;

/// Burst onsets in seconds: three distinct coughs
const BURST_STARTS: [f32; 3] = [0.2, 1.2, 2.2];

/// Each burst lasts 0.4s
const BURST_LEN_SECS: f32 = 0.4;

/// Rumble frequency in Hz, the heavy low-end typical of TB coughs
const RUMBLE_HZ: f32 = 60.0;

/// Synthesize a TB-style cough clip.
///
/// # Arguments
/// * `seed` - RNG seed for the noise component
///
/// # Returns
/// A 3-second mono clip at the internal sample rate, peak-normalized to 1.0
pub fn tb_cough(seed: u64) -> AudioClip {
    let num_samples = (CLIP_DURATION_SECS * SAMPLE_RATE as f32) as usize;
    let mut rng = StdRng::seed_from_u64(seed);

    let mut samples = Vec::with_capacity(num_samples);
    for i in 0..num_samples {
        let t = i as f32 / SAMPLE_RATE as f32;

        // Base heavy rumble, decaying over the clip
        let rumble = (2.0 * std::f32::consts::PI * RUMBLE_HZ * t).sin() * (-t * 2.0).exp();

        // The 'crackle' of inflammation
        let noise = gaussian(&mut rng);

        // Burst envelope: silence outside the three coughs
        let mut envelope = 0.0;
        for &start in &BURST_STARTS {
            if t >= start && t <= start + BURST_LEN_SECS {
                envelope = (-(t - start) * 10.0).exp();
                break;
            }
        }

        samples.push((0.6 * rumble + 0.4 * noise) * envelope);
    }

    // Peak-normalize so the 16-bit PCM export uses the full range
    let peak = samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max);
    if peak > 0.0 {
        for s in &mut samples {
            *s /= peak;
        }
    }

    AudioClip::from_samples(samples, SAMPLE_RATE)
}

/// Write the demo cough to a WAV file
pub fn write_demo_wav(path: &Path, seed: u64) -> Result<()> {
    write_wav(&tb_cough(seed), path)
}

/// Approximate standard normal via the sum of 12 uniforms
fn gaussian(rng: &mut StdRng) -> f32 {
    (0..12).map(|_| rng.gen::<f32>()).sum::<f32>() - 6.0
}
