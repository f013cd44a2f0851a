//! WAV decoding and encoding.
//!
//! Accepts WAV-container PCM of arbitrary sample rate, channel count, and bit
//! depth (8/16/24/32-bit int, 32-bit float). Everything is downmixed to mono
//! and resampled to the internal 22.05kHz rate on import. Sample rate
//! conversion uses linear interpolation.

use std::io::{Cursor, Read};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::audio::clip::AudioClip;
use crate::config::SAMPLE_RATE;
use crate::error::{Result, ScreenError};

/// Load a WAV file and convert to internal format.
///
/// # Arguments
/// * `path` - Path to the WAV file
///
/// # Returns
/// * `Ok(AudioClip)` - Mono audio at the internal sample rate
/// * `Err(ScreenError)` - `FileNotFound` or `DecodeError`
pub fn load_clip(path: &Path) -> Result<AudioClip> {
    if !path.exists() {
        return Err(ScreenError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let reader = WavReader::open(path).map_err(|e| ScreenError::DecodeError {
        reason: format!("Failed to open WAV file: {}", e),
        source: Some(Box::new(e)),
    })?;

    decode_reader(reader)
}

/// Decode WAV bytes held in memory (e.g. an uploaded recording).
pub fn decode_wav_bytes(bytes: &[u8]) -> Result<AudioClip> {
    let reader = WavReader::new(Cursor::new(bytes)).map_err(|e| ScreenError::DecodeError {
        reason: format!("Failed to parse WAV data: {}", e),
        source: Some(Box::new(e)),
    })?;

    decode_reader(reader)
}

/// Write a clip to a 16-bit PCM mono WAV file.
///
/// Used by the demo fixture generator and tests; the clip is written at its
/// own sample rate without conversion.
pub fn write_wav(clip: &AudioClip, path: &Path) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: clip.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec).map_err(io_error)?;

    for &sample in &clip.samples {
        let scaled = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
        writer.write_sample(scaled).map_err(io_error)?;
    }

    writer.finalize().map_err(io_error)?;
    Ok(())
}

fn io_error(e: hound::Error) -> ScreenError {
    ScreenError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
}

// ============================================================================
// Internal helper functions
// ============================================================================

fn decode_reader<R: Read>(reader: WavReader<R>) -> Result<AudioClip> {
    let spec = reader.spec();
    let source_rate = spec.sample_rate;
    let channels = spec.channels as usize;

    if channels == 0 {
        return Err(ScreenError::DecodeError {
            reason: "WAV header declares zero channels".to_string(),
            source: None,
        });
    }

    let interleaved = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format)?;

    let mono = downmix_to_mono(&interleaved, channels);

    let samples = if source_rate != SAMPLE_RATE {
        resample_linear(&mono, SAMPLE_RATE as f64 / source_rate as f64)
    } else {
        mono
    };

    Ok(AudioClip::from_samples(samples, SAMPLE_RATE))
}

/// Read samples from a WAV reader and convert to f32 in [-1, 1]
fn read_samples_as_f32<R: Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    match sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(|e| ScreenError::DecodeError {
                reason: format!("Failed to read float samples: {}", e),
                source: Some(Box::new(e)),
            }),
        SampleFormat::Int => match bits_per_sample {
            8 => reader
                .samples::<i8>()
                .map(|s| s.map(|v| v as f32 / 128.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| ScreenError::DecodeError {
                    reason: format!("Failed to read 8-bit samples: {}", e),
                    source: Some(Box::new(e)),
                }),
            16 => reader
                .samples::<i16>()
                .map(|s| s.map(|v| v as f32 / 32768.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| ScreenError::DecodeError {
                    reason: format!("Failed to read 16-bit samples: {}", e),
                    source: Some(Box::new(e)),
                }),
            24 => {
                // 24-bit stored as i32 in hound
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / 8388608.0))
                    .collect::<std::result::Result<Vec<f32>, _>>()
                    .map_err(|e| ScreenError::DecodeError {
                        reason: format!("Failed to read 24-bit samples: {}", e),
                        source: Some(Box::new(e)),
                    })
            }
            32 => reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / 2147483648.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| ScreenError::DecodeError {
                    reason: format!("Failed to read 32-bit int samples: {}", e),
                    source: Some(Box::new(e)),
                }),
            other => Err(ScreenError::DecodeError {
                reason: format!("Unsupported bit depth: {}-bit integer audio", other),
                source: None,
            }),
        },
    }
}

/// Downmix interleaved multi-channel samples to mono by channel average
fn downmix_to_mono(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels == 1 {
        return interleaved.to_vec();
    }

    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Linear interpolation resampling
fn resample_linear(samples: &[f32], ratio: f64) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }

    let source_len = samples.len();
    let target_len = ((source_len as f64) * ratio).ceil() as usize;
    let mut output = Vec::with_capacity(target_len);

    for i in 0..target_len {
        let src_pos = i as f64 / ratio;
        let src_idx = src_pos.floor() as usize;
        let frac = (src_pos - src_idx as f64) as f32;

        let sample = if src_idx + 1 < source_len {
            samples[src_idx] * (1.0 - frac) + samples[src_idx + 1] * frac
        } else if src_idx < source_len {
            samples[src_idx]
        } else {
            0.0
        };

        output.push(sample);
    }

    output
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sine_clip(freq: f32, duration_secs: f32, sample_rate: u32) -> AudioClip {
        let num_samples = (duration_secs * sample_rate as f32) as usize;
        let angular = 2.0 * std::f32::consts::PI * freq / sample_rate as f32;
        let samples = (0..num_samples)
            .map(|i| 0.5 * (angular * i as f32).sin())
            .collect();
        AudioClip::from_samples(samples, sample_rate)
    }

    #[test]
    fn test_round_trip_mono() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone.wav");

        let original = sine_clip(440.0, 0.5, SAMPLE_RATE);
        write_wav(&original, &path).unwrap();

        let loaded = load_clip(&path).unwrap();
        assert_eq!(loaded.sample_rate, SAMPLE_RATE);
        assert_eq!(loaded.len(), original.len());

        for (orig, imp) in original.samples.iter().zip(loaded.samples.iter()) {
            // 16-bit quantization error
            assert!(
                (orig - imp).abs() < 0.001,
                "Sample mismatch: {} vs {}",
                orig,
                imp
            );
        }
    }

    #[test]
    fn test_load_resamples_foreign_rate() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone_44k.wav");

        // 0.5s at 44.1kHz should land at ~0.5s worth of 22.05kHz samples
        let original = sine_clip(440.0, 0.5, 44100);
        write_wav(&original, &path).unwrap();

        let loaded = load_clip(&path).unwrap();
        assert_eq!(loaded.sample_rate, SAMPLE_RATE);

        let expected = (0.5 * SAMPLE_RATE as f32) as i64;
        let diff = (loaded.len() as i64 - expected).abs();
        assert!(diff <= 2, "Resampled length off by {}", diff);
    }

    #[test]
    fn test_decode_bytes_matches_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone.wav");

        let original = sine_clip(200.0, 0.25, SAMPLE_RATE);
        write_wav(&original, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let from_bytes = decode_wav_bytes(&bytes).unwrap();
        let from_file = load_clip(&path).unwrap();

        assert_eq!(from_bytes.samples, from_file.samples);
    }

    #[test]
    fn test_downmix_stereo_average() {
        // L = 1.0, R = 0.0 -> mono 0.5
        let interleaved = vec![1.0, 0.0, 1.0, 0.0, 0.4, 0.2];
        let mono = downmix_to_mono(&interleaved, 2);
        assert_eq!(mono.len(), 3);
        assert!((mono[0] - 0.5).abs() < 1e-6);
        assert!((mono[2] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_stereo_file_downmixed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stereo.wav");

        let spec = WavSpec {
            channels: 2,
            sample_rate: SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for _ in 0..1000 {
            writer.write_sample(16384_i16).unwrap(); // L = 0.5
            writer.write_sample(0_i16).unwrap(); // R = 0.0
        }
        writer.finalize().unwrap();

        let clip = load_clip(&path).unwrap();
        assert_eq!(clip.len(), 1000);
        assert!((clip.samples[0] - 0.25).abs() < 0.001);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_clip(Path::new("/nonexistent/path/audio.wav"));
        assert!(matches!(result, Err(ScreenError::FileNotFound { .. })));
    }

    #[test]
    fn test_decode_garbage_bytes() {
        let result = decode_wav_bytes(b"this is not a wav file at all");
        match result {
            Err(ScreenError::DecodeError { .. }) => {}
            other => panic!("Expected DecodeError, got: {:?}", other),
        }
    }

    #[test]
    fn test_resample_linear_upsample() {
        let samples = vec![0.0, 1.0, 0.0];
        let resampled = resample_linear(&samples, 2.0);
        assert!(resampled.len() >= 5);
        // At index 1 (src pos 0.5), should interpolate to 0.5
        assert!((resampled[1] - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_resample_linear_downsample() {
        let samples = vec![0.0, 0.5, 1.0, 0.5, 0.0, -0.5, -1.0, -0.5];
        let resampled = resample_linear(&samples, 0.5);
        assert_eq!(resampled.len(), 4);
    }

    #[test]
    fn test_resample_empty() {
        assert!(resample_linear(&[], 2.0).is_empty());
    }
}
