//! Audio decoding and clip handling.
//!
//! Everything downstream of this module operates on mono 22.05kHz float
//! samples; `io` is the only place that knows about WAV containers, bit
//! depths, or channel layouts.

pub mod clip;
pub mod io;

pub use clip::AudioClip;
pub use io::{decode_wav_bytes, load_clip, write_wav};
