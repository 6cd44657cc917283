//! WAV file reading and writing.
//!
//! Samples are exchanged as full-scale 32-bit integers: an N-bit PCM value
//! is shifted left by `32 - N` on read and right by the same amount on
//! write, and float files are scaled by 2^31 and saturated.

use crate::{Error, Result};
use cascade_core::{Sample, to_sample};
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Format of the file.
    pub spec: WavSpec,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Whether the file stores float samples.
    pub is_float: bool,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let hound_spec = reader.spec();
    let num_frames = u64::from(reader.duration());
    let duration_secs = num_frames as f64 / f64::from(hound_spec.sample_rate);

    Ok(WavInfo {
        spec: WavSpec::from(hound_spec),
        num_frames,
        duration_secs,
        is_float: hound_spec.sample_format == SampleFormat::Float,
    })
}

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of interleaved channels.
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (8, 16, 24 or 32).
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 16,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: SampleFormat::Int,
        }
    }
}

const FULL_SCALE: f64 = 2_147_483_648.0;

/// Read a WAV file as interleaved full-scale samples.
///
/// # Example
/// ```ignore
/// let (samples, spec) = read_wav("input.wav")?;
/// println!("{} frames at {} Hz", samples.len() / spec.channels as usize, spec.sample_rate);
/// ```
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<Sample>, WavSpec)> {
    let reader = WavReader::open(path)?;
    let hound_spec = reader.spec();
    let spec = WavSpec::from(hound_spec);

    let samples = match hound_spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(|v| to_sample(f64::from(v) * FULL_SCALE)))
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let shift = 32 - u32::from(spec.bits_per_sample.min(32));
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v << shift))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    tracing::debug!(
        channels = spec.channels,
        sample_rate = spec.sample_rate,
        bits = spec.bits_per_sample,
        samples = samples.len(),
        "read WAV"
    );
    Ok((samples, spec))
}

/// Write interleaved full-scale samples as integer PCM.
///
/// Samples are truncated to `spec.bits_per_sample` by an arithmetic shift.
///
/// # Example
/// ```ignore
/// let samples = vec![0; 2 * 48000]; // 1 second of stereo silence
/// let spec = WavSpec { channels: 2, sample_rate: 48000, bits_per_sample: 24 };
/// write_wav("output.wav", &samples, spec)?;
/// ```
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[Sample], spec: WavSpec) -> Result<()> {
    let channels = usize::from(spec.channels);
    if channels == 0 || samples.len() % channels != 0 {
        return Err(Error::ChannelMismatch {
            samples: samples.len(),
            channels,
        });
    }
    if !matches!(spec.bits_per_sample, 8 | 16 | 24 | 32) {
        return Err(Error::InvalidRequest(format!(
            "unsupported bit depth {}",
            spec.bits_per_sample
        )));
    }

    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))?;
    let shift = 32 - u32::from(spec.bits_per_sample);
    for &sample in samples {
        writer.write_sample(sample >> shift)?;
    }
    writer.finalize()?;
    Ok(())
}
