//! Multichannel WAV file reading and writing.
//!
//! Signals are channel-major (`Vec` per channel), the layout the matrix
//! processes. Integer PCM is scaled to and from `[-1.0, 1.0)`; 32-bit files
//! are written as IEEE float.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavWriter};

use crate::{Error, Result};

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (e.g., 16, 24, 32).
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 32,
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
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Reads a WAV file into one sample vector per channel.
///
/// # Example
/// ```ignore
/// let (channels, spec) = read_wav_channels("input.wav")?;
/// println!("{} channels at {} Hz", channels.len(), spec.sample_rate);
/// ```
pub fn read_wav_channels<P: AsRef<Path>>(path: P) -> Result<(Vec<Vec<f32>>, WavSpec)> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    let n_channels = usize::from(spec.channels).max(1);

    let interleaved: Vec<f32> = match reader.spec().sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let frames = interleaved.len() / n_channels;
    let mut channels = vec![Vec::with_capacity(frames); n_channels];
    for frame in interleaved.chunks_exact(n_channels) {
        for (channel, &sample) in channels.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }

    Ok((channels, spec))
}

/// Writes one sample vector per channel to a WAV file.
///
/// The channel count of `spec` is replaced by `channels.len()`. Shorter
/// channels are padded with silence to the length of the longest.
///
/// # Example
/// ```ignore
/// let outputs = vec![vec![0.0f32; 48000]; 4]; // 1 second, 4 channels
/// write_wav_channels("output.wav", &outputs, WavSpec::default())?;
/// ```
pub fn write_wav_channels<P: AsRef<Path>>(
    path: P,
    channels: &[Vec<f32>],
    spec: WavSpec,
) -> Result<()> {
    if channels.is_empty() {
        return Err(Error::NoChannels);
    }
    let spec = WavSpec {
        channels: u16::try_from(channels.len()).map_err(|_| Error::NoChannels)?,
        ..spec
    };
    let frames = channels.iter().map(Vec::len).max().unwrap_or(0);
    let sample = |channel: &Vec<f32>, frame: usize| channel.get(frame).copied().unwrap_or(0.0);

    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))?;
    if spec.bits_per_sample == 32 {
        for frame in 0..frames {
            for channel in channels {
                writer.write_sample(sample(channel, frame))?;
            }
        }
    } else {
        let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
        for frame in 0..frames {
            for channel in channels {
                let value = (sample(channel, frame) * max_val).clamp(-max_val, max_val - 1.0);
                writer.write_sample(value as i32)?;
            }
        }
    }

    writer.finalize()?;
    Ok(())
}
