//! Host backend for the audio matrix.
//!
//! This crate connects an [`AudioMatrix`](audio_matrix_core::AudioMatrix) to
//! the outside world:
//!
//! - **Ports**: [`PortLayout`] derives the host port names from the matrix
//! - **Client**: [`MatrixClient`] ties processing and host reconfiguration together
//! - **Real-time streaming**: [`MatrixStream`] drives a client from an
//!   [`AudioBackend`]; [`CpalBackend`] is the default backend
//! - **Offline rendering**: [`render`] runs a multichannel signal through a client
//! - **WAV file I/O**: [`read_wav_channels`] and [`write_wav_channels`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use audio_matrix_core::HostAudioConfig;
//! use audio_matrix_io::{MatrixClient, read_wav_channels, render, write_wav_channels};
//!
//! let (inputs, spec) = read_wav_channels("input.wav")?;
//! let host = HostAudioConfig::new(256, spec.sample_rate)?;
//! let client = MatrixClient::new("render", &matrix_config, host)?;
//!
//! let outputs = render(&client, &inputs)?;
//! write_wav_channels("output.wav", &outputs, spec)?;
//! ```

pub mod backend;
pub mod cpal_backend;
mod client;
mod monitor;
mod offline;
mod ports;
mod stream;
mod wav;

pub use backend::{AudioBackend, AudioDevice, BackendStreamConfig, StreamHandle};
pub use client::MatrixClient;
pub use cpal_backend::CpalBackend;
pub use monitor::BlockSizeMonitor;
pub use offline::render;
pub use ports::{MAX_PORTS, PortDirection, PortLayout, input_port_name};
pub use stream::{MatrixStream, StreamEvent, StreamOptions};
pub use wav::{WavSpec, read_wav_channels, write_wav_channels};

use audio_matrix_core::MatrixError;

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Audio stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// No audio device available on the system.
    #[error("No audio device available")]
    NoDevice,

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// The matrix needs more ports than the host can register.
    #[error("no more ports available: {requested} {direction} ports requested, at most {max}")]
    TooManyPorts {
        /// Input or output side.
        direction: PortDirection,
        /// Ports the matrix needs.
        requested: usize,
        /// Ports the host provides.
        max: usize,
    },

    /// The device cannot open as many channels as the matrix has ports.
    #[error("device '{device}' supports {available} {direction} channels, matrix needs {requested}")]
    InsufficientChannels {
        /// Device name.
        device: String,
        /// Input or output side.
        direction: PortDirection,
        /// Channels the matrix needs.
        requested: usize,
        /// Channels the device supports.
        available: usize,
    },

    /// The matrix routes nothing to any output port.
    #[error("matrix has no output ports to stream")]
    NoOutputs,

    /// A signal to write or render has no usable channels.
    #[error("signal has no channels (or more than a WAV file can hold)")]
    NoChannels,

    /// The matrix rejected its configuration or a host setting.
    #[error("Matrix error: {0}")]
    Matrix(#[from] MatrixError),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
