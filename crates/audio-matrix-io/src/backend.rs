//! Pluggable audio backend abstraction.
//!
//! [`AudioBackend`] decouples the matrix stream wiring from any specific
//! platform audio API. [`CpalBackend`](crate::CpalBackend) is the default
//! implementation; tests drive [`MatrixStream`](crate::MatrixStream) through a
//! mock backend that invokes the callbacks by hand.
//!
//! The trait uses boxed closures for callbacks rather than generic parameters,
//! so it stays object-safe and a backend can be chosen at runtime. Stream
//! handles are type-erased and stop their stream on drop.

use crate::Result;

/// Configuration for building an audio stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendStreamConfig {
    /// Requested sample rate in Hz.
    pub sample_rate: u32,
    /// Preferred buffer size in frames.
    pub buffer_size: u32,
    /// Number of interleaved channels.
    pub channels: u16,
    /// Device name filter (system default if `None`).
    pub device_name: Option<String>,
}

impl Default for BackendStreamConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            buffer_size: 256,
            channels: 2,
            device_name: None,
        }
    }
}

/// Audio device information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDevice {
    /// Human-readable device name.
    pub name: String,
    /// Largest supported input channel count (0 if the device has no input).
    pub max_input_channels: u16,
    /// Largest supported output channel count (0 if the device has no output).
    pub max_output_channels: u16,
    /// Default sample rate in Hz.
    pub default_sample_rate: u32,
}

impl AudioDevice {
    /// Whether the device can capture audio.
    pub fn is_input(&self) -> bool {
        self.max_input_channels > 0
    }

    /// Whether the device can play audio.
    pub fn is_output(&self) -> bool {
        self.max_output_channels > 0
    }
}

/// Type-erased audio stream handle.
///
/// The stream is active while this handle exists; dropping it stops
/// playback or capture.
pub struct StreamHandle {
    _inner: Box<dyn Send>,
}

impl StreamHandle {
    /// Wraps a backend-specific stream object, keeping it alive until drop.
    pub fn new<T: Send + 'static>(stream: T) -> Self {
        Self {
            _inner: Box::new(stream),
        }
    }
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle").finish_non_exhaustive()
    }
}

/// Audio output callback.
///
/// Runs on the audio thread with a buffer of interleaved samples
/// (`frames * channels` long) that it must fill. Must not allocate, lock or
/// perform I/O.
pub type OutputCallback = Box<dyn FnMut(&mut [f32]) + Send>;

/// Audio input callback.
///
/// Runs on the audio thread with captured interleaved samples.
pub type InputCallback = Box<dyn FnMut(&[f32]) + Send>;

/// Error callback, called with a human-readable message when a stream fails.
pub type ErrorCallback = Box<dyn FnMut(&str) + Send>;

/// Pluggable audio backend.
pub trait AudioBackend: Send {
    /// Human-readable name of this backend (e.g. "cpal", "mock").
    fn name(&self) -> &str;

    /// Lists all available audio devices.
    fn list_devices(&self) -> Result<Vec<AudioDevice>>;

    /// Describes the input device matching `name`, or the default one.
    fn input_device(&self, name: Option<&str>) -> Result<AudioDevice>;

    /// Describes the output device matching `name`, or the default one.
    fn output_device(&self, name: Option<&str>) -> Result<AudioDevice>;

    /// Builds and starts an output stream.
    fn build_output_stream(
        &self,
        config: &BackendStreamConfig,
        callback: OutputCallback,
        error_callback: ErrorCallback,
    ) -> Result<StreamHandle>;

    /// Builds and starts an input stream.
    fn build_input_stream(
        &self,
        config: &BackendStreamConfig,
        callback: InputCallback,
        error_callback: ErrorCallback,
    ) -> Result<StreamHandle>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = BackendStreamConfig::default();
        assert_eq!(config.sample_rate, 48000);
        assert_eq!(config.buffer_size, 256);
        assert_eq!(config.channels, 2);
        assert!(config.device_name.is_none());
    }

    #[test]
    fn device_capabilities() {
        let device = AudioDevice {
            name: "interface".to_string(),
            max_input_channels: 0,
            max_output_channels: 8,
            default_sample_rate: 48000,
        };
        assert!(!device.is_input());
        assert!(device.is_output());
    }

    #[test]
    fn stream_handle_debug() {
        let handle = StreamHandle::new(42u32);
        assert!(format!("{handle:?}").contains("StreamHandle"));
    }
}
