//! cpal-based audio backend.
//!
//! [`CpalBackend`] wraps [cpal](https://crates.io/crates/cpal) for
//! cross-platform audio I/O: ALSA or JACK on Linux, CoreAudio on macOS,
//! WASAPI on Windows. Devices are selected by case-insensitive substring
//! match on their name, or the host default when no name is given.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Host};

use crate::backend::{
    AudioBackend, AudioDevice, BackendStreamConfig, ErrorCallback, InputCallback, OutputCallback,
    StreamHandle,
};
use crate::{Error, Result};

/// Extract device name via `description()` (cpal 0.17+).
fn device_name(device: &Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

fn max_input_channels(device: &Device) -> u16 {
    device
        .supported_input_configs()
        .map(|configs| configs.map(|c| c.channels()).max().unwrap_or(0))
        .unwrap_or(0)
}

fn max_output_channels(device: &Device) -> u16 {
    device
        .supported_output_configs()
        .map(|configs| configs.map(|c| c.channels()).max().unwrap_or(0))
        .unwrap_or(0)
}

fn describe(device: &Device, name: String) -> AudioDevice {
    let default_sample_rate = device
        .default_output_config()
        .or_else(|_| device.default_input_config())
        .map(|c| c.sample_rate())
        .unwrap_or(48000);
    AudioDevice {
        name,
        max_input_channels: max_input_channels(device),
        max_output_channels: max_output_channels(device),
        default_sample_rate,
    }
}

fn find_by_name(
    devices: impl Iterator<Item = Device>,
    search: &str,
    direction: &str,
) -> Result<Device> {
    let search_lower = search.to_lowercase();
    for device in devices {
        if let Ok(name) = device_name(&device)
            && name.to_lowercase().contains(&search_lower)
        {
            return Ok(device);
        }
    }
    Err(Error::DeviceNotFound(format!(
        "no {direction} device matching '{search}'"
    )))
}

/// cpal-based audio backend holding the platform's default host.
pub struct CpalBackend {
    host: Host,
}

impl CpalBackend {
    /// Create a backend on the platform's default audio host.
    pub fn new() -> Self {
        let host = cpal::default_host();
        tracing::info!(host = host.id().name(), "cpal backend initialized");
        Self { host }
    }

    fn find_output_device(&self, name: Option<&str>) -> Result<Device> {
        match name {
            Some(search) => {
                let devices = self
                    .host
                    .output_devices()
                    .map_err(|e| Error::Stream(e.to_string()))?;
                find_by_name(devices, search, "output")
            }
            None => self.host.default_output_device().ok_or(Error::NoDevice),
        }
    }

    fn find_input_device(&self, name: Option<&str>) -> Result<Device> {
        match name {
            Some(search) => {
                let devices = self
                    .host
                    .input_devices()
                    .map_err(|e| Error::Stream(e.to_string()))?;
                find_by_name(devices, search, "input")
            }
            None => self.host.default_input_device().ok_or(Error::NoDevice),
        }
    }
}

impl Default for CpalBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioBackend for CpalBackend {
    fn name(&self) -> &'static str {
        "cpal"
    }

    fn list_devices(&self) -> Result<Vec<AudioDevice>> {
        let mut devices: Vec<AudioDevice> = Vec::new();
        let all = self
            .host
            .devices()
            .map_err(|e| Error::Stream(e.to_string()))?;
        for device in all {
            if let Ok(name) = device_name(&device)
                && !devices.iter().any(|d| d.name == name)
            {
                devices.push(describe(&device, name));
            }
        }
        Ok(devices)
    }

    fn input_device(&self, name: Option<&str>) -> Result<AudioDevice> {
        let device = self.find_input_device(name)?;
        let name = device_name(&device).map_err(|e| Error::Stream(e.to_string()))?;
        Ok(describe(&device, name))
    }

    fn output_device(&self, name: Option<&str>) -> Result<AudioDevice> {
        let device = self.find_output_device(name)?;
        let name = device_name(&device).map_err(|e| Error::Stream(e.to_string()))?;
        Ok(describe(&device, name))
    }

    fn build_output_stream(
        &self,
        config: &BackendStreamConfig,
        mut callback: OutputCallback,
        mut error_callback: ErrorCallback,
    ) -> Result<StreamHandle> {
        let device = self.find_output_device(config.device_name.as_deref())?;

        let stream_config = cpal::StreamConfig {
            channels: config.channels,
            sample_rate: config.sample_rate,
            buffer_size: cpal::BufferSize::Fixed(config.buffer_size),
        };

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    callback(data);
                },
                move |err| {
                    error_callback(&err.to_string());
                },
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;

        stream.play().map_err(|e| Error::Stream(e.to_string()))?;
        tracing::info!(
            channels = config.channels,
            sample_rate = config.sample_rate,
            buffer_size = config.buffer_size,
            "output stream started"
        );

        Ok(StreamHandle::new(stream))
    }

    fn build_input_stream(
        &self,
        config: &BackendStreamConfig,
        mut callback: InputCallback,
        mut error_callback: ErrorCallback,
    ) -> Result<StreamHandle> {
        let device = self.find_input_device(config.device_name.as_deref())?;

        let stream_config = cpal::StreamConfig {
            channels: config.channels,
            sample_rate: config.sample_rate,
            buffer_size: cpal::BufferSize::Fixed(config.buffer_size),
        };

        let stream = device
            .build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    callback(data);
                },
                move |err| {
                    error_callback(&err.to_string());
                },
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;

        stream.play().map_err(|e| Error::Stream(e.to_string()))?;
        tracing::info!(
            channels = config.channels,
            sample_rate = config.sample_rate,
            buffer_size = config.buffer_size,
            "input stream started"
        );

        Ok(StreamHandle::new(stream))
    }
}
