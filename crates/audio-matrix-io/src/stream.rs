//! Real-time streaming of a [`MatrixClient`] through an [`AudioBackend`].
//!
//! ```text
//!  input device ──► InputForwarder ──► rtrb ring ──► OutputProcessor ──► output device
//!                   (interleaved)                    deinterleave
//!                                                    AudioMatrix::process per chunk
//!                                                    interleave
//! ```
//!
//! The output callback drives processing. Each device buffer is rendered
//! under one matrix lock and split into chunks no larger than the block size
//! the matrix is prepared for. Every chunk goes through the matrix with
//! pre-allocated scratch buffers, and nothing on this path allocates, blocks
//! or logs. When the input ring cannot supply a whole chunk the chunk is
//! processed with silent inputs.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use audio_matrix_core::{AudioMatrix, SharedMatrix};
use rtrb::{Consumer, Producer, RingBuffer};

use crate::backend::{AudioBackend, BackendStreamConfig, ErrorCallback, StreamHandle};
use crate::client::MatrixClient;
use crate::monitor::BlockSizeMonitor;
use crate::ports::PortDirection;
use crate::{Error, Result};

/// Largest chunk the output callback processes at once, in frames.
const MAX_CHUNK_FRAMES: usize = 4096;

/// Device buffers the input ring can hold before input is dropped.
const RING_BLOCKS: usize = 8;

/// Device and buffer selection for [`MatrixStream::start`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamOptions {
    /// Input device name filter (system default if `None`).
    pub input_device: Option<String>,
    /// Output device name filter (system default if `None`).
    pub output_device: Option<String>,
}

/// Notification from the audio backend to the control loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A stream failed; the backend stopped calling the matrix.
    Error(String),
}

/// A running pair of streams feeding a matrix client.
///
/// Dropping it stops both streams.
#[derive(Debug)]
pub struct MatrixStream {
    _input: Option<StreamHandle>,
    _output: StreamHandle,
    events: Receiver<StreamEvent>,
    underruns: Arc<AtomicU64>,
}

impl MatrixStream {
    /// Opens the input stream (when the matrix has inputs) and the output
    /// stream, with exactly as many channels as the client has ports, at the
    /// client's current host settings.
    ///
    /// # Errors
    ///
    /// [`Error::NoOutputs`] for a matrix without output ports,
    /// [`Error::InsufficientChannels`] when a device has fewer channels than
    /// the matrix has ports, and any device or stream error of the backend.
    pub fn start(
        backend: &dyn AudioBackend,
        client: &MatrixClient,
        options: &StreamOptions,
    ) -> Result<Self> {
        let n_inputs = client.ports().n_inputs();
        let n_outputs = client.ports().n_outputs();
        if n_outputs == 0 {
            return Err(Error::NoOutputs);
        }

        let output_device = backend.output_device(options.output_device.as_deref())?;
        check_channels(
            &output_device.name,
            PortDirection::Output,
            n_outputs,
            output_device.max_output_channels,
        )?;

        let host = client.host_config();
        let block_size = host.block_size();
        let (events_tx, events) = mpsc::channel();
        let underruns = Arc::new(AtomicU64::new(0));

        let (producer, consumer) = if n_inputs > 0 {
            let input_device = backend.input_device(options.input_device.as_deref())?;
            check_channels(
                &input_device.name,
                PortDirection::Input,
                n_inputs,
                input_device.max_input_channels,
            )?;
            let capacity = n_inputs * block_size.max(MAX_CHUNK_FRAMES) * RING_BLOCKS;
            let (producer, consumer) = RingBuffer::new(capacity);
            (Some(producer), Some(consumer))
        } else {
            (None, None)
        };

        let mut processor = OutputProcessor::new(
            client.shared(),
            client.monitor(),
            consumer,
            n_inputs,
            n_outputs,
            Arc::clone(&underruns),
        );
        let output = backend.build_output_stream(
            &BackendStreamConfig {
                sample_rate: host.sample_rate(),
                buffer_size: block_size as u32,
                channels: n_outputs as u16,
                device_name: options.output_device.clone(),
            },
            Box::new(move |data: &mut [f32]| processor.render(data)),
            error_callback(events_tx.clone(), "output"),
        )?;

        let input = match producer {
            Some(producer) => {
                let mut forwarder = InputForwarder::new(producer);
                Some(backend.build_input_stream(
                    &BackendStreamConfig {
                        sample_rate: host.sample_rate(),
                        buffer_size: block_size as u32,
                        channels: n_inputs as u16,
                        device_name: options.input_device.clone(),
                    },
                    Box::new(move |data: &[f32]| forwarder.push(data)),
                    error_callback(events_tx, "input"),
                )?)
            }
            None => None,
        };

        tracing::info!(
            client = client.name(),
            inputs = n_inputs,
            outputs = n_outputs,
            block_size,
            sample_rate = host.sample_rate(),
            "matrix streaming"
        );

        Ok(Self {
            _input: input,
            _output: output,
            events,
            underruns,
        })
    }

    /// Waits up to `timeout` for a backend notification.
    pub fn next_event(&self, timeout: Duration) -> Option<StreamEvent> {
        match self.events.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Chunks processed with silent inputs because the input ring ran dry.
    pub fn underruns(&self) -> u64 {
        self.underruns.load(Ordering::Relaxed)
    }
}

fn check_channels(
    device: &str,
    direction: PortDirection,
    requested: usize,
    available: u16,
) -> Result<()> {
    if requested > usize::from(available) {
        return Err(Error::InsufficientChannels {
            device: device.to_string(),
            direction,
            requested,
            available: usize::from(available),
        });
    }
    Ok(())
}

fn error_callback(events: Sender<StreamEvent>, side: &'static str) -> ErrorCallback {
    Box::new(move |message: &str| {
        tracing::error!(side, error = message, "audio stream error");
        let _ = events.send(StreamEvent::Error(format!("{side} stream: {message}")));
    })
}

/// Input side: copies captured interleaved samples into the ring.
pub(crate) struct InputForwarder {
    producer: Producer<f32>,
}

impl InputForwarder {
    pub(crate) fn new(producer: Producer<f32>) -> Self {
        Self { producer }
    }

    /// Pushes as many samples as fit; the rest of the buffer is dropped.
    pub(crate) fn push(&mut self, data: &[f32]) {
        for &sample in data {
            if self.producer.push(sample).is_err() {
                break;
            }
        }
    }
}

/// Output side: pulls input from the ring, runs the matrix, fills the device buffer.
pub(crate) struct OutputProcessor {
    matrix: SharedMatrix,
    monitor: Arc<BlockSizeMonitor>,
    scratch: Scratch,
}

/// Pre-allocated per-chunk buffers and the input ring.
struct Scratch {
    input: Option<Consumer<f32>>,
    n_inputs: usize,
    n_outputs: usize,
    inputs: Vec<Vec<f32>>,
    outputs: Vec<Vec<f32>>,
    underruns: Arc<AtomicU64>,
}

impl OutputProcessor {
    pub(crate) fn new(
        matrix: SharedMatrix,
        monitor: Arc<BlockSizeMonitor>,
        input: Option<Consumer<f32>>,
        n_inputs: usize,
        n_outputs: usize,
        underruns: Arc<AtomicU64>,
    ) -> Self {
        Self {
            matrix,
            monitor,
            scratch: Scratch {
                input,
                n_inputs,
                n_outputs,
                inputs: vec![vec![0.0; MAX_CHUNK_FRAMES]; n_inputs],
                outputs: vec![vec![0.0; MAX_CHUNK_FRAMES]; n_outputs],
                underruns,
            },
        }
    }

    /// Fills one interleaved device buffer.
    ///
    /// The whole buffer is rendered under one lock, in chunks of the block
    /// size the matrix is prepared for at that moment. If a reconfiguration
    /// holds the matrix the buffer is silent and its input is discarded.
    pub(crate) fn render(&mut self, data: &mut [f32]) {
        let total_frames = data.len() / self.scratch.n_outputs.max(1);
        self.monitor.observe(total_frames);

        let scratch = &mut self.scratch;
        let rendered = self
            .matrix
            .try_process_with(|matrix| scratch.render(matrix, data, total_frames));
        if rendered.is_none() {
            data.fill(0.0);
            self.scratch.discard_inputs(total_frames);
        }
    }
}

impl Scratch {
    fn render(&mut self, matrix: &mut AudioMatrix, data: &mut [f32], total_frames: usize) {
        let chunk_frames = matrix
            .host_config()
            .map_or(MAX_CHUNK_FRAMES, |host| host.block_size())
            .clamp(1, MAX_CHUNK_FRAMES);

        let mut frames_written = 0;
        while frames_written < total_frames {
            let frames = (total_frames - frames_written).min(chunk_frames);
            self.read_inputs(frames);

            matrix.process(&self.inputs, &mut self.outputs, frames);

            let offset = frames_written * self.n_outputs;
            let out = &mut data[offset..offset + frames * self.n_outputs];
            for (frame, samples) in out.chunks_exact_mut(self.n_outputs).enumerate() {
                for (sample, channel) in samples.iter_mut().zip(&self.outputs) {
                    *sample = channel[frame];
                }
            }
            frames_written += frames;
        }

        // Trailing samples of a buffer that is not a whole number of frames.
        data[total_frames * self.n_outputs..].fill(0.0);
    }

    /// Deinterleaves `frames` frames from the ring into the input scratch.
    fn read_inputs(&mut self, frames: usize) {
        let Some(consumer) = self.input.as_mut() else {
            return;
        };
        let needed = frames * self.n_inputs;
        match consumer.read_chunk(needed) {
            Ok(chunk) => {
                let (first, second) = chunk.as_slices();
                for (index, &sample) in first.iter().chain(second).enumerate() {
                    self.inputs[index % self.n_inputs][index / self.n_inputs] = sample;
                }
                chunk.commit_all();
            }
            Err(_) => {
                for channel in &mut self.inputs {
                    channel[..frames].fill(0.0);
                }
                self.underruns.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Drops up to `frames` frames of captured input so latency does not build up.
    fn discard_inputs(&mut self, frames: usize) {
        let Some(consumer) = self.input.as_mut() else {
            return;
        };
        let available = consumer.slots().min(frames * self.n_inputs);
        if let Ok(chunk) = consumer.read_chunk(available) {
            chunk.commit_all();
        }
    }
}
