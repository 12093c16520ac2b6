//! The routing matrix: all tracks plus the host ↔ track routing.
//!
//! One [`AudioMatrix::process`] call transforms one host block:
//!
//! 1. clear the valid frames of every track buffer and sum the routed host
//!    inputs into them,
//! 2. run every track's module chain,
//! 3. zero the host outputs and sum the routed track channels into them.
//!
//! # Real-time contract
//!
//! `process` performs no allocation, no locking and no I/O, cannot fail, and
//! runs in time proportional to `nframes × (routes + modules)`. It must never
//! run concurrently with [`prepare`](AudioMatrix::prepare); see
//! [`SharedMatrix`](crate::SharedMatrix) for the enforced discipline.

use crate::error::MatrixError;
use crate::host::HostAudioConfig;
use crate::routing::RoutingMap;
use crate::track::{Track, TrackConfig, UnknownModulePolicy};

/// In-memory matrix configuration, already parsed and validated by the loader.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatrixConfig {
    /// Tracks in processing order.
    pub tracks: Vec<TrackConfig>,
    /// Handling of unrecognized module types.
    pub unknown_modules: UnknownModulePolicy,
}

impl MatrixConfig {
    /// Creates a configuration from tracks, rejecting unknown modules.
    pub fn new(tracks: Vec<TrackConfig>) -> Self {
        Self {
            tracks,
            unknown_modules: UnknownModulePolicy::Reject,
        }
    }

    /// Sets the unknown-module policy.
    pub fn with_unknown_modules(mut self, policy: UnknownModulePolicy) -> Self {
        self.unknown_modules = policy;
        self
    }
}

/// Outcome of one processing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStatus {
    /// The block went through the matrix.
    Processed,
    /// The matrix has never been prepared; outputs were silenced.
    Unprepared,
    /// A reconfiguration held the matrix; outputs were silenced and the
    /// block dropped.
    Contended,
}

/// Owns every track and routes host channels through them.
#[derive(Debug)]
pub struct AudioMatrix {
    tracks: Vec<Track>,
    routing: RoutingMap,
    host_config: Option<HostAudioConfig>,
}

impl AudioMatrix {
    /// Builds all tracks and resolves the routing map.
    ///
    /// The matrix must be [`prepare`](Self::prepare)d before it produces audio.
    pub fn new(config: &MatrixConfig) -> Result<Self, MatrixError> {
        let routing = RoutingMap::from_tracks(&config.tracks)?;
        let tracks = config
            .tracks
            .iter()
            .map(|track| Track::new(track, config.unknown_modules))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(
            tracks = tracks.len(),
            inputs = routing.n_inputs(),
            outputs = routing.n_outputs(),
            "audio matrix built"
        );

        Ok(Self {
            tracks,
            routing,
            host_config: None,
        })
    }

    /// Resizes every track buffer and prepares every module for new host settings.
    ///
    /// Must complete before the first `process` and after every block-size or
    /// sample-rate change. Leaves the matrix immediately processable with
    /// zeroed buffers.
    pub fn prepare(&mut self, config: HostAudioConfig) {
        tracing::debug!(
            block_size = config.block_size(),
            sample_rate = config.sample_rate(),
            "preparing audio matrix"
        );
        for track in &mut self.tracks {
            track.prepare(&config);
        }
        self.host_config = Some(config);
    }

    /// Processes one host block.
    ///
    /// `inputs[i]` is host input `i`, `outputs[j]` is host output `j`. Inputs
    /// the host does not supply read as silence; every supplied output is
    /// fully overwritten. `nframes` is clamped to the prepared block size.
    pub fn process<I, O>(
        &mut self,
        inputs: &[I],
        outputs: &mut [O],
        nframes: usize,
    ) -> BlockStatus
    where
        I: AsRef<[f32]>,
        O: AsMut<[f32]>,
    {
        let Some(host) = self.host_config else {
            silence(outputs);
            return BlockStatus::Unprepared;
        };
        let frames = nframes.min(host.block_size());

        for track in &mut self.tracks {
            track.buffer_mut().clear_frames(frames);
        }
        for connection in self.routing.inputs() {
            let Some(source) = inputs.get(connection.host) else {
                continue;
            };
            let Some(destination) = self
                .tracks
                .get_mut(connection.track)
                .and_then(|track| track.buffer_mut().channel_mut(connection.channel))
            else {
                continue;
            };
            for (dst, src) in destination[..frames].iter_mut().zip(source.as_ref()) {
                *dst += *src;
            }
        }

        for track in &mut self.tracks {
            track.process(frames);
        }

        silence(outputs);
        for connection in self.routing.outputs() {
            let Some(source) = self
                .tracks
                .get(connection.track)
                .and_then(|track| track.buffer().channel(connection.channel))
            else {
                continue;
            };
            let Some(destination) = outputs.get_mut(connection.host) else {
                continue;
            };
            for (dst, src) in destination.as_mut().iter_mut().zip(&source[..frames]) {
                *dst += *src;
            }
        }

        BlockStatus::Processed
    }

    /// Number of host input channels the backend must provide.
    #[inline]
    pub fn n_input_channels(&self) -> usize {
        self.routing.n_inputs()
    }

    /// Number of host output channels the backend must provide.
    #[inline]
    pub fn n_output_channels(&self) -> usize {
        self.routing.n_outputs()
    }

    /// Name of host output port `index`.
    pub fn output_port_name(&self, index: usize) -> Option<&str> {
        self.routing.output_port_name(index)
    }

    /// Resolved routing map.
    pub fn routing(&self) -> &RoutingMap {
        &self.routing
    }

    /// Tracks in processing order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Track at `index`, mutably.
    pub fn track_mut(&mut self, index: usize) -> Option<&mut Track> {
        self.tracks.get_mut(index)
    }

    /// Host settings of the last `prepare`, if any.
    pub fn host_config(&self) -> Option<HostAudioConfig> {
        self.host_config
    }
}

/// Zeroes every supplied output buffer.
#[inline]
pub(crate) fn silence<O: AsMut<[f32]>>(outputs: &mut [O]) {
    for output in outputs.iter_mut() {
        output.as_mut().fill(0.0);
    }
}
