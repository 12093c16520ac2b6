//! Tracks: ordered module chains over one owned buffer.
//!
//! A [`Track`] runs its modules in declaration order over its own buffer, so
//! the output of module N is the input of module N+1. Tracks never share
//! buffers; signal flow between tracks only happens in the
//! [`AudioMatrix`](crate::AudioMatrix) routing step around them.

use crate::buffer::AudioBuffer;
use crate::error::MatrixError;
use crate::host::HostAudioConfig;
use crate::module::{Module, ModuleConfig, ModuleType, create_module};
use crate::routing::{InputRoute, OutputRoute};

/// What to do with a module entry whose type tag is not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownModulePolicy {
    /// Fail construction with [`MatrixError::Module`].
    #[default]
    Reject,
    /// Log a warning and leave the entry out of the chain.
    Skip,
}

/// Configuration of one track.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackConfig {
    /// Track name, used in diagnostics.
    pub name: String,
    /// Number of channels of the track buffer.
    pub channels: usize,
    /// Module chain in processing order.
    pub modules: Vec<ModuleConfig>,
    /// Host inputs feeding this track.
    pub inputs: Vec<InputRoute>,
    /// Host outputs fed by this track.
    pub outputs: Vec<OutputRoute>,
}

impl TrackConfig {
    /// Creates a track configuration without modules or routes.
    pub fn new(name: impl Into<String>, channels: usize) -> Self {
        Self {
            name: name.into(),
            channels,
            ..Self::default()
        }
    }

    /// Appends a module to the chain.
    pub fn with_module(mut self, module: ModuleConfig) -> Self {
        self.modules.push(module);
        self
    }

    /// Routes host input `host_input` into track channel `channel`.
    pub fn with_input(mut self, host_input: usize, channel: usize) -> Self {
        self.inputs.push(InputRoute {
            host_input,
            channel,
        });
        self
    }

    /// Routes track channel `channel` to the output port named `port`.
    pub fn with_output(mut self, channel: usize, port: impl Into<String>) -> Self {
        self.outputs.push(OutputRoute {
            channel,
            port: port.into(),
        });
        self
    }
}

/// Independent processing lane: a module chain and the buffer it runs on.
pub struct Track {
    name: String,
    channels: usize,
    modules: Vec<Box<dyn Module>>,
    buffer: AudioBuffer,
    host_config: Option<HostAudioConfig>,
}

impl Track {
    /// Builds a track and its module chain, preserving declaration order.
    ///
    /// The buffer stays empty until the first [`prepare`](Self::prepare).
    ///
    /// # Errors
    ///
    /// [`MatrixError::NoChannels`] for a zero-channel track, and
    /// [`MatrixError::Module`] when a module cannot be created. Unrecognized
    /// type tags are only an error under [`UnknownModulePolicy::Reject`].
    pub fn new(config: &TrackConfig, policy: UnknownModulePolicy) -> Result<Self, MatrixError> {
        if config.channels == 0 {
            return Err(MatrixError::NoChannels {
                track: config.name.clone(),
            });
        }

        let mut modules = Vec::with_capacity(config.modules.len());
        for module_config in &config.modules {
            if module_config.kind().is_none() && policy == UnknownModulePolicy::Skip {
                tracing::warn!(
                    track = %config.name,
                    module_type = %module_config.module_type,
                    "skipping unrecognized module"
                );
                continue;
            }
            let module = create_module(module_config).map_err(|source| MatrixError::Module {
                track: config.name.clone(),
                source,
            })?;
            modules.push(module);
        }

        tracing::debug!(
            track = %config.name,
            channels = config.channels,
            modules = modules.len(),
            "track built"
        );

        Ok(Self {
            name: config.name.clone(),
            channels: config.channels,
            modules,
            buffer: AudioBuffer::new(config.channels, 0),
            host_config: None,
        })
    }

    /// Appends an already-constructed module to the end of the chain.
    ///
    /// The module is prepared immediately if the track already is.
    pub fn push_module(&mut self, mut module: Box<dyn Module>) {
        if let Some(config) = &self.host_config {
            module.prepare(config);
        }
        self.modules.push(module);
    }

    /// Reallocates the buffer for the new host settings, then prepares every module in order.
    ///
    /// The new buffer is zeroed. Never call concurrently with [`process`](Self::process).
    pub fn prepare(&mut self, config: &HostAudioConfig) {
        self.buffer = AudioBuffer::new(self.channels, config.block_size());
        for module in &mut self.modules {
            module.prepare(config);
        }
        self.host_config = Some(*config);
    }

    /// Runs the module chain over the first `nframes` frames of the buffer.
    ///
    /// `nframes` is clamped to the prepared block size; an unprepared track
    /// processes nothing.
    pub fn process(&mut self, nframes: usize) {
        let mut block = self.buffer.block_mut(nframes);
        for module in &mut self.modules {
            module.process(&mut block);
        }
    }

    /// Live track buffer.
    pub fn buffer(&self) -> &AudioBuffer {
        &self.buffer
    }

    /// Live track buffer, mutably (used by the matrix routing step).
    pub fn buffer_mut(&mut self) -> &mut AudioBuffer {
        &mut self.buffer
    }

    /// Track name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of modules in the chain.
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Types of the modules in processing order.
    pub fn module_types(&self) -> impl Iterator<Item = ModuleType> + '_ {
        self.modules.iter().map(|m| m.module_type())
    }

    /// Host settings of the last `prepare`, if any.
    pub fn host_config(&self) -> Option<HostAudioConfig> {
        self.host_config
    }
}

impl std::fmt::Debug for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Track")
            .field("name", &self.name)
            .field("channels", &self.channels)
            .field("modules", &self.module_types().collect::<Vec<_>>())
            .field("block_size", &self.buffer.block_size())
            .finish()
    }
}
