//! The [`Module`] trait and the module factory.
//!
//! A module is one in-place transformation in a track's chain. Every module
//! is exclusively owned by one [`Track`](crate::Track) and is reached only
//! through the track's ordered list; it holds no reference to its track or
//! its siblings.
//!
//! [`create_module`] is the single place where a configured type tag becomes
//! a concrete variant. Adding a module type means adding a [`ModuleType`]
//! variant and one match arm there.

use std::collections::BTreeMap;

use crate::buffer::BlockMut;
use crate::error::ModuleError;
use crate::gain::Gain;
use crate::host::HostAudioConfig;

/// Per-channel-group audio processor inside a track.
///
/// # Real-time contract
///
/// [`process`](Module::process) runs on the audio thread: no allocation, no
/// locking, no I/O. It must only touch the samples of the block it is given.
/// `block.frames()` may be smaller than the block size of the last
/// [`prepare`](Module::prepare) call (short final blocks).
///
/// # Example
///
/// ```rust
/// use audio_matrix_core::{BlockMut, HostAudioConfig, Module, ModuleType};
///
/// struct Invert;
///
/// impl Module for Invert {
///     fn module_type(&self) -> ModuleType {
///         ModuleType::Custom
///     }
///
///     fn prepare(&mut self, _config: &HostAudioConfig) {}
///
///     fn process(&mut self, block: &mut BlockMut<'_>) {
///         for sample in block.samples_mut() {
///             *sample = -*sample;
///         }
///     }
/// }
/// ```
pub trait Module: Send {
    /// Kind of this module, for reporting only.
    ///
    /// Modules built outside [`create_module`] return [`ModuleType::Custom`].
    fn module_type(&self) -> ModuleType;

    /// Allocates or resizes internal state for the given host settings.
    ///
    /// Called from the control thread, never concurrently with `process`.
    /// Must be idempotent and safe to call repeatedly with different settings.
    fn prepare(&mut self, config: &HostAudioConfig);

    /// Transforms the block in place.
    fn process(&mut self, block: &mut BlockMut<'_>);
}

/// Module kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleType {
    /// Scalar gain.
    Gain,
    /// Module pushed onto a track directly, not buildable from configuration.
    Custom,
}

impl ModuleType {
    /// All module types that configuration documents can name.
    pub const ALL: &'static [ModuleType] = &[ModuleType::Gain];

    /// Looks up a type tag (case-insensitive).
    ///
    /// Never returns [`ModuleType::Custom`].
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "gain" => Some(Self::Gain),
            _ => None,
        }
    }

    /// Canonical tag used in configuration documents.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Gain => "gain",
            Self::Custom => "custom",
        }
    }
}

impl std::fmt::Display for ModuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Validated, in-memory description of one module.
///
/// The type tag is kept as written so that an unrecognized tag can be
/// reported (or skipped) by the track that owns the entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModuleConfig {
    /// Type tag, e.g. `"gain"`.
    pub module_type: String,
    /// Numeric parameters by name.
    pub params: BTreeMap<String, f32>,
}

impl ModuleConfig {
    /// Creates a configuration with no parameters.
    pub fn new(module_type: impl Into<String>) -> Self {
        Self {
            module_type: module_type.into(),
            params: BTreeMap::new(),
        }
    }

    /// Shorthand for a gain module with a linear factor.
    pub fn gain(factor: f32) -> Self {
        Self::new(ModuleType::Gain.tag()).with_param(Gain::PARAM_GAIN, factor)
    }

    /// Adds a parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: f32) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    /// Resolved type, or `None` for an unrecognized tag.
    pub fn kind(&self) -> Option<ModuleType> {
        ModuleType::from_tag(&self.module_type)
    }

    /// Reads a parameter.
    pub fn param(&self, name: &str) -> Option<f32> {
        self.params.get(name).copied()
    }
}

/// Creates the module variant described by `config`.
///
/// # Errors
///
/// [`ModuleError::UnknownType`] for an unrecognized tag, or
/// [`ModuleError::InvalidParameter`] when the variant rejects a parameter.
pub fn create_module(config: &ModuleConfig) -> Result<Box<dyn Module>, ModuleError> {
    match config.kind() {
        Some(ModuleType::Gain) => Ok(Box::new(Gain::from_config(config)?)),
        Some(ModuleType::Custom) | None => {
            Err(ModuleError::UnknownType(config.module_type.clone()))
        }
    }
}
