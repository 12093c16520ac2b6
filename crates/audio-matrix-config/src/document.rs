//! Matrix document file format and conversion into the core configuration.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use audio_matrix_core::{
    InputRoute, MatrixConfig, ModuleConfig, ModuleType, OutputRoute, TrackConfig,
    UnknownModulePolicy,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::param::ParamValue;
use crate::validation::{ValidationError, ValidationResult, validate_document};

/// What the loader does with module types it does not recognize.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OnUnknownModule {
    /// Report the entry as a configuration error.
    #[default]
    Reject,
    /// Warn and leave the entry out of the chain.
    Skip,
}

impl From<OnUnknownModule> for UnknownModulePolicy {
    fn from(mode: OnUnknownModule) -> Self {
        match mode {
            OnUnknownModule::Reject => UnknownModulePolicy::Reject,
            OnUnknownModule::Skip => UnknownModulePolicy::Skip,
        }
    }
}

/// Audio matrix configuration document.
///
/// # TOML Format
///
/// ```toml
/// name = "studio"
/// on_unknown_module = "reject"
///
/// [[tracks]]
/// name = "voice"
/// channels = 2
/// inputs = [{ host = 0, channel = 0 }, { host = 1, channel = 1 }]
/// outputs = [{ channel = 0, port = "main_left" }, { channel = 1, port = "main_right" }]
///
/// [[tracks.modules]]
/// type = "gain"
/// params = { gain = "-6dB" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MatrixDocument {
    /// Optional document name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Handling of unrecognized module types.
    #[serde(default)]
    pub on_unknown_module: OnUnknownModule,

    /// Tracks in processing order.
    #[serde(default)]
    pub tracks: Vec<TrackDocument>,
}

/// One `[[tracks]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackDocument {
    /// Track name.
    pub name: String,

    /// Number of channels of the track buffer.
    pub channels: usize,

    /// Host input → track channel routes.
    #[serde(default)]
    pub inputs: Vec<InputDocument>,

    /// Track channel → output port routes.
    #[serde(default)]
    pub outputs: Vec<OutputDocument>,

    /// Module chain in processing order.
    #[serde(default)]
    pub modules: Vec<ModuleDocument>,
}

/// `{ host, channel }` input route.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct InputDocument {
    /// Host input index.
    pub host: usize,
    /// Track channel.
    pub channel: usize,
}

/// `{ channel, port }` output route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputDocument {
    /// Track channel.
    pub channel: usize,
    /// Output port name.
    pub port: String,
}

/// One `[[tracks.modules]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModuleDocument {
    /// Module type tag, e.g. `"gain"`.
    #[serde(rename = "type")]
    pub module_type: String,

    /// Parameters by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, ParamValue>,
}

impl MatrixDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starter document: one stereo track with a unity gain, host inputs 0/1
    /// to `out_left`/`out_right`.
    pub fn stereo_passthrough() -> Self {
        let mut track = TrackDocument::new("main", 2)
            .with_input(0, 0)
            .with_input(1, 1)
            .with_output(0, "out_left")
            .with_output(1, "out_right");
        track
            .modules
            .push(ModuleDocument::new("gain").with_param("gain", "0dB"));
        Self {
            name: Some("stereo passthrough".to_string()),
            on_unknown_module: OnUnknownModule::Reject,
            tracks: vec![track],
        }
    }

    /// Sets the document name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the unknown-module handling.
    pub fn with_unknown_modules(mut self, mode: OnUnknownModule) -> Self {
        self.on_unknown_module = mode;
        self
    }

    /// Appends a track.
    pub fn with_track(mut self, track: TrackDocument) -> Self {
        self.tracks.push(track);
        self
    }

    /// Load a document from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a document from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Convert the document to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save the document to a TOML file, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Checks the document, reporting every problem.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_document(self)
    }

    /// Validates the document and converts it into a core [`MatrixConfig`].
    pub fn to_matrix_config(&self) -> Result<MatrixConfig, ConfigError> {
        self.validate()?;
        let tracks = self
            .tracks
            .iter()
            .map(TrackDocument::to_track_config)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MatrixConfig::new(tracks).with_unknown_modules(self.on_unknown_module.into()))
    }
}

impl FromStr for MatrixDocument {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_toml(s)
    }
}

impl TrackDocument {
    /// Creates a track entry without routes or modules.
    pub fn new(name: impl Into<String>, channels: usize) -> Self {
        Self {
            name: name.into(),
            channels,
            inputs: Vec::new(),
            outputs: Vec::new(),
            modules: Vec::new(),
        }
    }

    /// Adds a host input → channel route.
    pub fn with_input(mut self, host: usize, channel: usize) -> Self {
        self.inputs.push(InputDocument { host, channel });
        self
    }

    /// Adds a channel → output port route.
    pub fn with_output(mut self, channel: usize, port: impl Into<String>) -> Self {
        self.outputs.push(OutputDocument {
            channel,
            port: port.into(),
        });
        self
    }

    /// Appends a module.
    pub fn with_module(mut self, module: ModuleDocument) -> Self {
        self.modules.push(module);
        self
    }

    /// Converts into the core track configuration, resolving parameter values.
    ///
    /// Modules of unknown type keep only their tag; the matrix decides whether
    /// to skip or reject them, and their parameters are never resolved.
    pub fn to_track_config(&self) -> ValidationResult<TrackConfig> {
        let modules = self
            .modules
            .iter()
            .map(|module| match ModuleType::from_tag(&module.module_type) {
                Some(_) => module.to_module_config(&self.name),
                None => Ok(ModuleConfig::new(module.module_type.clone())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TrackConfig {
            name: self.name.clone(),
            channels: self.channels,
            modules,
            inputs: self
                .inputs
                .iter()
                .map(|route| InputRoute {
                    host_input: route.host,
                    channel: route.channel,
                })
                .collect(),
            outputs: self
                .outputs
                .iter()
                .map(|route| OutputRoute {
                    channel: route.channel,
                    port: route.port.trim().to_string(),
                })
                .collect(),
        })
    }
}

impl ModuleDocument {
    /// Creates a module entry without parameters.
    pub fn new(module_type: impl Into<String>) -> Self {
        Self {
            module_type: module_type.into(),
            params: BTreeMap::new(),
        }
    }

    /// Adds a parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Resolves every parameter value into a core [`ModuleConfig`].
    ///
    /// `track` only names the owning track in the error.
    pub fn to_module_config(&self, track: &str) -> ValidationResult<ModuleConfig> {
        let mut config = ModuleConfig::new(self.module_type.clone());
        for (name, value) in &self.params {
            let resolved = value.resolve().ok_or_else(|| ValidationError::InvalidValue {
                track: track.to_string(),
                module_type: self.module_type.clone(),
                param: name.clone(),
                value: value.to_string(),
            })?;
            config.params.insert(name.clone(), resolved);
        }
        Ok(config)
    }
}
