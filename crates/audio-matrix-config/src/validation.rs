//! Document validation.
//!
//! Validation walks the whole document and reports every problem it finds,
//! not just the first one, so `audio-matrix check` can list them all at once.
//! A document that validates always builds a matrix.
//!
//! # Example
//!
//! ```rust
//! use audio_matrix_config::{MatrixDocument, ValidationError, validate_document};
//!
//! let doc = MatrixDocument::from_toml(
//!     r#"
//!     [[tracks]]
//!     name = "voice"
//!     channels = 0
//!     "#,
//! )
//! .unwrap();
//!
//! assert!(matches!(
//!     validate_document(&doc),
//!     Err(ValidationError::NoChannels { .. })
//! ));
//! ```

use std::collections::BTreeSet;

use audio_matrix_core::{ModuleError, ModuleType, create_module};
use thiserror::Error;

use crate::document::{MatrixDocument, OnUnknownModule, TrackDocument};

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Track declared with zero channels.
    #[error("track '{track}' has no channels")]
    NoChannels {
        /// Track name.
        track: String,
    },

    /// Input route targets a channel the track does not have.
    #[error("track '{track}': input routed to channel {channel} but the track has {channels} channels")]
    InputChannelOutOfRange {
        /// Track name.
        track: String,
        /// Offending channel.
        channel: usize,
        /// Channels of the track.
        channels: usize,
    },

    /// Output route reads a channel the track does not have.
    #[error("track '{track}': output reads channel {channel} but the track has {channels} channels")]
    OutputChannelOutOfRange {
        /// Track name.
        track: String,
        /// Offending channel.
        channel: usize,
        /// Channels of the track.
        channels: usize,
    },

    /// Output route with a blank port name.
    #[error("track '{track}': output port name is empty")]
    EmptyPortName {
        /// Track name.
        track: String,
    },

    /// Host inputs are not numbered `0..n`.
    #[error("host input {0} is never routed, host inputs must be numbered without gaps")]
    MissingHostInput(usize),

    /// Unrecognized module type while unknown modules are rejected.
    #[error("track '{track}': unknown module type '{module_type}'")]
    UnknownModule {
        /// Track name.
        track: String,
        /// Type tag as written.
        module_type: String,
    },

    /// Parameter value that does not parse to a finite number.
    #[error("track '{track}': parameter '{param}' of module '{module_type}' has invalid value {value}")]
    InvalidValue {
        /// Track name.
        track: String,
        /// Type tag of the module.
        module_type: String,
        /// Parameter name.
        param: String,
        /// Value as written.
        value: String,
    },

    /// Parameter rejected by the module itself.
    #[error("track '{track}': invalid parameter '{param}' for module '{module_type}': {reason}")]
    InvalidParameter {
        /// Track name.
        track: String,
        /// Type tag of the module.
        module_type: String,
        /// Parameter name.
        param: String,
        /// Description of why the parameter is invalid.
        reason: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Flattens the error into its individual problems.
    pub fn errors(&self) -> Vec<&ValidationError> {
        match self {
            ValidationError::Multiple(errors) => errors.iter().collect(),
            other => vec![other],
        }
    }

    fn from_list(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ValidationError::Multiple(errors)),
        }
    }
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a whole document, collecting every problem.
pub fn validate_document(doc: &MatrixDocument) -> ValidationResult<()> {
    let mut errors = Vec::new();
    let mut host_inputs = BTreeSet::new();

    for track in &doc.tracks {
        validate_track(track, doc.on_unknown_module, &mut errors);
        host_inputs.extend(track.inputs.iter().map(|route| route.host));
    }

    if let Some(missing) = host_inputs
        .iter()
        .enumerate()
        .find_map(|(expected, &index)| (expected != index).then_some(expected))
    {
        errors.push(ValidationError::MissingHostInput(missing));
    }

    ValidationError::from_list(errors)
}

/// Validates one track: channel count, route ranges, port names and modules.
pub fn validate_track(
    track: &TrackDocument,
    on_unknown_module: OnUnknownModule,
    errors: &mut Vec<ValidationError>,
) {
    if track.channels == 0 {
        errors.push(ValidationError::NoChannels {
            track: track.name.clone(),
        });
    }

    for route in &track.inputs {
        if route.channel >= track.channels {
            errors.push(ValidationError::InputChannelOutOfRange {
                track: track.name.clone(),
                channel: route.channel,
                channels: track.channels,
            });
        }
    }

    for route in &track.outputs {
        if route.channel >= track.channels {
            errors.push(ValidationError::OutputChannelOutOfRange {
                track: track.name.clone(),
                channel: route.channel,
                channels: track.channels,
            });
        }
        if route.port.trim().is_empty() {
            errors.push(ValidationError::EmptyPortName {
                track: track.name.clone(),
            });
        }
    }

    for module in &track.modules {
        if ModuleType::from_tag(&module.module_type).is_none() {
            if on_unknown_module == OnUnknownModule::Reject {
                errors.push(ValidationError::UnknownModule {
                    track: track.name.clone(),
                    module_type: module.module_type.clone(),
                });
            }
            continue;
        }

        let config = match module.to_module_config(&track.name) {
            Ok(config) => config,
            Err(err) => {
                errors.push(err);
                continue;
            }
        };
        if let Err(ModuleError::InvalidParameter {
            module_type,
            param,
            reason,
        }) = create_module(&config)
        {
            errors.push(ValidationError::InvalidParameter {
                track: track.name.clone(),
                module_type,
                param,
                reason,
            });
        }
    }
}
