//! Configuration documents for the audio matrix.
//!
//! A matrix is described by a TOML document: a list of tracks, each with a
//! channel count, host input routes, named output routes and a module chain.
//! This crate loads and saves such documents, validates them (reporting every
//! problem at once) and converts them into the core
//! [`MatrixConfig`](audio_matrix_core::MatrixConfig).
//!
//! # Features
//!
//! - **Documents**: Load, parse, save and template matrix documents
//! - **Parameter values**: Plain numbers, decibels (`"-6dB"`) and percentages (`"50%"`)
//! - **Validation**: Channel ranges, host input numbering, port names, module types and parameters
//!
//! # Example
//!
//! ```rust
//! use audio_matrix_config::MatrixDocument;
//! use audio_matrix_core::AudioMatrix;
//!
//! let doc = MatrixDocument::from_toml(
//!     r#"
//!     [[tracks]]
//!     name = "voice"
//!     channels = 1
//!     inputs = [{ host = 0, channel = 0 }]
//!     outputs = [{ channel = 0, port = "main" }]
//!
//!     [[tracks.modules]]
//!     type = "gain"
//!     params = { gain = "-6dB" }
//!     "#,
//! )
//! .unwrap();
//!
//! let matrix = AudioMatrix::new(&doc.to_matrix_config().unwrap()).unwrap();
//! assert_eq!(matrix.n_input_channels(), 1);
//! assert_eq!(matrix.output_port_name(0), Some("main"));
//! ```

mod document;
mod error;
mod param;

/// Document validation.
pub mod validation;

pub use document::{
    InputDocument, MatrixDocument, ModuleDocument, OnUnknownModule, OutputDocument, TrackDocument,
};
pub use error::ConfigError;
pub use param::{ParamValue, parse_param_value};
pub use validation::{ValidationError, ValidationResult, validate_document, validate_track};
