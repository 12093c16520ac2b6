//! Error types for configuration operations.

use std::path::PathBuf;

use audio_matrix_core::MatrixError;
use thiserror::Error;

use crate::validation::ValidationError;

/// Errors that can occur while loading, saving or applying a configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create the parent directory of a document
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// The document is well-formed TOML but describes an invalid matrix
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The matrix could not be built from a valid document
    #[error("failed to build matrix: {0}")]
    Matrix(#[from] MatrixError),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audio_matrix_core::RoutingError;
    use std::error::Error;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    #[test]
    fn read_file_display_names_path() {
        let err = ConfigError::read_file("/a/matrix.toml", mock_io_err());
        let msg = err.to_string();
        assert!(msg.contains("failed to read file"), "got: {msg}");
        assert!(msg.contains("/a/matrix.toml"), "got: {msg}");
        assert!(err.source().is_some());
    }

    #[test]
    fn write_file_factory_produces_correct_variant() {
        let err = ConfigError::write_file("/out/matrix.toml", mock_io_err());
        assert!(
            matches!(err, ConfigError::WriteFile { ref path, .. } if path == std::path::Path::new("/out/matrix.toml"))
        );
    }

    #[test]
    fn create_dir_exposes_source() {
        let err = ConfigError::create_dir("/dir", mock_io_err());
        assert!(err.to_string().contains("failed to create directory"));
        assert!(err.source().is_some());
    }

    #[test]
    fn validation_display() {
        let err = ConfigError::from(ValidationError::MissingHostInput(1));
        assert_eq!(
            err.to_string(),
            "validation failed: host input 1 is never routed, host inputs must be numbered without gaps"
        );
    }

    #[test]
    fn matrix_error_is_wrapped() {
        let err = ConfigError::from(MatrixError::Routing(RoutingError::MissingHostInput(0)));
        assert!(err.to_string().starts_with("failed to build matrix"));
        assert!(err.source().is_some());
    }
}
