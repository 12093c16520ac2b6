//! Shared CLI helpers used across multiple commands.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use audio_matrix_config::MatrixDocument;
use audio_matrix_core::{HostAudioConfig, MatrixConfig};
use audio_matrix_io::MatrixClient;

/// Options shared by every subcommand.
pub struct Context {
    /// Configuration file given with `--config`.
    pub config: Option<PathBuf>,
    /// Client name given with `--client-name` (or the default).
    pub client_name: String,
}

impl Context {
    /// The configuration path, or an error telling the user to supply one.
    pub fn config_path(&self) -> anyhow::Result<&Path> {
        self.config.as_deref().ok_or_else(|| {
            anyhow::anyhow!("please provide a config file with --config <path/to/config.toml>")
        })
    }

    /// Loads the configuration document and converts it into a matrix config.
    pub fn load_matrix_config(&self) -> anyhow::Result<(MatrixDocument, MatrixConfig)> {
        let path = self.config_path()?;
        let doc = MatrixDocument::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        let config = doc
            .to_matrix_config()
            .with_context(|| format!("invalid configuration {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            tracks = config.tracks.len(),
            "configuration loaded"
        );
        Ok((doc, config))
    }

    /// Builds a prepared client from the configuration.
    pub fn build_client(&self, host: HostAudioConfig) -> anyhow::Result<MatrixClient> {
        let (_, config) = self.load_matrix_config()?;
        Ok(MatrixClient::new(&self.client_name, &config, host)?)
    }
}
