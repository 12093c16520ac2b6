//! Starter configuration command.

use std::path::PathBuf;

use audio_matrix_config::MatrixDocument;
use clap::Args;

use super::Context;

/// File written when neither a path nor `--config` is given.
const DEFAULT_CONFIG_FILE: &str = "audio-matrix.toml";

#[derive(Args)]
pub struct InitArgs {
    /// Where to write the configuration (defaults to --config, then audio-matrix.toml)
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(short, long)]
    force: bool,
}

pub fn run(context: &Context, args: InitArgs) -> anyhow::Result<()> {
    let path = args
        .path
        .or_else(|| context.config.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    if path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    MatrixDocument::stereo_passthrough().save(&path)?;
    tracing::info!(path = %path.display(), "starter configuration written");
    println!("Wrote {}", path.display());
    println!("Next: audio-matrix --config {} run", path.display());
    Ok(())
}
