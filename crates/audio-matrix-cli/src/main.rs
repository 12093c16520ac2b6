//! audio-matrix CLI - route host audio channels through a track matrix.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "audio-matrix")]
#[command(author, version, about = "Real-time audio routing matrix", long_about = None)]
struct Cli {
    /// Matrix configuration file (TOML)
    #[arg(short, long, global = true, visible_alias = "configfile")]
    config: Option<PathBuf>,

    /// Client name shown to the audio host
    #[arg(short = 'j', long, global = true, visible_alias = "jackclientname")]
    client_name: Option<String>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream audio devices through the matrix until Ctrl+C
    Run(commands::run::RunArgs),

    /// Render a WAV file through the matrix
    Render(commands::render::RenderArgs),

    /// Show the host ports derived from the configuration
    Ports,

    /// Validate a configuration file and report every problem
    Check,

    /// Write a starter stereo passthrough configuration
    Init(commands::init::InitArgs),

    /// List audio devices and their channel counts
    Devices,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let context = commands::Context {
        config: cli.config,
        client_name: cli.client_name.unwrap_or_else(default_client_name),
    };

    match cli.command {
        Commands::Run(args) => commands::run::run(&context, args),
        Commands::Render(args) => commands::render::run(&context, args),
        Commands::Ports => commands::ports::run(&context),
        Commands::Check => commands::check::run(&context),
        Commands::Init(args) => commands::init::run(&context, args),
        Commands::Devices => commands::devices::run(),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

/// Executable file name, or `audio-matrix` when it cannot be determined.
fn default_client_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|path| path.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "audio-matrix".to_string())
}
