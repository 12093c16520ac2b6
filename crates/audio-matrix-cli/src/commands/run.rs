//! Real-time streaming command.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use audio_matrix_core::HostAudioConfig;
use audio_matrix_io::{AudioBackend, CpalBackend, MatrixStream, StreamEvent, StreamOptions};
use clap::Args;

use super::Context;

/// How often the control loop checks for Ctrl+C and block-size changes.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Args)]
pub struct RunArgs {
    /// Input device name (partial match)
    #[arg(long)]
    input_device: Option<String>,

    /// Output device name (partial match)
    #[arg(long)]
    output_device: Option<String>,

    /// Sample rate (defaults to the output device's rate)
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Block size requested from the device
    #[arg(long, default_value = "256")]
    block_size: usize,
}

pub fn run(context: &Context, args: RunArgs) -> anyhow::Result<()> {
    let backend = CpalBackend::new();
    let options = StreamOptions {
        input_device: args.input_device,
        output_device: args.output_device,
    };

    let output_device = backend.output_device(options.output_device.as_deref())?;
    let sample_rate = args
        .sample_rate
        .unwrap_or(output_device.default_sample_rate);
    let host = HostAudioConfig::new(args.block_size, sample_rate)?;
    let client = context.build_client(host)?;

    println!("Client: {}", client.name());
    print!("{}", client.ports());
    println!("  Output device: {}", output_device.name);
    println!("  Host settings: {host}");
    println!("\nPress Ctrl+C to stop...\n");

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let stream = MatrixStream::start(&backend, &client, &options)?;

    while running.load(Ordering::SeqCst) {
        if let Some(StreamEvent::Error(message)) = stream.next_event(POLL_INTERVAL) {
            tracing::error!(error = %message, "shutting down after stream error");
            anyhow::bail!("audio stream failed: {message}");
        }
        if let Some(next) = client.poll_block_size()? {
            tracing::info!(block_size = next.block_size(), "host block size changed");
        }
    }

    tracing::info!(
        dropped_blocks = client.dropped_blocks(),
        underruns = stream.underruns(),
        "stopping"
    );
    println!("Stopped.");
    Ok(())
}
