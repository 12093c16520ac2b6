//! Offline WAV rendering command.

use std::path::PathBuf;

use audio_matrix_core::HostAudioConfig;
use audio_matrix_io::{WavSpec, read_wav_channels, render, write_wav_channels};
use clap::Args;

use super::Context;

#[derive(Args)]
pub struct RenderArgs {
    /// Input WAV file, one channel per host input
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file, one channel per output port
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32", value_parser = parse_bit_depth)]
    bit_depth: u16,
}

fn parse_bit_depth(s: &str) -> Result<u16, String> {
    match s.parse::<u16>() {
        Ok(bits @ (16 | 24 | 32)) => Ok(bits),
        _ => Err(format!("unsupported bit depth '{s}' (expected 16, 24 or 32)")),
    }
}

pub fn run(context: &Context, args: RenderArgs) -> anyhow::Result<()> {
    println!("Reading {}...", args.input.display());
    let (inputs, spec) = read_wav_channels(&args.input)?;
    let frames = inputs.first().map_or(0, Vec::len);
    println!(
        "  {} channel(s), {} frames, {} Hz, {:.2}s",
        inputs.len(),
        frames,
        spec.sample_rate,
        frames as f32 / spec.sample_rate as f32
    );

    let host = HostAudioConfig::new(args.block_size, spec.sample_rate)?;
    let client = context.build_client(host)?;
    let ports = client.ports();
    if inputs.len() < ports.n_inputs() {
        tracing::warn!(
            file_channels = inputs.len(),
            inputs = ports.n_inputs(),
            "input file has fewer channels than the matrix, missing inputs are silent"
        );
    }

    println!(
        "Rendering through {} input(s) and {} output(s)...",
        ports.n_inputs(),
        ports.n_outputs()
    );
    let outputs = render(&client, &inputs)?;

    let out_spec = WavSpec {
        channels: outputs.len() as u16,
        sample_rate: spec.sample_rate,
        bits_per_sample: args.bit_depth,
    };
    write_wav_channels(&args.output, &outputs, out_spec)?;
    println!(
        "Wrote {} ({} channel(s): {})",
        args.output.display(),
        outputs.len(),
        ports.outputs().join(", ")
    );
    Ok(())
}
