//! Audio device listing command.

use audio_matrix_io::{AudioBackend, CpalBackend};

pub fn run() -> anyhow::Result<()> {
    let backend = CpalBackend::new();
    let devices = backend.list_devices()?;

    if devices.is_empty() {
        println!("No audio devices found.");
        return Ok(());
    }

    println!("Available Audio Devices ({})", backend.name());
    println!("=======================\n");

    let inputs: Vec<_> = devices.iter().filter(|d| d.is_input()).collect();
    if !inputs.is_empty() {
        println!("Input Devices:");
        for (idx, device) in inputs.iter().enumerate() {
            println!(
                "  [{}] {} ({} ch, {} Hz)",
                idx, device.name, device.max_input_channels, device.default_sample_rate
            );
        }
        println!();
    }

    let outputs: Vec<_> = devices.iter().filter(|d| d.is_output()).collect();
    if !outputs.is_empty() {
        println!("Output Devices:");
        for (idx, device) in outputs.iter().enumerate() {
            println!(
                "  [{}] {} ({} ch, {} Hz)",
                idx, device.name, device.max_output_channels, device.default_sample_rate
            );
        }
        println!();
    }

    println!(
        "Total: {} input(s), {} output(s)",
        inputs.len(),
        outputs.len()
    );
    println!();
    println!("Tip: select devices by partial name:");
    println!("  audio-matrix --config matrix.toml run --input-device \"USB\" --output-device \"USB\"");
    Ok(())
}
