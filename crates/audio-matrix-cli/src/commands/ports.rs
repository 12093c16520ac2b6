//! Port layout command.

use audio_matrix_core::{AudioMatrix, SharedMatrix};
use audio_matrix_io::PortLayout;

use super::Context;

pub fn run(context: &Context) -> anyhow::Result<()> {
    let (_, config) = context.load_matrix_config()?;
    let matrix = SharedMatrix::new(AudioMatrix::new(&config)?);
    let ports = PortLayout::from_matrix(&matrix)?;

    println!("Client: {}", context.client_name);
    print!("{ports}");
    Ok(())
}
