//! Configuration validation command.

use anyhow::Context as _;
use audio_matrix_config::MatrixDocument;
use audio_matrix_core::AudioMatrix;

use super::Context;

pub fn run(context: &Context) -> anyhow::Result<()> {
    let path = context.config_path()?;
    let doc = MatrixDocument::load(path)
        .with_context(|| format!("failed to load {}", path.display()))?;

    if let Err(err) = doc.validate() {
        let errors = err.errors();
        println!("{}: {} problem(s)", path.display(), errors.len());
        for error in &errors {
            println!("  - {error}");
        }
        anyhow::bail!("configuration {} is invalid", path.display());
    }

    let matrix = AudioMatrix::new(&doc.to_matrix_config()?)?;
    println!("{}: ok", path.display());
    if let Some(name) = &doc.name {
        println!("  Name:    {name}");
    }
    println!("  Tracks:  {}", matrix.tracks().len());
    println!("  Inputs:  {}", matrix.n_input_channels());
    println!("  Outputs: {}", matrix.n_output_channels());
    Ok(())
}
