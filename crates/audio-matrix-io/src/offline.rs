//! Offline rendering: a whole multichannel signal through a client.

use audio_matrix_core::BlockStatus;

use crate::client::MatrixClient;
use crate::{Error, Result};

/// Feeds `inputs` (one vector per input port) through `client` block by block
/// and returns one vector per output port.
///
/// The signal length is the longest input; the final block may be shorter
/// than the block size. Input ports without a supplied channel, or channels
/// shorter than the signal, read as silence. A matrix without inputs renders
/// a single block of the prepared size.
///
/// # Errors
///
/// [`Error::NoOutputs`] for a matrix without output ports, or
/// [`Error::Stream`] when a block could not be processed.
pub fn render(client: &MatrixClient, inputs: &[Vec<f32>]) -> Result<Vec<Vec<f32>>> {
    let n_inputs = client.ports().n_inputs();
    let n_outputs = client.ports().n_outputs();
    if n_outputs == 0 {
        return Err(Error::NoOutputs);
    }
    if inputs.len() > n_inputs {
        tracing::warn!(
            supplied = inputs.len(),
            ports = n_inputs,
            "extra input channels ignored"
        );
    }

    let block_size = client.host_config().block_size();
    let total = if n_inputs == 0 {
        block_size
    } else {
        inputs.iter().take(n_inputs).map(Vec::len).max().unwrap_or(0)
    };

    let mut in_block = vec![vec![0.0f32; block_size]; n_inputs];
    let mut out_block = vec![vec![0.0f32; block_size]; n_outputs];
    let mut outputs = vec![Vec::with_capacity(total); n_outputs];

    let mut offset = 0;
    while offset < total {
        let frames = (total - offset).min(block_size);
        for (port, block) in in_block.iter_mut().enumerate() {
            block[..frames].fill(0.0);
            if let Some(channel) = inputs.get(port)
                && offset < channel.len()
            {
                let available = (channel.len() - offset).min(frames);
                block[..available].copy_from_slice(&channel[offset..offset + available]);
            }
        }

        match client.process(&in_block, &mut out_block, frames) {
            BlockStatus::Processed => {}
            status => {
                return Err(Error::Stream(format!(
                    "block at frame {offset} not processed: {status:?}"
                )));
            }
        }
        for (output, block) in outputs.iter_mut().zip(&out_block) {
            output.extend_from_slice(&block[..frames]);
        }
        offset += frames;
    }

    tracing::debug!(frames = total, blocks = total.div_ceil(block_size), "offline render done");
    Ok(outputs)
}
