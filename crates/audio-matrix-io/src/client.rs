//! The host-facing client.
//!
//! [`MatrixClient`] is what a host backend talks to. It builds the matrix,
//! derives the port layout, prepares the matrix for the initial host settings
//! and then exposes the three host entry points: the real-time `process` and
//! the two reconfiguration notifications.

use std::sync::Arc;

use audio_matrix_core::{
    AudioMatrix, BlockStatus, HostAudioConfig, MatrixConfig, Reconfigurator, SharedMatrix,
};

use crate::monitor::BlockSizeMonitor;
use crate::ports::PortLayout;
use crate::Result;

/// Audio matrix client: matrix, port layout and reconfiguration protocol.
#[derive(Debug)]
pub struct MatrixClient {
    name: String,
    matrix: SharedMatrix,
    reconfigurator: Reconfigurator,
    ports: PortLayout,
    monitor: Arc<BlockSizeMonitor>,
}

impl MatrixClient {
    /// Builds the matrix, derives its ports and prepares it for `host`.
    ///
    /// # Errors
    ///
    /// [`Error::Matrix`](crate::Error::Matrix) when the matrix cannot be built,
    /// [`Error::TooManyPorts`](crate::Error::TooManyPorts) when the routing
    /// needs more ports than the host provides.
    pub fn new(
        name: impl Into<String>,
        config: &MatrixConfig,
        host: HostAudioConfig,
    ) -> Result<Self> {
        let name = name.into();
        let matrix = SharedMatrix::new(AudioMatrix::new(config)?);
        let ports = PortLayout::from_matrix(&matrix)?;

        tracing::info!(
            client = %name,
            inputs = ports.n_inputs(),
            outputs = ports.n_outputs(),
            "ports registered"
        );

        let reconfigurator = Reconfigurator::new(matrix.clone(), host);
        Ok(Self {
            name,
            matrix,
            reconfigurator,
            ports,
            monitor: Arc::new(BlockSizeMonitor::new(host.block_size())),
        })
    }

    /// Client name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registered ports.
    pub fn ports(&self) -> &PortLayout {
        &self.ports
    }

    /// Handle to the matrix, for moving into audio callbacks.
    pub fn shared(&self) -> SharedMatrix {
        self.matrix.clone()
    }

    /// Block-size monitor fed by real-time callbacks.
    pub fn monitor(&self) -> Arc<BlockSizeMonitor> {
        Arc::clone(&self.monitor)
    }

    /// Current host settings.
    pub fn host_config(&self) -> HostAudioConfig {
        self.reconfigurator.current()
    }

    /// Processes one host block (audio thread, never blocks).
    ///
    /// `inputs` and `outputs` are indexed like [`ports`](Self::ports).
    pub fn process<I, O>(
        &self,
        inputs: &[I],
        outputs: &mut [O],
        nframes: usize,
    ) -> BlockStatus
    where
        I: AsRef<[f32]>,
        O: AsMut<[f32]>,
    {
        self.matrix.process(inputs, outputs, nframes)
    }

    /// Host notification: new block size.
    pub fn block_size_changed(&self, block_size: usize) -> Result<HostAudioConfig> {
        let config = self.reconfigurator.block_size_changed(block_size)?;
        self.monitor.set_prepared(config.block_size());
        Ok(config)
    }

    /// Host notification: new sample rate.
    pub fn sample_rate_changed(&self, sample_rate: u32) -> Result<HostAudioConfig> {
        Ok(self.reconfigurator.sample_rate_changed(sample_rate)?)
    }

    /// Applies a pending block-size change reported by the real-time side.
    ///
    /// Returns the new host settings if the matrix was reconfigured.
    pub fn poll_block_size(&self) -> Result<Option<HostAudioConfig>> {
        match self.monitor.poll() {
            Some(block_size) => self.block_size_changed(block_size).map(Some),
            None => Ok(None),
        }
    }

    /// Blocks dropped because a reconfiguration held the matrix.
    pub fn dropped_blocks(&self) -> u64 {
        self.matrix.dropped_blocks()
    }
}
