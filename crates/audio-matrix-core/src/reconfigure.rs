//! Host reconfiguration protocol.
//!
//! The host backend reports block-size and sample-rate changes at arbitrary
//! times, usually from a non-real-time thread. [`Reconfigurator`] keeps the
//! current host settings, turns each notification into a fresh
//! [`HostAudioConfig`], and prepares the matrix through
//! [`SharedMatrix::prepare`].
//!
//! Notifications are serialised by the settings lock, which is always taken
//! before the matrix lock. Two notifications racing each other therefore
//! apply one after the other and the last one wins, and the matrix is always
//! prepared with a consistent pair of values.

use parking_lot::Mutex;

use crate::error::MatrixError;
use crate::host::HostAudioConfig;
use crate::shared::SharedMatrix;

/// Applies host block-size and sample-rate changes to a [`SharedMatrix`].
#[derive(Debug)]
pub struct Reconfigurator {
    matrix: SharedMatrix,
    current: Mutex<HostAudioConfig>,
}

impl Reconfigurator {
    /// Prepares `matrix` with the initial host settings.
    pub fn new(matrix: SharedMatrix, initial: HostAudioConfig) -> Self {
        tracing::info!(
            block_size = initial.block_size(),
            sample_rate = initial.sample_rate(),
            "initial host configuration"
        );
        matrix.prepare(initial);
        Self {
            matrix,
            current: Mutex::new(initial),
        }
    }

    /// Host settings the matrix is currently prepared for.
    pub fn current(&self) -> HostAudioConfig {
        *self.current.lock()
    }

    /// The matrix being reconfigured.
    pub fn matrix(&self) -> &SharedMatrix {
        &self.matrix
    }

    /// Handles a new host block size.
    ///
    /// # Errors
    ///
    /// [`MatrixError::InvalidBlockSize`] for zero; the matrix is left untouched.
    pub fn block_size_changed(&self, block_size: usize) -> Result<HostAudioConfig, MatrixError> {
        let mut current = self.current.lock();
        let next = current.with_block_size(block_size)?;
        self.apply(&mut current, next);
        tracing::info!(block_size, "buffer size changed");
        Ok(next)
    }

    /// Handles a new host sample rate.
    ///
    /// # Errors
    ///
    /// [`MatrixError::InvalidSampleRate`] for zero; the matrix is left untouched.
    pub fn sample_rate_changed(&self, sample_rate: u32) -> Result<HostAudioConfig, MatrixError> {
        let mut current = self.current.lock();
        let next = current.with_sample_rate(sample_rate)?;
        self.apply(&mut current, next);
        tracing::info!(sample_rate, "sample rate changed");
        Ok(next)
    }

    fn apply(&self, current: &mut HostAudioConfig, next: HostAudioConfig) {
        self.matrix.prepare(next);
        *current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{AudioMatrix, BlockStatus, MatrixConfig};
    use crate::module::ModuleConfig;
    use crate::track::TrackConfig;

    fn reconfigurator() -> Reconfigurator {
        let config = MatrixConfig::new(vec![
            TrackConfig::new("t", 1)
                .with_module(ModuleConfig::gain(1.0))
                .with_input(0, 0)
                .with_output(0, "out"),
        ]);
        let matrix = SharedMatrix::new(AudioMatrix::new(&config).unwrap());
        Reconfigurator::new(matrix, HostAudioConfig::new(64, 44100).unwrap())
    }

    #[test]
    fn initial_settings_prepare_matrix() {
        let reconfigurator = reconfigurator();
        assert_eq!(
            reconfigurator.matrix().host_config(),
            Some(HostAudioConfig::new(64, 44100).unwrap())
        );
        let mut out = [[0.0f32; 64]];
        assert_eq!(
            reconfigurator.matrix().process(&[[1.0f32; 64]], &mut out, 64),
            BlockStatus::Processed
        );
    }

    #[test]
    fn block_size_change_keeps_sample_rate() {
        let reconfigurator = reconfigurator();
        let next = reconfigurator.block_size_changed(256).unwrap();
        assert_eq!(next.block_size(), 256);
        assert_eq!(next.sample_rate(), 44100);
        assert_eq!(reconfigurator.matrix().host_config(), Some(next));
    }

    #[test]
    fn sample_rate_change_keeps_block_size() {
        let reconfigurator = reconfigurator();
        let next = reconfigurator.sample_rate_changed(96000).unwrap();
        assert_eq!(next.block_size(), 64);
        assert_eq!(reconfigurator.current(), next);
    }

    #[test]
    fn invalid_change_leaves_state_untouched() {
        let reconfigurator = reconfigurator();
        assert!(reconfigurator.block_size_changed(0).is_err());
        assert!(reconfigurator.sample_rate_changed(0).is_err());
        assert_eq!(
            reconfigurator.current(),
            HostAudioConfig::new(64, 44100).unwrap()
        );
    }
}
