//! Mutual exclusion between reconfiguration and real-time processing.
//!
//! [`SharedMatrix`] puts the [`AudioMatrix`] behind one lock:
//!
//! - **Control thread**: [`prepare`](SharedMatrix::prepare) and
//!   [`reconfigure`](SharedMatrix::reconfigure) take the lock, blocking until
//!   any in-flight block finishes.
//! - **Audio thread**: [`process`](SharedMatrix::process) only ever
//!   `try_lock`s. If a reconfiguration holds the lock, the block is dropped:
//!   outputs are silenced, [`BlockStatus::Contended`] is returned, and the next
//!   block retries. The audio thread never waits.
//!
//! A reallocation can therefore never overlap a processing pass, whatever the
//! host backend guarantees about callback activation.
//!
//! Port layout queries are answered from a snapshot taken at construction
//! (the routing never changes after the matrix is built), so the host can
//! size its port arrays without touching the lock.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, MutexGuard};

use crate::host::HostAudioConfig;
use crate::matrix::{AudioMatrix, BlockStatus, silence};

struct SharedInner {
    matrix: Mutex<AudioMatrix>,
    n_inputs: usize,
    output_ports: Vec<String>,
    dropped_blocks: AtomicU64,
}

/// Thread-safe handle to an [`AudioMatrix`], cloneable into audio callbacks.
#[derive(Clone)]
pub struct SharedMatrix {
    inner: Arc<SharedInner>,
}

impl SharedMatrix {
    /// Wraps a matrix.
    pub fn new(matrix: AudioMatrix) -> Self {
        let n_inputs = matrix.n_input_channels();
        let output_ports = matrix.routing().output_port_names().to_vec();
        Self {
            inner: Arc::new(SharedInner {
                matrix: Mutex::new(matrix),
                n_inputs,
                output_ports,
                dropped_blocks: AtomicU64::new(0),
            }),
        }
    }

    /// Prepares the matrix for new host settings (control thread, blocking).
    pub fn prepare(&self, config: HostAudioConfig) {
        self.inner.matrix.lock().prepare(config);
    }

    /// Runs `f` with exclusive access to the matrix (control thread, blocking).
    pub fn reconfigure<R>(&self, f: impl FnOnce(&mut AudioMatrix) -> R) -> R {
        f(&mut self.inner.matrix.lock())
    }

    /// Holds the matrix for as long as the guard lives (control thread, blocking).
    ///
    /// Every `process` call made while the guard is alive is dropped.
    pub fn lock(&self) -> MutexGuard<'_, AudioMatrix> {
        self.inner.matrix.lock()
    }

    /// Processes one block from the audio thread without blocking.
    ///
    /// Returns [`BlockStatus::Contended`] with silenced outputs if the
    /// control thread currently holds the matrix.
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
        match self.inner.matrix.try_lock() {
            Some(mut matrix) => matrix.process(inputs, outputs, nframes),
            None => {
                silence(outputs);
                self.inner.dropped_blocks.fetch_add(1, Ordering::Relaxed);
                BlockStatus::Contended
            }
        }
    }

    /// Runs `f` with the matrix from the audio thread without blocking.
    ///
    /// Lets a callback split one host buffer into several blocks under a
    /// single lock, sized by the block size the matrix is prepared for.
    /// Returns `None`, counting one dropped block, if the control thread
    /// currently holds the matrix.
    pub fn try_process_with<R>(&self, f: impl FnOnce(&mut AudioMatrix) -> R) -> Option<R> {
        match self.inner.matrix.try_lock() {
            Some(mut matrix) => Some(f(&mut matrix)),
            None => {
                self.inner.dropped_blocks.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Number of blocks dropped because a reconfiguration held the matrix.
    pub fn dropped_blocks(&self) -> u64 {
        self.inner.dropped_blocks.load(Ordering::Relaxed)
    }

    /// Host settings of the last `prepare` (control thread, blocking).
    pub fn host_config(&self) -> Option<HostAudioConfig> {
        self.inner.matrix.lock().host_config()
    }

    /// Number of host input channels.
    pub fn n_input_channels(&self) -> usize {
        self.inner.n_inputs
    }

    /// Number of host output channels.
    pub fn n_output_channels(&self) -> usize {
        self.inner.output_ports.len()
    }

    /// Name of host output port `index`.
    pub fn output_port_name(&self, index: usize) -> Option<&str> {
        self.inner.output_ports.get(index).map(String::as_str)
    }
}

impl std::fmt::Debug for SharedMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedMatrix")
            .field("n_inputs", &self.inner.n_inputs)
            .field("output_ports", &self.inner.output_ports)
            .field("dropped_blocks", &self.dropped_blocks())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::MatrixConfig;
    use crate::module::ModuleConfig;
    use crate::track::TrackConfig;

    fn shared(factor: f32) -> SharedMatrix {
        let config = MatrixConfig::new(vec![
            TrackConfig::new("t", 1)
                .with_module(ModuleConfig::gain(factor))
                .with_input(0, 0)
                .with_output(0, "out"),
        ]);
        SharedMatrix::new(AudioMatrix::new(&config).unwrap())
    }

    fn host(block_size: usize) -> HostAudioConfig {
        HostAudioConfig::new(block_size, 48000).unwrap()
    }

    #[test]
    fn port_snapshot_matches_matrix() {
        let matrix = shared(1.0);
        assert_eq!(matrix.n_input_channels(), 1);
        assert_eq!(matrix.n_output_channels(), 1);
        assert_eq!(matrix.output_port_name(0), Some("out"));
    }

    #[test]
    fn processes_when_uncontended() {
        let matrix = shared(2.0);
        matrix.prepare(host(4));
        let mut outputs = [[0.0f32; 4]];
        let status = matrix.process(&[[1.5f32; 4]], &mut outputs, 4);
        assert_eq!(status, BlockStatus::Processed);
        assert_eq!(outputs[0], [3.0; 4]);
        assert_eq!(matrix.dropped_blocks(), 0);
    }

    #[test]
    fn drops_block_while_reconfiguring() {
        let matrix = shared(2.0);
        matrix.prepare(host(4));

        let guard = matrix.lock();
        let mut outputs = [[9.0f32; 4]];
        let status = matrix.process(&[[1.0f32; 4]], &mut outputs, 4);
        assert_eq!(status, BlockStatus::Contended);
        assert_eq!(outputs[0], [0.0; 4]);
        assert_eq!(matrix.dropped_blocks(), 1);
        drop(guard);

        let status = matrix.process(&[[1.0f32; 4]], &mut outputs, 4);
        assert_eq!(status, BlockStatus::Processed);
        assert_eq!(outputs[0], [2.0; 4]);
    }

    #[test]
    fn reconfigure_gives_exclusive_access() {
        let matrix = shared(1.0);
        let block_size = matrix.reconfigure(|m| {
            m.prepare(host(32));
            m.host_config().map(|c| c.block_size())
        });
        assert_eq!(block_size, Some(32));
        assert_eq!(matrix.host_config(), Some(host(32)));
    }

    #[test]
    fn try_process_with_reports_contention() {
        let matrix = shared(1.0);
        matrix.prepare(host(16));
        let block_size = matrix.try_process_with(|m| m.host_config().map(|c| c.block_size()));
        assert_eq!(block_size, Some(Some(16)));

        let guard = matrix.lock();
        assert_eq!(matrix.try_process_with(|_| ()), None);
        assert_eq!(matrix.dropped_blocks(), 1);
        drop(guard);
    }
}
