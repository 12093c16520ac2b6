//! Host audio settings delivered by the audio backend.

use crate::error::MatrixError;

/// Block size and sample rate chosen by the host audio backend.
///
/// A new value is created for every reconfiguration event and handed to
/// [`AudioMatrix::prepare`](crate::AudioMatrix::prepare). The block size is
/// always greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostAudioConfig {
    block_size: usize,
    sample_rate: u32,
}

impl HostAudioConfig {
    /// Creates a host configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::InvalidBlockSize`] for a zero block size and
    /// [`MatrixError::InvalidSampleRate`] for a zero sample rate.
    pub fn new(block_size: usize, sample_rate: u32) -> Result<Self, MatrixError> {
        if block_size == 0 {
            return Err(MatrixError::InvalidBlockSize(block_size));
        }
        if sample_rate == 0 {
            return Err(MatrixError::InvalidSampleRate(sample_rate));
        }
        Ok(Self {
            block_size,
            sample_rate,
        })
    }

    /// Maximum number of frames per channel in one processing call.
    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Sample rate in Hz.
    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Returns a copy with a different block size.
    pub fn with_block_size(self, block_size: usize) -> Result<Self, MatrixError> {
        Self::new(block_size, self.sample_rate)
    }

    /// Returns a copy with a different sample rate.
    pub fn with_sample_rate(self, sample_rate: u32) -> Result<Self, MatrixError> {
        Self::new(self.block_size, sample_rate)
    }
}

impl core::fmt::Display for HostAudioConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} frames @ {} Hz", self.block_size, self.sample_rate)
    }
}
