//! Scalar gain module.
//!
//! ```rust
//! use audio_matrix_core::{AudioBuffer, Gain, HostAudioConfig, Module};
//!
//! let mut gain = Gain::new(0.5);
//! gain.prepare(&HostAudioConfig::new(4, 48000).unwrap());
//!
//! let mut buffer = AudioBuffer::new(1, 4);
//! buffer.channel_mut(0).unwrap().fill(2.0);
//! gain.process(&mut buffer.block_mut(4));
//! assert_eq!(buffer.channel(0).unwrap(), &[1.0; 4]);
//! ```

use crate::buffer::BlockMut;
use crate::error::ModuleError;
use crate::host::HostAudioConfig;
use crate::module::{Module, ModuleConfig, ModuleType};

/// Convert decibels to linear gain.
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    libm::powf(10.0, db / 20.0)
}

/// Convert linear gain to decibels. Silence maps to negative infinity.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        return f32::NEG_INFINITY;
    }
    20.0 * libm::log10f(linear)
}

/// Multiplies every sample of every channel by a fixed factor.
///
/// Stateless and channel-count agnostic; `prepare` has nothing to allocate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gain {
    factor: f32,
}

impl Gain {
    /// Parameter name of the linear gain factor.
    pub const PARAM_GAIN: &'static str = "gain";

    /// Creates a gain with a linear factor.
    pub fn new(factor: f32) -> Self {
        Self { factor }
    }

    /// Creates a gain from decibels.
    pub fn from_db(db: f32) -> Self {
        Self::new(db_to_linear(db))
    }

    /// Builds a gain from its configuration. A missing `gain` parameter means unity.
    pub fn from_config(config: &ModuleConfig) -> Result<Self, ModuleError> {
        for (name, &value) in &config.params {
            if name != Self::PARAM_GAIN {
                return Err(ModuleError::InvalidParameter {
                    module_type: ModuleType::Gain.tag().to_string(),
                    param: name.clone(),
                    reason: "unknown parameter".to_string(),
                });
            }
            if !value.is_finite() {
                return Err(ModuleError::InvalidParameter {
                    module_type: ModuleType::Gain.tag().to_string(),
                    param: name.clone(),
                    reason: format!("{value} is not a finite number"),
                });
            }
        }
        Ok(Self::new(config.param(Self::PARAM_GAIN).unwrap_or(1.0)))
    }

    /// Linear gain factor.
    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// Gain factor in decibels.
    pub fn factor_db(&self) -> f32 {
        linear_to_db(self.factor)
    }
}

impl Default for Gain {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Module for Gain {
    fn module_type(&self) -> ModuleType {
        ModuleType::Gain
    }

    fn prepare(&mut self, _config: &HostAudioConfig) {}

    #[inline]
    fn process(&mut self, block: &mut BlockMut<'_>) {
        let factor = self.factor;
        for sample in block.samples_mut() {
            *sample *= factor;
        }
    }
}
