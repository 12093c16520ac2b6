//! Audio Matrix Core - the signal-routing graph of a real-time audio matrix.
//!
//! N host input channels are routed into tracks, each track runs an ordered
//! chain of modules over its own buffer, and the track channels are routed
//! (and summed) into M host output channels, once per audio block.
//!
//! # Core Abstractions
//!
//! - [`Module`] - Object-safe, in-place processing unit; [`Gain`] is the
//!   built-in variant, [`create_module`] maps type tags to variants
//! - [`Track`] - Ordered module chain over an exclusively owned [`AudioBuffer`]
//! - [`AudioMatrix`] - All tracks plus the [`RoutingMap`]; derives host channel counts
//! - [`SharedMatrix`] - Lock discipline between reconfiguration and the audio thread
//! - [`Reconfigurator`] - Applies host block-size and sample-rate changes
//!
//! # Example
//!
//! ```rust
//! use audio_matrix_core::{
//!     AudioMatrix, HostAudioConfig, MatrixConfig, ModuleConfig, TrackConfig,
//! };
//!
//! let config = MatrixConfig::new(vec![
//!     TrackConfig::new("voice", 1)
//!         .with_module(ModuleConfig::gain(0.5))
//!         .with_input(0, 0)
//!         .with_output(0, "main"),
//! ]);
//!
//! let mut matrix = AudioMatrix::new(&config).unwrap();
//! matrix.prepare(HostAudioConfig::new(4, 48000).unwrap());
//!
//! let inputs = [[1.0f32; 4]];
//! let mut outputs = [[0.0f32; 4]];
//! matrix.process(&inputs, &mut outputs, 4);
//! assert_eq!(outputs[0], [0.5; 4]);
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: no allocation, locking or I/O in `process`
//! - **Explicit ownership**: tracks own their buffers, modules get a bounded view per call
//! - **Derived topology**: channel counts follow from the routing, never configured separately

pub mod buffer;
pub mod error;
pub mod gain;
pub mod host;
pub mod matrix;
pub mod module;
pub mod reconfigure;
pub mod routing;
pub mod shared;
pub mod track;

// Re-export main types at crate root
pub use buffer::{AudioBuffer, BlockMut};
pub use error::{MatrixError, ModuleError, RoutingError};
pub use gain::{Gain, db_to_linear, linear_to_db};
pub use host::HostAudioConfig;
pub use matrix::{AudioMatrix, BlockStatus, MatrixConfig};
pub use module::{Module, ModuleConfig, ModuleType, create_module};
pub use reconfigure::Reconfigurator;
pub use routing::{Connection, InputRoute, OutputRoute, RoutingMap};
pub use shared::SharedMatrix;
pub use track::{Track, TrackConfig, UnknownModulePolicy};
