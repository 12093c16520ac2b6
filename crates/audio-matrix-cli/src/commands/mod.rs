//! CLI command implementations.

pub mod check;
pub mod common;
pub mod devices;
pub mod init;
pub mod ports;
pub mod render;
pub mod run;

pub use common::Context;
