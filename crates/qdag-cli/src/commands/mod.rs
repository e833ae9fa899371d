//! CLI command implementations.

pub mod check;
pub mod common;
pub mod convert;
pub mod demo;
pub mod optimize;
pub mod stats;
pub mod version;
