//! Query Server bootstrap library.
//!
//! This module exposes internal types for testing purposes.
//! The main entry point is the `queryserver` binary.

pub mod bootstrap;
pub mod cli;
pub mod logging;
#[cfg(feature = "metadata-provider")]
pub mod metadata;
pub mod output;

// Re-export commonly used types
pub use cli::Args;
