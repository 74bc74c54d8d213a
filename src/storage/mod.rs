//! Storage Layer
//!
//! Handles configuration persistence: JSON config file plus environment overlay.

pub mod config;

pub use config::*;
