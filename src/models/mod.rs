//! Core data models for packaging

pub mod config;
pub mod archive;

pub use config::*;
pub use archive::*;
