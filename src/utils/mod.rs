//! Shared helpers

pub mod helpers;

pub use helpers::{compare_paths, entry_name, is_image};
