//! Parsing modules for scripts and chrome manifests

pub mod manifest;
pub mod javascript;

pub use manifest::{rewrite_manifest, rewrite_manifest_file};
pub use javascript::{find_requires, scan_requires};
