//! Legacy Firefox Extension Packager
//!
//! Collects an extension's static assets and the scripts reachable from its
//! `require` graph, then writes them into an XPI archive, either flat or
//! with the chrome files nested in an inner `chrome.jar`.

pub mod error;
pub mod models;
pub mod parser;
pub mod packager;
pub mod report;
pub mod utils;

pub use error::{PackError, Result};
pub use models::{BuildResult, Layout, LayoutKind, PackageConfig, UnmatchedPolicy};
pub use packager::build_package;

use std::path::{Path, PathBuf};

/// Main entry point for packaging the extension rooted at `root`
pub fn package_extension(root: &Path, options: PackOptions) -> Result<BuildResult> {
    let config = options.resolve(root)?;
    build_package(&config)
}

#[derive(Debug, Clone, Default)]
pub struct PackOptions {
    /// Layout to build; falls back to the config file, then flat.
    pub layout: Option<LayoutKind>,
    /// Explicit config file instead of `<root>/xpipack.json`.
    pub config_path: Option<PathBuf>,
    /// Output archive, overriding the configured destination.
    pub output: Option<PathBuf>,
    /// Treat unmatched patterns as errors.
    pub strict: bool,
}

impl PackOptions {
    /// Load the configuration for `root` and apply these options on top.
    pub fn resolve(&self, root: &Path) -> Result<PackageConfig> {
        let mut config = PackageConfig::load(root, self.config_path.as_deref(), self.layout)?;

        if let Some(output) = &self.output {
            config.destination = output.clone();
        }
        if self.strict {
            config.unmatched = UnmatchedPolicy::Error;
        }

        Ok(config)
    }
}
