//! Archive entries and build results

use super::config::LayoutKind;
use serde::Serialize;
use std::path::PathBuf;
use zip::CompressionMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    Stored,
    Deflated,
    /// Any other method found when reading an archive back.
    Other,
}

impl Compression {
    pub fn method(self) -> CompressionMethod {
        match self {
            Compression::Deflated => CompressionMethod::Deflated,
            Compression::Stored | Compression::Other => CompressionMethod::Stored,
        }
    }
}

impl From<CompressionMethod> for Compression {
    fn from(method: CompressionMethod) -> Self {
        match method {
            CompressionMethod::Stored => Compression::Stored,
            CompressionMethod::Deflated => Compression::Deflated,
            _ => Compression::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveEntry {
    pub name: String,
    pub compression: Compression,
    /// Uncompressed size in bytes.
    pub size: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildResult {
    pub destination: PathBuf,
    pub layout: LayoutKind,
    /// Outer archive entries in write order.
    pub entries: Vec<ArchiveEntry>,
    /// Inner jar entries in write order; empty for flat builds.
    pub jar_entries: Vec<ArchiveEntry>,
    /// Script requirements discovered from the entry scripts.
    pub requirements: Vec<String>,
    /// Patterns that resolved to nothing.
    pub unmatched: Vec<String>,
}

impl BuildResult {
    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(|e| e.size).sum()
    }
}
