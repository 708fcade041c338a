//! Package collection and building

pub mod collector;
pub mod builder;
pub mod extractor;

pub use builder::{build_jar, compression_for, sort_entries, write_flat, write_nested, NestedPackage};
pub use collector::{Collection, FileCollector};
pub use extractor::{list_archive, list_archive_bytes, read_entry};

use crate::error::{PackError, Result};
use crate::models::{ArchiveEntry, BuildResult, Layout, PackageConfig};
use crate::parser::{rewrite_manifest_file, scan_requires};
use crate::utils::entry_name;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, warn};

/// Build the archive described by `config`.
///
/// Fails with [`PackError::DestinationExists`] without touching anything
/// when the destination is already present.
pub fn build_package(config: &PackageConfig) -> Result<BuildResult> {
    let destination = config.destination_path();
    if destination.exists() {
        return Err(PackError::DestinationExists { path: destination });
    }

    let root = config.root.as_path();
    let requirements = scan_requires(root, config.entry_scripts.as_slice())?;
    let scripts: Vec<String> = config
        .entry_scripts
        .iter()
        .chain(requirements.iter())
        .map(|s| entry_name(Path::new(s)))
        .collect();
    debug!(count = requirements.len(), "scanned script requirements");

    let mut unmatched = Vec::new();

    let (entries, jar_entries) = match &config.layout {
        Layout::Flat { resources } => {
            let collection = FileCollector::new(root, resources, config.unmatched).collect()?;
            unmatched.extend(collection.unmatched);

            let files = sort_entries(scripts.into_iter().chain(collection.files));
            let entries = write_archive(&destination, |file| write_flat(file, root, &files))?;
            (entries, Vec::new())
        }
        Layout::Nested {
            jar_name,
            manifest,
            chrome,
            resources,
        } => {
            let chrome = FileCollector::new(root, chrome, config.unmatched).collect()?;
            let resources = FileCollector::new(root, resources, config.unmatched).collect()?;
            unmatched.extend(chrome.unmatched);
            unmatched.extend(resources.unmatched);

            let chrome_files = sort_entries(chrome.files);
            // The jar and the rewritten manifest own these names in the outer archive
            let resource_files: Vec<String> = sort_entries(scripts.into_iter().chain(resources.files))
                .into_iter()
                .filter(|name| {
                    let reserved = name == jar_name || name == manifest;
                    if reserved {
                        warn!(entry = %name, "skipping resource that shadows a generated entry");
                    }
                    !reserved
                })
                .collect();
            let manifest_content = rewrite_manifest_file(&root.join(manifest), jar_name)?;
            let (jar, jar_entries) = build_jar(root, &chrome_files)?;

            let package = NestedPackage {
                jar_name,
                jar: &jar,
                resources: &resource_files,
                manifest_name: manifest,
                manifest: &manifest_content,
            };
            let entries = write_archive(&destination, |file| write_nested(file, root, &package))?;
            (entries, jar_entries)
        }
    };

    info!(
        destination = %destination.display(),
        entries = entries.len(),
        "package written"
    );

    Ok(BuildResult {
        destination,
        layout: config.layout.kind(),
        entries,
        jar_entries,
        requirements,
        unmatched,
    })
}

/// Create `destination` (never overwriting) and hand it to `write`. A
/// partially written archive is removed again.
fn write_archive<F>(destination: &Path, write: F) -> Result<Vec<ArchiveEntry>>
where
    F: FnOnce(&mut File) -> Result<Vec<ArchiveEntry>>,
{
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(destination)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => PackError::DestinationExists {
                path: destination.to_path_buf(),
            },
            _ => PackError::Io(e),
        })?;

    match write(&mut file) {
        Ok(entries) => Ok(entries),
        Err(err) => {
            drop(file);
            let _ = fs::remove_file(destination);
            Err(err)
        }
    }
}
