//! XPI and chrome.jar archive writing

use crate::error::{PackError, Result};
use crate::models::{ArchiveEntry, Compression};
use crate::utils::{compare_paths, is_image};
use std::collections::BTreeSet;
use std::fs;
use std::io::{Cursor, Seek, Write};
use std::path::Path;
use tracing::debug;
use zip::write::{FileOptions, ZipWriter};
use zip::DateTime;

/// Deduplicate and order paths case-insensitively.
pub fn sort_entries<I>(files: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let unique: BTreeSet<String> = files.into_iter().collect();
    let mut sorted: Vec<String> = unique.into_iter().collect();
    sorted.sort_by(|a, b| compare_paths(a, b));
    sorted
}

/// Images are already compressed and are stored as is.
pub fn compression_for(path: &str) -> Compression {
    if is_image(path) {
        Compression::Stored
    } else {
        Compression::Deflated
    }
}

/// Fixed timestamp and permissions so unchanged inputs give identical archives.
fn entry_options(compression: Compression) -> FileOptions {
    FileOptions::default()
        .compression_method(compression.method())
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644)
}

fn write_bytes<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    content: &[u8],
    compression: Compression,
) -> Result<ArchiveEntry> {
    zip.start_file(name, entry_options(compression))?;
    zip.write_all(content)?;
    debug!(entry = name, ?compression, size = content.len(), "wrote entry");

    Ok(ArchiveEntry {
        name: name.to_string(),
        compression,
        size: content.len() as u64,
    })
}

fn write_files<W, F>(
    zip: &mut ZipWriter<W>,
    root: &Path,
    files: &[String],
    compression: F,
) -> Result<Vec<ArchiveEntry>>
where
    W: Write + Seek,
    F: Fn(&str) -> Compression,
{
    let mut entries = Vec::with_capacity(files.len());

    for name in files {
        let path = root.join(name);
        let content = fs::read(&path).map_err(|e| PackError::open(&path, e))?;
        entries.push(write_bytes(zip, name, &content, compression(name))?);
    }

    Ok(entries)
}

/// Write `files` (relative to `root`, already sorted) uncompressed.
pub fn write_flat<W: Write + Seek>(
    writer: W,
    root: &Path,
    files: &[String],
) -> Result<Vec<ArchiveEntry>> {
    let mut zip = ZipWriter::new(writer);
    let entries = write_files(&mut zip, root, files, |_| Compression::Stored)?;
    zip.finish()?;
    Ok(entries)
}

/// Build an in-memory jar from `files` (relative to `root`, already sorted).
pub fn build_jar(root: &Path, files: &[String]) -> Result<(Vec<u8>, Vec<ArchiveEntry>)> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let entries = write_files(&mut zip, root, files, compression_for)?;
    let cursor = zip.finish()?;
    Ok((cursor.into_inner(), entries))
}

/// Contents of the outer archive of a nested build.
pub struct NestedPackage<'a> {
    pub jar_name: &'a str,
    pub jar: &'a [u8],
    /// Already sorted, relative to the source root.
    pub resources: &'a [String],
    pub manifest_name: &'a str,
    pub manifest: &'a [u8],
}

/// Write the jar blob, then the resources, then the rewritten manifest.
pub fn write_nested<W: Write + Seek>(
    writer: W,
    root: &Path,
    package: &NestedPackage<'_>,
) -> Result<Vec<ArchiveEntry>> {
    let mut zip = ZipWriter::new(writer);

    let mut entries = vec![write_bytes(
        &mut zip,
        package.jar_name,
        package.jar,
        Compression::Deflated,
    )?];
    entries.extend(write_files(&mut zip, root, package.resources, compression_for)?);
    entries.push(write_bytes(
        &mut zip,
        package.manifest_name,
        package.manifest,
        Compression::Deflated,
    )?);

    zip.finish()?;
    Ok(entries)
}
