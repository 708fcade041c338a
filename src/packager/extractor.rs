//! Reading built archives back

use crate::error::{PackError, Result};
use crate::models::ArchiveEntry;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

fn list_entries<R: Read + Seek>(reader: R) -> Result<Vec<ArchiveEntry>> {
    let mut archive = ZipArchive::new(reader)?;
    let mut entries = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let file = archive.by_index(i)?;
        entries.push(ArchiveEntry {
            name: file.name().to_string(),
            compression: file.compression().into(),
            size: file.size(),
        });
    }

    Ok(entries)
}

/// List the entries of the archive at `path`, in stored order
pub fn list_archive(path: &Path) -> Result<Vec<ArchiveEntry>> {
    let file = File::open(path).map_err(|e| PackError::open(path, e))?;
    list_entries(file)
}

/// List the entries of an in-memory archive, such as a nested jar
pub fn list_archive_bytes(content: &[u8]) -> Result<Vec<ArchiveEntry>> {
    list_entries(Cursor::new(content))
}

/// Read one entry of the archive at `path`
pub fn read_entry(path: &Path, name: &str) -> Result<Vec<u8>> {
    let file = File::open(path).map_err(|e| PackError::open(path, e))?;
    let mut archive = ZipArchive::new(file)?;
    let mut entry = archive.by_name(name)?;

    let mut content = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut content)?;
    Ok(content)
}
