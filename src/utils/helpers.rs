//! Helper utility functions

use std::cmp::Ordering;
use std::path::{Component, Path};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "ico", "bmp", "webp"];

/// Check if a path names an image file (already compressed, stored as is)
pub fn is_image(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.iter().any(|i| e.eq_ignore_ascii_case(i)))
        .unwrap_or(false)
}

/// Archive entry name for a path relative to the source root
pub fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Case-insensitive path order. Paths equal under lowercasing fall back
/// to byte order so the result never depends on input order.
pub fn compare_paths(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
