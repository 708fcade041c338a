//! Script dependency scanning using regex patterns

use crate::error::{PackError, Result};
use lazy_static::lazy_static;
use regex::bytes::Regex;
use std::collections::{HashSet, VecDeque};
use std::path::Path;
use tracing::debug;

/// Suffix appended to a module identifier to get its file name.
pub const SCRIPT_SUFFIX: &str = ".js";

lazy_static! {
    // require("x") / require('x') / lazyRequire("x") / lazyRequire('x')
    static ref REQUIRE_PATTERN: Regex = Regex::new(
        r#"(?-u:\b)(?:r|lazyR)equire\(\s*(?:"([^"]+)"|'([^']+)')"#
    ).unwrap();
}

/// Extract every required script file name from one source text, in
/// order of appearance. Duplicates are kept. The text need not be valid
/// UTF-8.
pub fn find_requires(source: impl AsRef<[u8]>) -> Vec<String> {
    let mut found = Vec::new();

    for line in source.as_ref().split(|&b| b == b'\n') {
        for cap in REQUIRE_PATTERN.captures_iter(line) {
            if let Some(id) = cap.get(1).or_else(|| cap.get(2)) {
                let id = String::from_utf8_lossy(id.as_bytes());
                found.push(format!("{}{}", id, SCRIPT_SUFFIX));
            }
        }
    }

    found
}

/// Follow `require` statements from `entry_points` (paths relative to
/// `root`) and return every script reached, in discovery order.
///
/// Entry points are only part of the result when another script requires
/// them. Any entry point or required file that cannot be opened fails
/// the scan with [`PackError::MissingFile`].
pub fn scan_requires<S: AsRef<str>>(root: &Path, entry_points: &[S]) -> Result<Vec<String>> {
    let mut queue: VecDeque<String> = entry_points
        .iter()
        .map(|s| s.as_ref().to_string())
        .collect();
    let mut scanned: HashSet<String> = HashSet::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut discovered = Vec::new();

    while let Some(script) = queue.pop_front() {
        if !scanned.insert(script.clone()) {
            continue;
        }

        for required in requires_in_file(&root.join(&script))? {
            if seen.insert(required.clone()) {
                debug!(from = %script, script = %required, "found requirement");
                discovered.push(required.clone());
                queue.push_back(required);
            }
        }
    }

    Ok(discovered)
}

fn requires_in_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read(path).map_err(|e| PackError::open(path, e))?;
    Ok(find_requires(content))
}
