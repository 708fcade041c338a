//! chrome.manifest rewriting for jar-packed chrome

use crate::error::{PackError, Result};
use lazy_static::lazy_static;
use regex::bytes::Regex;
use std::borrow::Cow;
use std::path::Path;

lazy_static! {
    // Registration type, namespace and any other fields, then the
    // trailing location token.
    static ref REGISTRATION: Regex = Regex::new(
        r"(?-u)^((?:content|skin|locale)[ \t].*[ \t])(\S+)([ \t]*)$"
    ).unwrap();
}

/// Prefix pointing a location into the jar named `jar_name`.
pub fn jar_prefix(jar_name: &str) -> String {
    format!("jar:{}!/", jar_name)
}

/// Point every `content`, `skin` and `locale` registration into
/// `jar_name`. All other lines, and line endings, are kept byte for byte.
/// Locations that are already `jar:` URLs are left alone.
pub fn rewrite_manifest(content: &[u8], jar_name: &str) -> Vec<u8> {
    let prefix = jar_prefix(jar_name);
    let mut out = Vec::with_capacity(content.len() + 64);

    for line in content.split_inclusive(|&b| b == b'\n') {
        let (body, ending) = line.split_at(line.len() - line_ending_len(line));
        out.extend_from_slice(&rewrite_line(body, &prefix));
        out.extend_from_slice(ending);
    }

    out
}

/// Read and rewrite the manifest at `path`
pub fn rewrite_manifest_file(path: &Path, jar_name: &str) -> Result<Vec<u8>> {
    let content = std::fs::read(path).map_err(|e| PackError::open(path, e))?;
    Ok(rewrite_manifest(&content, jar_name))
}

fn rewrite_line<'a>(line: &'a [u8], prefix: &str) -> Cow<'a, [u8]> {
    match REGISTRATION.captures(line) {
        Some(cap) if !cap[2].starts_with(b"jar:") => {
            let mut rewritten = Vec::with_capacity(line.len() + prefix.len());
            rewritten.extend_from_slice(&cap[1]);
            rewritten.extend_from_slice(prefix.as_bytes());
            rewritten.extend_from_slice(&cap[2]);
            rewritten.extend_from_slice(&cap[3]);
            Cow::Owned(rewritten)
        }
        _ => Cow::Borrowed(line),
    }
}

fn line_ending_len(line: &[u8]) -> usize {
    if line.ends_with(b"\r\n") {
        2
    } else if line.ends_with(b"\n") {
        1
    } else {
        0
    }
}
