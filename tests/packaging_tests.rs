//! End-to-end packaging tests
//!
//! Each test lays out a small extension source tree in a temporary
//! directory, builds it and reads the resulting XPI back.

use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use xpipack::models::{ArchiveEntry, Compression, LayoutKind};
use xpipack::packager::{list_archive, list_archive_bytes, read_entry};
use xpipack::{build_package, package_extension, PackError, PackOptions, PackageConfig};

fn write(root: &Path, path: &str, content: &[u8]) {
    let path = root.join(path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn names(entries: &[ArchiveEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.name.as_str()).collect()
}

/// Source tree for a restartless extension with a small require graph
fn create_flat_extension(root: &Path) {
    write(
        root,
        "bootstrap.js",
        b"\"use strict\";\nconst {unload} = require(\"sdk/windows\");\nlazyRequire('main', [\"main\"], this);\n",
    );
    write(root, "loader.jsm", b"const EXPORTED_SYMBOLS = [\"require\"];\n");
    write(root, "main.js", b"const {Task} = require('sdk/cothreads');\n");
    write(root, "sdk/windows.js", b"exports.unload = function() {};\n");
    write(root, "sdk/cothreads.js", b"const {windows} = require(\"sdk/windows\");\n");
    write(root, "install.rdf", b"<?xml version=\"1.0\"?><RDF/>\n");
    write(root, "chrome.manifest", b"content fastprevnext ./\n");
    write(root, "Options.xul", b"<vbox/>\n");
    write(root, "overlay.css", b"#nav { }\n");
    write(root, "locale/en-US/fastprevnext.dtd", b"<!ENTITY a \"b\">\n");
    write(root, "locale/de/fastprevnext.properties", b"a=b\n");
    write(root, "defaults/preferences/prefs.js", b"pref(\"a\", 1);\n");
    write(root, "icon.png", &[0x89, b'P', b'N', b'G', 0, 0, 0, 0]);
    write(root, "arrows.png", &[0x89, b'P', b'N', b'G', 1, 1, 1, 1]);
    write(root, "LICENSE", b"MPL 2.0\n");
}

/// Source tree for a chrome.jar-packed extension
fn create_nested_extension(root: &Path) {
    write(
        root,
        "chrome.manifest",
        b"# registrations\ncontent fastprevnext content/\nlocale fastprevnext en-US locale/en-US/\nresource fastprevnext modules/\n",
    );
    write(root, "content/overlay.js", "var FastPrevNext = {};\n".repeat(40).as_bytes());
    write(root, "content/overlay.xul", b"<overlay/>\n");
    write(root, "content/Browser.css", b"#nav { }\n");
    write(root, "content/arrows.png", &[0x89, b'P', b'N', b'G', 0, 0, 0, 0]);
    write(root, "locale/en-US/fastprevnext.dtd", b"<!ENTITY a \"b\">\n");
    write(root, "locale/en-US/fastprevnext.properties", b"a=b\n");
    write(root, "modules/cothreads.jsm", b"const EXPORTED_SYMBOLS = [];\n");
    write(root, "icon.png", &[0x89, b'P', b'N', b'G', 0, 0, 0, 0]);
    write(root, "icon64.png", &[0x89, b'P', b'N', b'G', 0, 0, 0, 1]);
    write(root, "install.rdf", b"<?xml version=\"1.0\"?><RDF/>\n");
}

#[test]
fn test_flat_build() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    create_flat_extension(root);

    let result = build_package(&PackageConfig::flat_default(root)).unwrap();
    assert_eq!(result.layout, LayoutKind::Flat);
    assert_eq!(
        result.requirements,
        vec!["sdk/windows.js", "main.js", "sdk/cothreads.js"]
    );
    assert!(result.unmatched.contains(&"icon64.png".to_string()));

    let entries = list_archive(&root.join("fastprevnext.xpi")).unwrap();
    assert_eq!(
        names(&entries),
        vec![
            "arrows.png",
            "bootstrap.js",
            "chrome.manifest",
            "defaults/preferences/prefs.js",
            "icon.png",
            "install.rdf",
            "LICENSE",
            "loader.jsm",
            "locale/de/fastprevnext.properties",
            "locale/en-US/fastprevnext.dtd",
            "main.js",
            "Options.xul",
            "overlay.css",
            "sdk/cothreads.js",
            "sdk/windows.js",
        ]
    );
    assert!(entries.iter().all(|e| e.compression == Compression::Stored));
    assert_eq!(entries, result.entries);

    let license = read_entry(&root.join("fastprevnext.xpi"), "LICENSE").unwrap();
    assert_eq!(license, b"MPL 2.0\n");
}

#[test]
fn test_nested_build() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    create_nested_extension(root);

    let result = build_package(&PackageConfig::nested_default(root)).unwrap();
    assert!(result.unmatched.is_empty());
    assert!(result.requirements.is_empty());

    let xpi = root.join("fastprevnext.xpi");
    let entries = list_archive(&xpi).unwrap();
    assert_eq!(
        names(&entries),
        vec![
            "chrome.jar",
            "icon.png",
            "icon64.png",
            "install.rdf",
            "modules/cothreads.jsm",
            "chrome.manifest",
        ]
    );
    assert_eq!(entries[0].compression, Compression::Deflated);
    assert_eq!(entries[1].compression, Compression::Stored);
    assert_eq!(entries[3].compression, Compression::Deflated);

    let jar_entries = list_archive_bytes(&read_entry(&xpi, "chrome.jar").unwrap()).unwrap();
    assert_eq!(
        names(&jar_entries),
        vec![
            "content/arrows.png",
            "content/Browser.css",
            "content/overlay.js",
            "content/overlay.xul",
            "locale/en-US/fastprevnext.dtd",
            "locale/en-US/fastprevnext.properties",
        ]
    );
    assert_eq!(jar_entries[0].compression, Compression::Stored);
    assert_eq!(jar_entries[2].compression, Compression::Deflated);
    assert_eq!(jar_entries, result.jar_entries);

    let manifest = String::from_utf8(read_entry(&xpi, "chrome.manifest").unwrap()).unwrap();
    assert_eq!(
        manifest,
        "# registrations\n\
         content fastprevnext jar:chrome.jar!/content/\n\
         locale fastprevnext en-US jar:chrome.jar!/locale/en-US/\n\
         resource fastprevnext modules/\n"
    );
}

#[test]
fn test_destination_in_the_way() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    create_flat_extension(root);
    write(root, "fastprevnext.xpi", b"previous build");

    let err = build_package(&PackageConfig::flat_default(root)).unwrap_err();
    assert!(matches!(err, PackError::DestinationExists { .. }));
    assert_eq!(err.to_string(), format!("{} is in the way", root.join("fastprevnext.xpi").display()));
    assert_eq!(fs::read(root.join("fastprevnext.xpi")).unwrap(), b"previous build");
}

#[test]
fn test_missing_requirement_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    create_flat_extension(root);
    fs::remove_file(root.join("sdk/cothreads.js")).unwrap();

    let err = build_package(&PackageConfig::flat_default(root)).unwrap_err();
    match err {
        PackError::MissingFile { path, .. } => assert!(path.ends_with("sdk/cothreads.js")),
        other => panic!("unexpected error {:?}", other),
    }
    assert!(!root.join("fastprevnext.xpi").exists());
}

#[test]
fn test_missing_manifest_in_nested_build() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    create_nested_extension(root);
    fs::remove_file(root.join("chrome.manifest")).unwrap();

    let err = build_package(&PackageConfig::nested_default(root)).unwrap_err();
    assert!(matches!(err, PackError::MissingFile { .. }));
    assert!(!root.join("fastprevnext.xpi").exists());
}

#[test]
fn test_strict_build_rejects_unmatched_pattern() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    create_flat_extension(root);

    let options = PackOptions {
        strict: true,
        ..Default::default()
    };
    let err = package_extension(root, options).unwrap_err();
    assert!(matches!(err, PackError::UnmatchedPattern { pattern } if pattern == "icon64.png"));
    assert!(!root.join("fastprevnext.xpi").exists());
}

#[test]
fn test_config_file_and_output_override() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    create_nested_extension(root);
    write(
        root,
        "xpipack.json",
        br#"{
            // only package the overlay
            layout: "nested",
            chrome: ["content/overlay.*"],
            resources: ["install.rdf"],
        }"#,
    );

    let options = PackOptions {
        output: Some("build/test.xpi".into()),
        ..Default::default()
    };
    fs::create_dir_all(root.join("build")).unwrap();
    let result = package_extension(root, options).unwrap();

    assert_eq!(result.destination, root.join("build/test.xpi"));
    assert_eq!(names(&result.entries), vec!["chrome.jar", "install.rdf", "chrome.manifest"]);
    assert_eq!(
        names(&result.jar_entries),
        vec!["content/overlay.js", "content/overlay.xul"]
    );
}

#[test]
fn test_repeated_builds_are_byte_identical() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    create_nested_extension(root);

    let mut config = PackageConfig::nested_default(root);
    config.destination = "first.xpi".into();
    build_package(&config).unwrap();
    config.destination = "second.xpi".into();
    build_package(&config).unwrap();

    assert_eq!(
        fs::read(root.join("first.xpi")).unwrap(),
        fs::read(root.join("second.xpi")).unwrap()
    );
}

#[test]
fn test_nested_resources_do_not_shadow_generated_entries() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    create_nested_extension(root);
    write(root, "chrome.jar", b"stale jar");
    write(
        root,
        "xpipack.json",
        br#"{ layout: "nested", resources: ["install.rdf", "chrome.manifest", "chrome.jar"] }"#,
    );

    let result = package_extension(root, PackOptions::default()).unwrap();
    assert_eq!(names(&result.entries), vec!["chrome.jar", "install.rdf", "chrome.manifest"]);

    let xpi = root.join("fastprevnext.xpi");
    assert_eq!(names(&list_archive(&xpi).unwrap()), names(&result.entries));
    let manifest = String::from_utf8(read_entry(&xpi, "chrome.manifest").unwrap()).unwrap();
    assert!(manifest.contains("content fastprevnext jar:chrome.jar!/content/"));
    let jar = read_entry(&xpi, "chrome.jar").unwrap();
    assert_ne!(jar, b"stale jar".to_vec());
}
