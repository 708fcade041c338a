//! Package configuration: what to collect and how to lay it out

use crate::error::{PackError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the optional per-project configuration file.
pub const CONFIG_FILE_NAME: &str = "xpipack.json";

pub const DEFAULT_DESTINATION: &str = "fastprevnext.xpi";
pub const DEFAULT_JAR_NAME: &str = "chrome.jar";
pub const DEFAULT_MANIFEST: &str = "chrome.manifest";

const FLAT_ENTRY_SCRIPTS: &[&str] = &["bootstrap.js", "loader.jsm"];

const FLAT_RESOURCES: &[&str] = &[
    "install.rdf",
    "chrome.manifest",
    "*.xul",
    "*.css",
    "locale/*/*.dtd",
    "locale/*/*.properties",
    "defaults/preferences/prefs.js",
    "icon.png",
    "icon64.png",
    "arrows.png",
    "LICENSE",
];

const NESTED_CHROME: &[&str] = &[
    "content/*.js",
    "content/*.xul",
    "content/*.css",
    "content/arrows.png",
    "locale/*/*.dtd",
    "locale/*/*.properties",
];

const NESTED_RESOURCES: &[&str] = &[
    "modules/*.jsm",
    "icon.png",
    "icon64.png",
    "install.rdf",
];

/// What happens when a pattern resolves to no file at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedPolicy {
    /// Abort the build.
    Error,
    /// Log a warning and list the pattern in the build result.
    #[default]
    Warn,
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum LayoutKind {
    Flat,
    Nested,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    /// Every file stored uncompressed directly in the outer archive.
    Flat { resources: Vec<String> },
    /// Chrome files packed into an inner jar, the manifest rewritten to
    /// point into it.
    Nested {
        jar_name: String,
        manifest: String,
        chrome: Vec<String>,
        resources: Vec<String>,
    },
}

impl Layout {
    pub fn kind(&self) -> LayoutKind {
        match self {
            Layout::Flat { .. } => LayoutKind::Flat,
            Layout::Nested { .. } => LayoutKind::Nested,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageConfig {
    /// Source directory; every pattern and entry script is relative to it.
    pub root: PathBuf,
    pub destination: PathBuf,
    /// Scripts whose `require` graph is scanned for additional files.
    pub entry_scripts: Vec<String>,
    pub unmatched: UnmatchedPolicy,
    pub layout: Layout,
}

/// Overrides read from `xpipack.json`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub layout: Option<LayoutKind>,
    pub destination: Option<PathBuf>,
    pub entry_scripts: Option<Vec<String>>,
    pub unmatched: Option<UnmatchedPolicy>,
    pub resources: Option<Vec<String>>,
    pub chrome: Option<Vec<String>>,
    pub jar_name: Option<String>,
    pub manifest: Option<String>,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl PackageConfig {
    /// Flat layout with the built-in resource list.
    pub fn flat_default(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            destination: PathBuf::from(DEFAULT_DESTINATION),
            entry_scripts: owned(FLAT_ENTRY_SCRIPTS),
            unmatched: UnmatchedPolicy::default(),
            layout: Layout::Flat {
                resources: owned(FLAT_RESOURCES),
            },
        }
    }

    /// Nested layout with the built-in chrome and resource lists.
    pub fn nested_default(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            destination: PathBuf::from(DEFAULT_DESTINATION),
            entry_scripts: Vec::new(),
            unmatched: UnmatchedPolicy::default(),
            layout: Layout::Nested {
                jar_name: DEFAULT_JAR_NAME.to_string(),
                manifest: DEFAULT_MANIFEST.to_string(),
                chrome: owned(NESTED_CHROME),
                resources: owned(NESTED_RESOURCES),
            },
        }
    }

    pub fn defaults_for(kind: LayoutKind, root: impl Into<PathBuf>) -> Self {
        match kind {
            LayoutKind::Flat => Self::flat_default(root),
            LayoutKind::Nested => Self::nested_default(root),
        }
    }

    /// Build the configuration for `root`.
    ///
    /// Reads `config_path` if given (it must exist), otherwise
    /// `root/xpipack.json` when present. An explicit `layout` wins over
    /// the file's; with neither, the flat layout is used.
    pub fn load(
        root: &Path,
        config_path: Option<&Path>,
        layout: Option<LayoutKind>,
    ) -> Result<Self> {
        let file = match config_path {
            Some(path) => Some((path.to_path_buf(), read_config_file(path)?)),
            None => {
                let path = root.join(CONFIG_FILE_NAME);
                if path.is_file() {
                    let file = read_config_file(&path)?;
                    Some((path, file))
                } else {
                    None
                }
            }
        };

        let kind = layout
            .or_else(|| file.as_ref().and_then(|(_, f)| f.layout))
            .unwrap_or(LayoutKind::Flat);
        let config = Self::defaults_for(kind, root);

        match file {
            Some((path, file)) => config.with_overrides(&path, file),
            None => Ok(config),
        }
    }

    fn with_overrides(mut self, path: &Path, file: ConfigFile) -> Result<Self> {
        if let Some(destination) = file.destination {
            self.destination = destination;
        }
        if let Some(entry_scripts) = file.entry_scripts {
            self.entry_scripts = entry_scripts;
        }
        if let Some(unmatched) = file.unmatched {
            self.unmatched = unmatched;
        }

        match &mut self.layout {
            Layout::Flat { resources } => {
                if file.chrome.is_some() || file.jar_name.is_some() || file.manifest.is_some() {
                    return Err(PackError::Config {
                        path: path.to_path_buf(),
                        message: "chrome, jar_name and manifest require the nested layout"
                            .to_string(),
                    });
                }
                if let Some(list) = file.resources {
                    *resources = list;
                }
            }
            Layout::Nested {
                jar_name,
                manifest,
                chrome,
                resources,
            } => {
                if let Some(name) = file.jar_name {
                    *jar_name = name;
                }
                if let Some(name) = file.manifest {
                    *manifest = name;
                }
                if let Some(list) = file.chrome {
                    *chrome = list;
                }
                if let Some(list) = file.resources {
                    *resources = list;
                }
            }
        }

        Ok(self)
    }

    /// Destination resolved against the source root.
    pub fn destination_path(&self) -> PathBuf {
        self.root.join(&self.destination)
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).map_err(|e| PackError::open(path, e))?;
    json5::from_str(&content).map_err(|e| PackError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
