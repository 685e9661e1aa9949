use std::fs;
use std::path::PathBuf;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

use crate::error::EngineError;
use crate::provision::validate_name;

pub const DEFAULT_TARGET_NAME: &str = "Devicedatauserlxmoll";
pub const DEFAULT_SUBDIRS: [&str; 3] = ["cache", "v1", "tmp"];
pub const DEFAULT_MAX_RESULTS: usize = 50;

/// Every parameter the engine runs with.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EngineConfig {
    pub target_name: String,
    pub subdirs: Vec<String>,
    pub hide: bool,
    pub prefer_app_data: bool,
    pub owner_only: bool,
    /// Zero means unbounded.
    pub max_results: usize,
    /// Roots to scan instead of the platform's.
    pub search_roots: Option<Vec<PathBuf>>,
    /// Base directory to create under instead of the resolved one.
    pub base_dir: Option<PathBuf>,
    pub dry_run: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_name: DEFAULT_TARGET_NAME.to_owned(),
            subdirs: DEFAULT_SUBDIRS.iter().map(|s| (*s).to_owned()).collect(),
            hide: false,
            prefer_app_data: false,
            owner_only: false,
            max_results: DEFAULT_MAX_RESULTS,
            search_roots: None,
            base_dir: None,
            dry_run: false,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        validate_name(&self.target_name)?;
        for sub in &self.subdirs {
            validate_name(sub)?;
        }
        Ok(())
    }

    /// Overlay values present in a config file onto `self`.
    pub fn apply_file(&mut self, file: FileConfig) {
        if let Some(name) = file.name {
            self.target_name = name;
        }
        if let Some(subdirs) = file.subdirs {
            self.subdirs = subdirs;
        }
        if let Some(hide) = file.hide {
            self.hide = hide;
        }
        if let Some(prefer) = file.prefer_app_data {
            self.prefer_app_data = prefer;
        }
        if let Some(owner_only) = file.owner_only {
            self.owner_only = owner_only;
        }
        if let Some(max) = file.max_results {
            self.max_results = max;
        }
        if let Some(roots) = file.search_roots {
            self.search_roots = Some(roots.into_iter().map(PathBuf::from).collect());
        }
        if let Some(base) = file.base_dir {
            self.base_dir = Some(base.into_std_path_buf());
        }
    }
}

/// On-disk configuration, `~/.devdata/config.toml` by default. All keys optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub name: Option<String>,
    pub subdirs: Option<Vec<String>>,
    pub hide: Option<bool>,
    pub prefer_app_data: Option<bool>,
    pub owner_only: Option<bool>,
    pub max_results: Option<usize>,
    pub search_roots: Option<Vec<Utf8PathBuf>>,
    pub base_dir: Option<Utf8PathBuf>,
}

/// Load a configuration file from disk and deserialize it.
pub fn load_from_path(path: &Utf8Path) -> Result<FileConfig, EngineError> {
    let wrap = |source: Box<dyn std::error::Error + Send + Sync>| EngineError::Config {
        path: path.to_string(),
        source,
    };
    let raw = fs::read_to_string(path).map_err(|err| wrap(Box::new(err)))?;
    toml::from_str(&raw).map_err(|err| wrap(Box::new(err)))
}

/// `~/.devdata/config.toml`, if the home directory is known and UTF-8.
pub fn default_path() -> Option<Utf8PathBuf> {
    let mut path = dirs::home_dir()?;
    path.push(".devdata");
    path.push("config.toml");
    Utf8PathBuf::from_path_buf(path).ok()
}
