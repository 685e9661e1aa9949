use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Directory creation under the resolved base failed.
#[derive(Debug, Error)]
#[error("failed to create directory chain {path}")]
pub struct ProvisionError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Reading or creating the user-data file failed.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read user data from {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to create user data at {path}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Hard failures surfaced by the engine. Best-effort steps never end up here.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid directory name `{name}`: {reason}")]
    InvalidName { name: String, reason: &'static str },
    #[error(transparent)]
    Provision(#[from] ProvisionError),
    #[error(transparent)]
    UserData(#[from] SeedError),
    #[error("failed to load config {path}")]
    Config {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
