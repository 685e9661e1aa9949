//! Platform strategies for root enumeration, hiding, and permission tightening.
//!
//! One [`PlatformOps`] implementation is picked by [`detect`] at startup; the
//! engine never branches on the target OS itself.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::warn;

mod macos;
mod unix;
mod windows;

pub use self::macos::MacOs;
pub use self::unix::Unix;
pub use self::windows::Windows;

/// Mode applied by [`PlatformOps::restrict_to_owner`] on POSIX systems.
pub const OWNER_ONLY_MODE: u32 = 0o700;

/// How a best-effort step ended.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum Outcome {
    Applied,
    Skipped(String),
    Failed(String),
}

impl Outcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Applied => f.write_str("applied"),
            Outcome::Skipped(reason) => write!(f, "skipped ({reason})"),
            Outcome::Failed(reason) => write!(f, "failed ({reason})"),
        }
    }
}

/// Result of a step that records failure instead of raising it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BestEffort<T> {
    pub value: T,
    pub outcome: Outcome,
}

impl<T> BestEffort<T> {
    pub fn applied(value: T) -> Self {
        Self {
            value,
            outcome: Outcome::Applied,
        }
    }

    pub fn skipped(value: T, reason: impl Into<String>) -> Self {
        Self {
            value,
            outcome: Outcome::Skipped(reason.into()),
        }
    }

    pub fn failed(value: T, reason: impl Into<String>) -> Self {
        Self {
            value,
            outcome: Outcome::Failed(reason.into()),
        }
    }
}

/// Operations whose behavior depends on the running platform family.
pub trait PlatformOps {
    /// Short family name used in logs and reports.
    fn family(&self) -> &'static str;

    /// Filesystem roots to scan, evaluated lazily.
    fn search_roots(&self) -> Box<dyn Iterator<Item = PathBuf>>;

    /// Per-user application-data directory, when the platform has one.
    fn app_data_dir(&self) -> Option<PathBuf> {
        None
    }

    /// Hide `path` from casual listing. Returns the path the directory now lives at.
    fn hide(&self, path: &Path) -> BestEffort<PathBuf>;

    /// Limit access to `path` to its owning account.
    fn restrict_to_owner(&self, path: &Path) -> BestEffort<()>;
}

/// Select the strategy for the platform this binary was built for.
pub fn detect() -> Box<dyn PlatformOps> {
    if cfg!(windows) {
        Box::new(Windows)
    } else if cfg!(target_os = "macos") {
        Box::new(MacOs)
    } else {
        Box::new(Unix)
    }
}

/// The single top-level root used by every non drive-letter platform.
fn filesystem_root() -> Box<dyn Iterator<Item = PathBuf>> {
    Box::new(std::iter::once(PathBuf::from("/")))
}

#[cfg(unix)]
fn restrict_posix(path: &Path) -> BestEffort<()> {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    match fs::set_permissions(path, fs::Permissions::from_mode(OWNER_ONLY_MODE)) {
        Ok(()) => BestEffort::applied(()),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "chmod failed");
            BestEffort::failed((), err.to_string())
        }
    }
}

#[cfg(not(unix))]
fn restrict_posix(path: &Path) -> BestEffort<()> {
    warn!(path = %path.display(), "POSIX permissions are not available on this build");
    BestEffort::skipped((), "POSIX permissions are not available on this build")
}
