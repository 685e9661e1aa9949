use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{EngineError, ProvisionError};
use crate::platform::PlatformOps;

/// Check that `name` is a single path component.
pub fn validate_name(name: &str) -> Result<(), EngineError> {
    let reason = if name.is_empty() {
        Some("name must not be empty")
    } else if name.contains(['/', '\\']) {
        Some("name must not contain path separators")
    } else if name == "." || name == ".." {
        Some("name must not be a relative path marker")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(EngineError::InvalidName {
            name: name.to_owned(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Pick the directory new structure is created under.
///
/// Home is the default. With `prefer_app_data` the platform's per-user
/// application-data directory wins when one is known.
pub fn resolve_base(platform: &dyn PlatformOps, prefer_app_data: bool) -> PathBuf {
    if prefer_app_data {
        match platform.app_data_dir() {
            Some(dir) => return dir,
            None => debug!(
                family = platform.family(),
                "no application-data directory; using home"
            ),
        }
    }

    dirs::home_dir().unwrap_or_else(|| {
        warn!("unable to determine home directory; using current directory");
        PathBuf::from(".")
    })
}

/// Join `root_name` and `subdirs` onto `base` without touching the disk.
pub fn chain_path<S: AsRef<str>>(base: &Path, root_name: &str, subdirs: &[S]) -> PathBuf {
    let mut path = base.join(root_name);
    for sub in subdirs {
        path.push(sub.as_ref());
    }
    path
}

/// Create `base/root_name/subdirs...`, including any missing parents.
///
/// Existing directories along the chain are accepted as-is, so repeated calls
/// return the same path. A non-directory occupying a segment is an error and is
/// left untouched.
pub fn provision<S: AsRef<str>>(
    base: &Path,
    root_name: &str,
    subdirs: &[S],
) -> Result<PathBuf, ProvisionError> {
    let path = chain_path(base, root_name, subdirs);
    fs::create_dir_all(&path).map_err(|source| ProvisionError {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
