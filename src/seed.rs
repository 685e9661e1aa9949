use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::error::SeedError;
use crate::platform::BestEffort;

pub const MARKER_FILE: &str = "info.txt";
pub const MARKER_CONTENT: &str = "This folder was created by devdata\n";
pub const USER_DATA_FILE: &str = "userdata.txt";
pub const DEFAULT_USER_DATA: &str = "New userdata file created.\n";

/// Contents of `userdata.txt` and whether this call wrote it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct UserData {
    pub path: PathBuf,
    pub content: String,
    pub created: bool,
}

/// Drop the marker file into `dir`. Failure is logged and reported, never raised.
pub fn write_marker(dir: &Path) -> BestEffort<PathBuf> {
    let path = dir.join(MARKER_FILE);
    match fs::write(&path, MARKER_CONTENT) {
        Ok(()) => BestEffort::applied(path),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "could not write marker file");
            BestEffort::failed(path, err.to_string())
        }
    }
}

/// Return the contents of `dir/userdata.txt`, creating it with default content
/// first if it does not exist yet.
pub fn read_or_create_user_data(dir: &Path) -> Result<UserData, SeedError> {
    let path = dir.join(USER_DATA_FILE);

    if path.exists() {
        let content = fs::read_to_string(&path).map_err(|source| SeedError::Read {
            path: path.clone(),
            source,
        })?;
        return Ok(UserData {
            path,
            content,
            created: false,
        });
    }

    info!(path = %path.display(), "user data not found; creating it");
    let create = |source: std::io::Error| SeedError::Create {
        path: path.clone(),
        source,
    };
    fs::create_dir_all(dir).map_err(create)?;
    fs::write(&path, DEFAULT_USER_DATA).map_err(create)?;

    Ok(UserData {
        path,
        content: DEFAULT_USER_DATA.to_owned(),
        created: true,
    })
}
