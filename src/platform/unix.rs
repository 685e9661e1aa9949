use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{BestEffort, PlatformOps, filesystem_root, restrict_posix};

const HIDDEN_MARKER: u8 = b'.';

/// Linux and other Unix systems: hidden means a leading dot in the name.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unix;

impl PlatformOps for Unix {
    fn family(&self) -> &'static str {
        "unix"
    }

    fn search_roots(&self) -> Box<dyn Iterator<Item = PathBuf>> {
        filesystem_root()
    }

    fn hide(&self, path: &Path) -> BestEffort<PathBuf> {
        match hide_with_dot_prefix(path) {
            Ok(Some(hidden)) => {
                debug!(from = %path.display(), to = %hidden.display(), "hid directory");
                BestEffort::applied(hidden)
            }
            Ok(None) => BestEffort::skipped(path.to_path_buf(), "already hidden"),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not hide path");
                BestEffort::failed(path.to_path_buf(), err.to_string())
            }
        }
    }

    fn restrict_to_owner(&self, path: &Path) -> BestEffort<()> {
        restrict_posix(path)
    }
}

/// Rename `path` to its dotted sibling. `Ok(None)` means it was already hidden.
///
/// When the dotted sibling already exists the directory is left in place and a
/// directory of the same name is created inside the sibling instead, so the
/// returned path is one level deeper (`foo` -> `.foo/foo`).
fn hide_with_dot_prefix(path: &Path) -> io::Result<Option<PathBuf>> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no final component"))?;

    if name.as_encoded_bytes().first() == Some(&HIDDEN_MARKER) {
        return Ok(None);
    }

    let mut hidden_name = OsString::from(".");
    hidden_name.push(name);
    let hidden = path.with_file_name(&hidden_name);

    if hidden.exists() {
        let nested = hidden.join(name);
        fs::create_dir_all(&nested)?;
        return Ok(Some(nested));
    }

    fs::rename(path, &hidden)?;
    Ok(Some(hidden))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Outcome;
    use crate::testutil::unique_temp_dir;

    #[test]
    fn hide_renames_to_dotted_sibling() {
        let root = unique_temp_dir();
        let dir = root.join("foo");
        fs::create_dir_all(&dir).unwrap();

        let result = Unix.hide(&dir);
        assert_eq!(result.outcome, Outcome::Applied);
        assert_eq!(result.value, root.join(".foo"));
        assert!(root.join(".foo").is_dir());
        assert!(!dir.exists());

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn hide_is_noop_for_dotted_name() {
        let root = unique_temp_dir();
        let dir = root.join(".foo");
        fs::create_dir_all(&dir).unwrap();

        let result = Unix.hide(&dir);
        assert!(matches!(result.outcome, Outcome::Skipped(_)));
        assert_eq!(result.value, dir);
        assert!(dir.is_dir());

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn hide_nests_inside_existing_hidden_sibling() {
        let root = unique_temp_dir();
        let dir = root.join("foo");
        let existing = root.join(".foo");
        fs::create_dir_all(&dir).unwrap();
        fs::create_dir_all(&existing).unwrap();
        fs::write(existing.join("keep.txt"), "keep").unwrap();

        let result = Unix.hide(&dir);
        assert_eq!(result.outcome, Outcome::Applied);
        assert_eq!(result.value, existing.join("foo"));
        assert!(existing.join("foo").is_dir());
        assert_eq!(fs::read_to_string(existing.join("keep.txt")).unwrap(), "keep");
        // original stays where it was
        assert!(dir.is_dir());

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn hide_failure_returns_original_path() {
        let root = unique_temp_dir();
        let missing = root.join("missing");

        let result = Unix.hide(&missing);
        assert!(result.outcome.is_failed());
        assert_eq!(result.value, missing);
    }

    #[cfg(unix)]
    #[test]
    fn restrict_sets_owner_only_mode() {
        use std::os::unix::fs::PermissionsExt;

        let root = unique_temp_dir();
        fs::create_dir_all(&root).unwrap();
        fs::set_permissions(&root, fs::Permissions::from_mode(0o755)).unwrap();

        let result = Unix.restrict_to_owner(&root);
        assert_eq!(result.outcome, Outcome::Applied);
        let mode = fs::metadata(&root).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o700);

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn search_roots_is_single_filesystem_root() {
        let roots: Vec<_> = Unix.search_roots().collect();
        assert_eq!(roots, vec![PathBuf::from("/")]);
    }
}
