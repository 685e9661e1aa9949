use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::{BestEffort, PlatformOps};

/// Windows: drive-letter roots, the hidden attribute, and `%APPDATA%`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Windows;

impl PlatformOps for Windows {
    fn family(&self) -> &'static str {
        "windows"
    }

    fn search_roots(&self) -> Box<dyn Iterator<Item = PathBuf>> {
        Box::new(
            (b'A'..=b'Z')
                .map(|letter| PathBuf::from(format!("{}:\\", letter as char)))
                .filter(|root| root.exists()),
        )
    }

    fn app_data_dir(&self) -> Option<PathBuf> {
        first_non_empty([
            std::env::var_os("APPDATA"),
            std::env::var_os("LOCALAPPDATA"),
        ])
        .or_else(dirs::data_dir)
    }

    fn hide(&self, path: &Path) -> BestEffort<PathBuf> {
        let original = path.to_path_buf();
        match set_hidden_attribute(path) {
            Ok(()) => BestEffort::applied(original),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not set hidden attribute");
                BestEffort::failed(original, err.to_string())
            }
        }
    }

    fn restrict_to_owner(&self, path: &Path) -> BestEffort<()> {
        info!(path = %path.display(), "ACLs left unchanged; use icacls to restrict access manually");
        BestEffort::skipped((), "ACLs not modified; configure with icacls if needed")
    }
}

/// First value that is both set and non-empty, in order.
fn first_non_empty<I>(values: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = Option<OsString>>,
{
    values
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty())
        .map(PathBuf::from)
}

#[cfg(windows)]
fn set_hidden_attribute(path: &Path) -> io::Result<()> {
    use std::os::windows::ffi::OsStrExt;

    use ::windows::Win32::Storage::FileSystem::{
        FILE_ATTRIBUTE_HIDDEN, FILE_FLAGS_AND_ATTRIBUTES, GetFileAttributesW, SetFileAttributesW,
    };
    use ::windows::core::PCWSTR;

    let wide: Vec<u16> = path
        .as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();
    let name = PCWSTR(wide.as_ptr());

    unsafe {
        let current = GetFileAttributesW(name);
        if current == u32::MAX {
            return Err(io::Error::last_os_error());
        }
        SetFileAttributesW(name, FILE_FLAGS_AND_ATTRIBUTES(current) | FILE_ATTRIBUTE_HIDDEN)
            .map_err(io::Error::other)
    }
}

#[cfg(not(windows))]
fn set_hidden_attribute(_path: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "hidden attribute is only available on Windows",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Outcome;

    #[cfg(windows)]
    #[test]
    fn drive_roots_are_existing_letters_in_order() {
        let roots: Vec<PathBuf> = Windows.search_roots().collect();
        assert!(!roots.is_empty());
        for root in &roots {
            assert!(root.exists());
            let text = root.to_string_lossy().into_owned();
            assert_eq!(text.len(), 3);
            assert!(text.ends_with(":\\"));
        }
        let mut sorted = roots.clone();
        sorted.sort();
        assert_eq!(roots, sorted);
    }

    #[test]
    fn empty_app_data_falls_through_to_local_app_data() {
        let picked = first_non_empty([Some(OsString::new()), Some(OsString::from("C:\\Local"))]);
        assert_eq!(picked, Some(PathBuf::from("C:\\Local")));

        let picked = first_non_empty([None, Some(OsString::from("C:\\Local"))]);
        assert_eq!(picked, Some(PathBuf::from("C:\\Local")));

        let picked = first_non_empty([Some(OsString::from("C:\\Roaming")), Some(OsString::from("C:\\Local"))]);
        assert_eq!(picked, Some(PathBuf::from("C:\\Roaming")));

        assert_eq!(first_non_empty([Some(OsString::new()), None]), None);
    }

    #[test]
    fn restrict_leaves_acls_alone() {
        let dir = crate::testutil::unique_temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        let before = std::fs::metadata(&dir).unwrap().permissions();

        let result = Windows.restrict_to_owner(&dir);
        assert!(matches!(result.outcome, Outcome::Skipped(_)));
        assert_eq!(std::fs::metadata(&dir).unwrap().permissions(), before);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(not(windows))]
    #[test]
    fn hide_reports_failure_off_windows() {
        let dir = PathBuf::from("/tmp/does-not-matter");
        let result = Windows.hide(&dir);
        assert!(result.outcome.is_failed());
        assert_eq!(result.value, dir);
    }
}
