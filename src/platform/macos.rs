use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::warn;

use super::{BestEffort, PlatformOps, filesystem_root, restrict_posix};

/// macOS: Finder honours the `hidden` file flag, set through `chflags`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MacOs;

impl PlatformOps for MacOs {
    fn family(&self) -> &'static str {
        "macos"
    }

    fn search_roots(&self) -> Box<dyn Iterator<Item = PathBuf>> {
        filesystem_root()
    }

    fn hide(&self, path: &Path) -> BestEffort<PathBuf> {
        let original = path.to_path_buf();
        match Command::new("chflags").arg("hidden").arg(path).status() {
            Ok(status) if status.success() => BestEffort::applied(original),
            Ok(status) => {
                warn!(path = %path.display(), code = ?status.code(), "chflags exited with failure");
                BestEffort::failed(original, format!("chflags exited with {status}"))
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not run chflags");
                BestEffort::failed(original, err.to_string())
            }
        }
    }

    fn restrict_to_owner(&self, path: &Path) -> BestEffort<()> {
        restrict_posix(path)
    }
}
