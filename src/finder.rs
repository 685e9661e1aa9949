use std::ffi::OsStr;
use std::fs;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Search every root, in order, for directories named `target_name`.
///
/// Unreadable directories are skipped. A `max_results` of zero means no cap;
/// otherwise the walk stops as soon as the cap is reached, even mid-root.
pub fn find<I>(target_name: &str, roots: I, max_results: usize) -> Vec<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    let target = OsStr::new(target_name);
    let mut matches = Vec::new();

    for root in roots {
        debug!(root = %root.display(), "searching");
        if walk_root(&root, target, max_results, &mut matches).is_break() {
            break;
        }
    }

    matches
}

/// Top-down walk: every child of a directory is checked before any of them
/// is descended into. Symlinked directories are not followed.
fn walk_root(
    root: &Path,
    target: &OsStr,
    max_results: usize,
    matches: &mut Vec<PathBuf>,
) -> ControlFlow<()> {
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(path = %dir.display(), error = %err, "skipping unreadable directory");
                continue;
            }
        };

        let mut subdirs: Vec<_> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .collect();
        subdirs.sort_by_key(|e| e.file_name());

        for entry in &subdirs {
            if entry.file_name().as_os_str() == target {
                matches.push(entry.path());
                if max_results > 0 && matches.len() >= max_results {
                    return ControlFlow::Break(());
                }
            }
        }

        // reversed so the stack pops them in sorted order
        pending.extend(subdirs.iter().rev().map(|e| e.path()));
    }

    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::unique_temp_dir;

    fn layout(root: &Path) {
        for dir in ["a/x/needle", "b/needle/needle", "c/deep/er/needle"] {
            fs::create_dir_all(root.join(dir)).unwrap();
        }
        fs::write(root.join("a").join("needle"), "a file, not a directory").unwrap();
    }

    #[test]
    fn finds_every_matching_directory() {
        let root = unique_temp_dir();
        layout(&root);

        let found = find("needle", vec![root.clone()], 0);
        assert_eq!(
            found,
            vec![
                root.join("a/x/needle"),
                root.join("b/needle"),
                root.join("b/needle/needle"),
                root.join("c/deep/er/needle"),
            ]
        );

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn stops_at_max_results() {
        let root = unique_temp_dir();
        layout(&root);

        let found = find("needle", vec![root.clone()], 1);
        assert_eq!(found, vec![root.join("a/x/needle")]);

        let found = find("needle", vec![root.clone()], 2);
        assert_eq!(found.len(), 2);

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn combines_roots_and_skips_missing_ones() {
        let first = unique_temp_dir();
        let second = unique_temp_dir();
        fs::create_dir_all(first.join("one/needle")).unwrap();
        fs::create_dir_all(second.join("two/needle")).unwrap();

        let roots = vec![first.join("absent"), first.clone(), second.clone()];
        let found = find("needle", roots, 0);
        assert_eq!(found, vec![first.join("one/needle"), second.join("two/needle")]);

        let found = find("needle", vec![first.clone(), second.clone()], 1);
        assert_eq!(found, vec![first.join("one/needle")]);

        let _ = fs::remove_dir_all(&first);
        let _ = fs::remove_dir_all(&second);
    }

    #[test]
    fn empty_when_nothing_matches() {
        let root = unique_temp_dir();
        fs::create_dir_all(root.join("nothing/here")).unwrap();

        assert!(find("needle", vec![root.clone()], 50).is_empty());

        let _ = fs::remove_dir_all(&root);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_is_skipped_and_siblings_searched() {
        use std::os::unix::fs::PermissionsExt;

        let root = unique_temp_dir();
        fs::create_dir_all(root.join("a_locked/needle")).unwrap();
        fs::create_dir_all(root.join("b_open/needle")).unwrap();
        let locked = root.join("a_locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // privileged users can list it anyway
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            let _ = fs::remove_dir_all(&root);
            return;
        }

        let found = find("needle", vec![root.clone()], 0);
        assert_eq!(found, vec![root.join("b_open/needle")]);

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        let _ = fs::remove_dir_all(&root);
    }

    #[cfg(unix)]
    #[test]
    fn does_not_follow_symlinked_directories() {
        let root = unique_temp_dir();
        fs::create_dir_all(root.join("real/needle")).unwrap();
        std::os::unix::fs::symlink(root.join("real"), root.join("link")).unwrap();

        let found = find("needle", vec![root.clone()], 0);
        assert_eq!(found, vec![root.join("real/needle")]);

        let _ = fs::remove_dir_all(&root);
    }
}
