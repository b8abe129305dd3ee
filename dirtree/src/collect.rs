use std::fs;
use std::path::{Component, Path};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use dirtree_lib::{IgnoreSet, BUILTIN_IGNORES};

/// Walks `target_path` and returns every file (and, if requested, every empty
/// directory) as `<root_folder_name>/<relative/path>` with `/` separators.
///
/// Entries are visited in file-name order so that repeated runs over the same
/// directory produce the same path list. Entries directly under the target
/// whose name is in `ignore_roots` are left out, since every collected path
/// starts with the root folder name and the library's first-segment filter
/// would never see them. Directories named in `skip_names` or in the built-in
/// ignore list are not descended into at any depth.
pub fn collect_paths(
    target_path: &Path,
    root_folder_name: &str,
    ignore_roots: &IgnoreSet,
    skip_names: &[String],
    include_empty_dirs: bool,
) -> Result<Vec<String>> {
    debug!("Collecting paths under {:?}", target_path);
    let mut paths = Vec::new();

    let walker = WalkDir::new(target_path)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_skipped(entry, ignore_roots, skip_names));

    for entry_result in walker {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(e) => {
                let path_display = e.path().map_or_else(
                    || target_path.display().to_string(),
                    |p| p.display().to_string(),
                );
                warn!("Skipping unreadable entry {}: {}", path_display, e);
                continue;
            }
        };

        // Directories only appear as leaves when they have nothing inside
        if entry.file_type().is_dir() && !(include_empty_dirs && is_empty_dir(entry.path())) {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(target_path)
            .with_context(|| format!("Walked outside of {:?}: {:?}", target_path, entry.path()))?;
        paths.push(join_segments(root_folder_name, relative));
    }

    info!("Collected {} paths from {:?}", paths.len(), target_path);
    Ok(paths)
}

/// Name shown as the first line of the tree: the final component of the
/// (canonical) target path, or the path itself for filesystem roots.
pub fn root_folder_name(target_path: &Path) -> String {
    target_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| target_path.display().to_string())
}

fn is_skipped(entry: &DirEntry, ignore_roots: &IgnoreSet, skip_names: &[String]) -> bool {
    let name = entry.file_name().to_string_lossy();
    let skipped = (entry.depth() == 1 && ignore_roots.contains(&name))
        || BUILTIN_IGNORES.iter().any(|builtin| *builtin == name)
        || skip_names.iter().any(|skip| *skip == name);
    if skipped {
        debug!("Not descending into {:?}", entry.path());
    }
    skipped
}

fn is_empty_dir(path: &Path) -> bool {
    match fs::read_dir(path) {
        Ok(mut entries) => entries.next().is_none(),
        Err(e) => {
            warn!("Could not read directory {:?}: {}", path, e);
            false
        }
    }
}

fn join_segments(root_folder_name: &str, relative: &Path) -> String {
    let mut joined = String::from(root_folder_name);
    for component in relative.components() {
        if let Component::Normal(segment) = component {
            joined.push('/');
            joined.push_str(&segment.to_string_lossy());
        }
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn setup_test_dir() -> Result<TempDir> {
        let dir = tempdir()?;
        let path = dir.path();

        fs::create_dir_all(path.join("src/nested"))?;
        fs::write(path.join("src/main.rs"), "fn main() {}")?;
        fs::write(path.join("src/nested/lib.rs"), "")?;
        fs::write(path.join("README.md"), "# readme")?;
        fs::create_dir_all(path.join("node_modules/pkg"))?;
        fs::write(path.join("node_modules/pkg/index.js"), "")?;
        fs::create_dir_all(path.join(".git"))?;
        fs::write(path.join(".git/HEAD"), "ref: refs/heads/main")?;
        fs::create_dir_all(path.join("target/debug"))?;
        fs::write(path.join("target/debug/app"), "")?;
        fs::create_dir(path.join("empty"))?;

        Ok(dir)
    }

    #[test]
    fn collects_sorted_prefixed_paths() -> Result<()> {
        let dir = setup_test_dir()?;
        let paths = collect_paths(dir.path(), "proj", &IgnoreSet::new(), &[], true)?;
        assert_eq!(
            paths,
            vec![
                "proj/README.md",
                "proj/empty",
                "proj/src/main.rs",
                "proj/src/nested/lib.rs",
                "proj/target/debug/app",
            ]
        );
        Ok(())
    }

    #[test]
    fn skip_names_and_empty_dirs_option() -> Result<()> {
        let dir = setup_test_dir()?;
        let paths = collect_paths(
            dir.path(),
            "proj",
            &IgnoreSet::new(),
            &["target".to_string()],
            false,
        )?;
        assert_eq!(
            paths,
            vec!["proj/README.md", "proj/src/main.rs", "proj/src/nested/lib.rs"]
        );
        Ok(())
    }

    #[test]
    fn ignore_roots_only_match_directly_under_target() -> Result<()> {
        let dir = setup_test_dir()?;
        fs::create_dir_all(dir.path().join("src/target"))?;
        fs::write(dir.path().join("src/target/kept.rs"), "")?;

        let ignore: IgnoreSet = ["target", "README.md"].into_iter().collect();
        let paths = collect_paths(dir.path(), "proj", &ignore, &[], false)?;
        assert_eq!(
            paths,
            vec![
                "proj/src/main.rs",
                "proj/src/nested/lib.rs",
                "proj/src/target/kept.rs",
            ]
        );
        Ok(())
    }

    #[test]
    fn root_name_is_last_component() {
        assert_eq!(root_folder_name(Path::new("/home/me/proj")), "proj");
        assert_eq!(root_folder_name(Path::new("/")), "/");
    }

    #[test]
    fn joins_with_forward_slashes() {
        let relative: std::path::PathBuf = ["a", "b", "c.txt"].iter().collect();
        assert_eq!(join_segments("root", &relative), "root/a/b/c.txt");
    }
}
