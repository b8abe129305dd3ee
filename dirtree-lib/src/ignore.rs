// --- FILE: dirtree-lib/src/ignore.rs ---

use std::collections::HashSet;

use log::{debug, trace};

use crate::utils::{first_segment, percent_complete};

/// Names that are always excluded, regardless of user configuration.
pub const BUILTIN_IGNORES: [&str; 3] = ["node_modules", ".git", ".DS_Store"];

/// Set of segment names whose top-level subtrees are excluded from a run.
///
/// Matching is exact and case-sensitive. The built-in names are always
/// members; user names are added on top of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreSet {
    names: HashSet<String>,
}

impl Default for IgnoreSet {
    fn default() -> Self {
        Self::new()
    }
}

impl IgnoreSet {
    /// Creates a set holding only the built-in names.
    pub fn new() -> Self {
        Self {
            names: BUILTIN_IGNORES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Adds a name verbatim. Returns `true` if it was not already present.
    pub fn insert<S: Into<String>>(&mut self, name: S) -> bool {
        self.names.insert(name.into())
    }

    /// Adds the first segment of a user-selected path, so that picking
    /// `dist/assets/app.js` ignores `dist`.
    pub fn insert_from_path(&mut self, path: &str) -> bool {
        let name = first_segment(path);
        let added = self.names.insert(name.to_string());
        if added {
            debug!("Ignoring root folder '{}' (from '{}')", name, path);
        }
        added
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// User-supplied names, i.e. everything except the built-ins, sorted.
    pub fn user_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .names
            .iter()
            .map(String::as_str)
            .filter(|n| !BUILTIN_IGNORES.contains(n))
            .collect();
        names.sort_unstable();
        names
    }
}

impl<S: AsRef<str>> FromIterator<S> for IgnoreSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = IgnoreSet::new();
        for path in iter {
            set.insert_from_path(path.as_ref());
        }
        set
    }
}

/// Keeps the paths whose first segment is not in `ignore`.
pub fn filter_paths<S: AsRef<str>>(paths: &[S], ignore: &IgnoreSet) -> Vec<String> {
    filter_paths_with_progress(paths, ignore, usize::MAX, |_| {})
}

/// Same as [`filter_paths`], reporting completion percentage through
/// `on_progress` after every `interval` paths and after the last one.
pub fn filter_paths_with_progress<S, F>(
    paths: &[S],
    ignore: &IgnoreSet,
    interval: usize,
    mut on_progress: F,
) -> Vec<String>
where
    S: AsRef<str>,
    F: FnMut(u8),
{
    let interval = interval.max(1);
    let total = paths.len();
    let mut kept = Vec::with_capacity(total);

    for (index, path) in paths.iter().enumerate() {
        let path = path.as_ref();
        if ignore.contains(first_segment(path)) {
            trace!("Filtered out '{}'", path);
        } else {
            kept.push(path.to_string());
        }

        let done = index + 1;
        if done % interval == 0 || done == total {
            on_progress(percent_complete(done, total));
        }
    }

    debug!(
        "Kept {} of {} paths after root filtering",
        kept.len(),
        total
    );
    kept
}
