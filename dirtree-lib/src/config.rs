// --- FILE: dirtree-lib/src/config.rs ---

use crate::ignore::IgnoreSet;

/// Number of lines kept in the preview before it is truncated.
pub const DEFAULT_PREVIEW_LINES: usize = 100;

/// Number of processed paths between two progress reports.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 100;

/// Configuration for one structure run.
///
/// This struct holds everything the pipeline needs besides the path list
/// itself. It is typically constructed by the calling application (e.g., the
/// CLI) from user input and configuration files.
#[derive(Debug, Clone)]
pub struct StructureConfig {
    /// Display name printed as the first line of the rendered tree. By
    /// convention it equals the first segment of every input path; this is
    /// not verified.
    pub root_folder_name: String,

    /// Names compared against the *first* segment of each path. Always
    /// contains the built-in names (see [`IgnoreSet`]).
    pub ignore: IgnoreSet,

    /// Additional names removed at every depth of the tree, on top of the
    /// built-in names.
    pub extra_prune: Vec<String>,

    /// Maximum number of lines in the preview text. A structure with more
    /// lines gets a truncated preview ending in a summary line.
    pub preview_lines: usize,

    /// Progress is reported every `progress_interval` paths and on the last
    /// one. `0` behaves like `1`.
    pub progress_interval: usize,
}

impl StructureConfig {
    /// Creates a configuration with the built-in ignore names and default
    /// preview and progress settings.
    pub fn new(root_folder_name: impl Into<String>) -> Self {
        Self {
            root_folder_name: root_folder_name.into(),
            ignore: IgnoreSet::new(),
            extra_prune: Vec::new(),
            preview_lines: DEFAULT_PREVIEW_LINES,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Adds user ignore roots, each reduced to its first segment.
    pub fn with_ignore_roots<I>(mut self, roots: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for root in roots {
            self.ignore.insert_from_path(root.as_ref());
        }
        self
    }

    /// Names pruned from the tree: the built-ins first, then any extra names
    /// not already covered.
    pub(crate) fn blocked_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = crate::ignore::BUILTIN_IGNORES.to_vec();
        for extra in &self.extra_prune {
            if !names.contains(&extra.as_str()) {
                names.push(extra.as_str());
            }
        }
        names
    }
}
