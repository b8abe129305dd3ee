// --- FILE: dirtree-lib/src/lib.rs ---

#![doc = include_str!("../README.md")]

// Declare modules
mod config;
mod errors;
mod ignore;
mod job;
mod markdown;
mod processing;
mod tree;
mod utils;

// Public API
pub use config::{StructureConfig, DEFAULT_PREVIEW_LINES, DEFAULT_PROGRESS_INTERVAL};
pub use errors::{TreeError, TreeResult};
pub use ignore::{filter_paths, filter_paths_with_progress, IgnoreSet, BUILTIN_IGNORES};
pub use job::{JobEvent, StructureJob};
pub use markdown::{output_file_name, render_as_markdown, DOCUMENT_HEADING};
pub use processing::{
    build_structure, filter_and_build_structure, truncate_preview, RunContext, Structure,
};
pub use tree::{build_tree, prune_tree, render_structure_lines, render_tree, TreeNode};
pub use utils::first_segment;
