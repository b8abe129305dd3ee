// --- FILE: dirtree-lib/src/processing.rs ---

use log::{debug, info, warn};

use crate::config::StructureConfig;
use crate::errors::{TreeError, TreeResult};
use crate::ignore::{filter_paths_with_progress, IgnoreSet};
use crate::markdown::wrap_in_document;
use crate::tree::{build_tree, prune_tree, render_structure_lines};
use crate::utils::strip_root_segment;

/// Output of one run: the rendered structure and its preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Structure {
    root_folder_name: String,
    lines: Vec<String>,
    full_text: String,
    preview_text: String,
    truncated: bool,
}

impl Structure {
    fn from_lines(root_folder_name: &str, lines: Vec<String>, preview_limit: usize) -> Self {
        let full_text = lines.join("\n");
        let truncated = lines.len() > preview_limit;
        let preview_text = if truncated {
            truncate_preview(&lines, preview_limit)
        } else {
            full_text.clone()
        };
        Self {
            root_folder_name: root_folder_name.to_string(),
            lines,
            full_text,
            preview_text,
            truncated,
        }
    }

    pub fn root_folder_name(&self) -> &str {
        &self.root_folder_name
    }

    /// Rendered lines, starting with the root folder name.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// All lines joined with `\n`, no trailing newline.
    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    /// The full text, or its first lines plus a summary line if it is longer
    /// than the preview limit.
    pub fn preview_text(&self) -> &str {
        &self.preview_text
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Wraps the full text in the markdown document template. Any structure
    /// a run produced can be rendered, including one with an empty root name.
    pub fn to_markdown(&self) -> String {
        wrap_in_document(&self.full_text)
    }
}

/// First `limit` lines followed by `... (truncated, total N lines)`.
pub fn truncate_preview<S: AsRef<str>>(lines: &[S], limit: usize) -> String {
    let summary = format!("... (truncated, total {} lines)", lines.len());
    let mut preview: Vec<&str> = lines.iter().take(limit).map(|l| l.as_ref()).collect();
    preview.push(&summary);
    preview.join("\n")
}

/// Runs the whole pipeline: root filtering with progress, tree building,
/// pruning of the built-in names at every depth, and rendering.
///
/// `on_progress` receives completion percentages while the paths are being
/// filtered. The remaining stages run without further reports.
///
/// # Errors
///
/// Returns [`TreeError::MissingInput`] if `paths` is empty. No other input
/// fails; odd paths produce odd but well-defined trees.
pub fn filter_and_build_structure<S, R, F>(
    paths: &[S],
    user_ignore_roots: &[R],
    root_folder_name: &str,
    on_progress: F,
) -> TreeResult<Structure>
where
    S: AsRef<str>,
    R: AsRef<str>,
    F: FnMut(u8),
{
    let config = StructureConfig::new(root_folder_name).with_ignore_roots(user_ignore_roots);
    build_structure(paths, &config, on_progress)
}

/// [`filter_and_build_structure`] driven by a full [`StructureConfig`].
pub fn build_structure<S, F>(
    paths: &[S],
    config: &StructureConfig,
    on_progress: F,
) -> TreeResult<Structure>
where
    S: AsRef<str>,
    F: FnMut(u8),
{
    if paths.is_empty() {
        warn!("No paths given for '{}'", config.root_folder_name);
        return Err(TreeError::MissingInput);
    }
    info!(
        "Building structure for '{}' from {} paths",
        config.root_folder_name,
        paths.len()
    );
    debug!("User ignore roots: {:?}", config.ignore.user_names());

    // 1. Root-level filtering (the only stage that reports progress)
    let filtered = filter_paths_with_progress(
        paths,
        &config.ignore,
        config.progress_interval,
        on_progress,
    );

    // 2. Build below the root folder. The first segment is trusted to be the
    //    root folder name and is not checked.
    let mut root = build_tree(filtered.iter().filter_map(|p| strip_root_segment(p)));

    // 3. Prune blocked names at every depth
    for name in config.blocked_names() {
        let removed = prune_tree(&mut root, name);
        if removed > 0 {
            debug!("Pruned {} nested '{}' node(s)", removed, name);
        }
    }

    // 4. Render
    let lines = render_structure_lines(&config.root_folder_name, &root);
    let structure = Structure::from_lines(&config.root_folder_name, lines, config.preview_lines);
    info!(
        "Rendered {} lines{}",
        structure.line_count(),
        if structure.is_truncated() {
            " (preview truncated)"
        } else {
            ""
        }
    );
    Ok(structure)
}

/// Explicit state for one run: the input snapshot and, once processed, its
/// output. Hosts keep one of these instead of ambient UI state.
#[derive(Debug, Clone)]
pub struct RunContext {
    paths: Vec<String>,
    config: StructureConfig,
    output: Option<Structure>,
}

impl RunContext {
    pub fn new(paths: Vec<String>, config: StructureConfig) -> Self {
        Self {
            paths,
            config,
            output: None,
        }
    }

    /// Convenience constructor mirroring [`filter_and_build_structure`].
    pub fn with_ignore_roots<R: AsRef<str>>(
        paths: Vec<String>,
        user_ignore_roots: &[R],
        root_folder_name: &str,
    ) -> Self {
        let config = StructureConfig::new(root_folder_name).with_ignore_roots(user_ignore_roots);
        Self::new(paths, config)
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn config(&self) -> &StructureConfig {
        &self.config
    }

    pub fn ignore(&self) -> &IgnoreSet {
        &self.config.ignore
    }

    /// Runs the pipeline and stores its output. A failed run clears any
    /// previous output.
    pub fn process<F: FnMut(u8)>(&mut self, on_progress: F) -> TreeResult<&Structure> {
        self.output = None;
        let structure = build_structure(&self.paths, &self.config, on_progress)?;
        Ok(self.output.insert(structure))
    }

    pub fn output(&self) -> Option<&Structure> {
        self.output.as_ref()
    }

    /// Markdown document for the last successful run.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Precondition`] if [`RunContext::process`] has not
    /// produced a structure yet.
    pub fn markdown(&self) -> TreeResult<String> {
        match &self.output {
            Some(structure) => Ok(structure.to_markdown()),
            None => Err(TreeError::Precondition(
                "no structure has been generated yet".to_string(),
            )),
        }
    }

    /// Consumes the context, returning the output of the last run.
    pub fn into_output(self) -> Option<Structure> {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    const NO_IGNORES: [&str; 0] = [];

    fn scenario_paths() -> Vec<String> {
        [
            "proj/src/index.ts",
            "proj/src/util.ts",
            "proj/README.md",
            "proj/node_modules/pkg/index.js",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn renders_project_scenario() -> Result<()> {
        let structure =
            filter_and_build_structure(&scenario_paths(), &NO_IGNORES, "proj", |_| {})?;
        let expected = "proj\n\
                        ├── src\n\
                        │   ├── index.ts\n\
                        │   └── util.ts\n\
                        └── README.md";
        assert_eq!(structure.full_text(), expected);
        assert_eq!(structure.preview_text(), expected);
        assert!(!structure.is_truncated());
        assert_eq!(structure.line_count(), 5);
        Ok(())
    }

    #[test]
    fn output_is_deterministic() -> Result<()> {
        let paths = scenario_paths();
        let first = filter_and_build_structure(&paths, &["docs"], "proj", |_| {})?;
        let second = filter_and_build_structure(&paths, &["docs"], "proj", |_| {})?;
        assert_eq!(first.full_text().as_bytes(), second.full_text().as_bytes());
        Ok(())
    }

    #[test]
    fn nested_builtin_is_pruned_at_any_depth() -> Result<()> {
        let paths = ["proj/a/node_modules/b/c", "proj/a/x.js", "proj/a/b/.git/HEAD"];
        let structure = filter_and_build_structure(&paths, &NO_IGNORES, "proj", |_| {})?;
        assert_eq!(
            structure.lines(),
            &["proj", "└── a", "    ├── x.js", "    └── b"]
        );
        Ok(())
    }

    #[test]
    fn user_roots_match_first_segment_only() -> Result<()> {
        let paths = ["proj/dist/app.js", "dist/bundle.js", "proj/src/main.ts"];
        let structure = filter_and_build_structure(&paths, &["dist/"], "proj", |_| {})?;
        // `proj/dist` survives: its first segment is `proj`
        assert_eq!(
            structure.lines(),
            &["proj", "├── dist", "│   └── app.js", "└── src", "    └── main.ts"]
        );
        Ok(())
    }

    #[test]
    fn extra_prune_names_apply_at_every_depth() -> Result<()> {
        let mut config = StructureConfig::new("proj");
        config.extra_prune = vec!["target".to_string()];
        let paths = ["proj/target/debug/app", "proj/crates/a/target/x", "proj/Cargo.toml"];
        let structure = build_structure(&paths, &config, |_| {})?;
        assert_eq!(
            structure.lines(),
            &["proj", "├── crates", "│   └── a", "└── Cargo.toml"]
        );
        Ok(())
    }

    #[test]
    fn order_follows_input() -> Result<()> {
        let paths = ["proj/src/y.ts", "proj/src/x.ts"];
        let structure = filter_and_build_structure(&paths, &NO_IGNORES, "proj", |_| {})?;
        assert_eq!(
            structure.lines(),
            &["proj", "└── src", "    ├── y.ts", "    └── x.ts"]
        );
        Ok(())
    }

    #[test]
    fn bare_root_path_contributes_no_node() -> Result<()> {
        let structure = filter_and_build_structure(&["proj"], &NO_IGNORES, "proj", |_| {})?;
        assert_eq!(structure.full_text(), "proj");
        Ok(())
    }

    #[test]
    fn empty_input_is_missing_input() {
        let paths: [&str; 0] = [];
        let mut called = false;
        let result = filter_and_build_structure(&paths, &NO_IGNORES, "proj", |_| called = true);
        assert!(matches!(result, Err(TreeError::MissingInput)));
        assert!(!called);
    }

    #[test]
    fn progress_reaches_one_hundred() -> Result<()> {
        let paths: Vec<String> = (0..1000).map(|i| format!("proj/f{i}")).collect();
        let mut reports = Vec::new();
        filter_and_build_structure(&paths, &NO_IGNORES, "proj", |p| reports.push(p))?;
        assert_eq!(reports.len(), 10);
        assert_eq!(reports.first(), Some(&10));
        assert_eq!(reports.last(), Some(&100));
        Ok(())
    }

    #[test]
    fn preview_truncates_long_structures() -> Result<()> {
        // 149 files plus the root line
        let paths: Vec<String> = (0..149).map(|i| format!("proj/file{i:03}.txt")).collect();
        let structure = filter_and_build_structure(&paths, &NO_IGNORES, "proj", |_| {})?;
        assert_eq!(structure.line_count(), 150);
        assert!(structure.is_truncated());

        let preview: Vec<&str> = structure.preview_text().lines().collect();
        assert_eq!(preview.len(), 101);
        assert_eq!(&preview[..100], &structure.lines()[..100]);
        assert_eq!(preview[100], "... (truncated, total 150 lines)");
        assert_eq!(structure.full_text().lines().count(), 150);
        Ok(())
    }

    #[test]
    fn exactly_limit_lines_is_not_truncated() -> Result<()> {
        let paths: Vec<String> = (0..99).map(|i| format!("proj/f{i}")).collect();
        let structure = filter_and_build_structure(&paths, &NO_IGNORES, "proj", |_| {})?;
        assert_eq!(structure.line_count(), 100);
        assert!(!structure.is_truncated());
        Ok(())
    }

    #[test]
    fn empty_root_name_still_renders_markdown() -> Result<()> {
        let mut ctx = RunContext::with_ignore_roots(vec!["/a.txt".to_string()], &NO_IGNORES, "");
        let structure = ctx.process(|_| {})?;
        assert_eq!(structure.full_text(), "\n└── a.txt");

        let doc = ctx.markdown()?;
        assert_eq!(doc.lines().filter(|l| *l == "```").count(), 2);
        assert!(doc.contains("└── a.txt"));
        Ok(())
    }

    #[test]
    fn truncate_preview_appends_summary() {
        let lines = ["a", "b", "c"];
        assert_eq!(truncate_preview(&lines, 2), "a\nb\n... (truncated, total 3 lines)");
    }

    #[test]
    fn run_context_requires_processing_before_markdown() -> Result<()> {
        let mut ctx = RunContext::with_ignore_roots(scenario_paths(), &NO_IGNORES, "proj");
        assert!(matches!(ctx.markdown(), Err(TreeError::Precondition(_))));

        ctx.process(|_| {})?;
        let doc = ctx.markdown()?;
        assert!(doc.contains("└── README.md"));
        Ok(())
    }

    #[test]
    fn empty_context_never_produces_output() -> Result<()> {
        let mut ctx = RunContext::new(scenario_paths(), StructureConfig::new("proj"));
        ctx.process(|_| {})?;
        assert!(ctx.output().is_some());

        let mut empty = RunContext::new(Vec::new(), StructureConfig::new("proj"));
        assert!(matches!(empty.process(|_| {}), Err(TreeError::MissingInput)));
        assert!(empty.output().is_none());
        assert!(matches!(empty.markdown(), Err(TreeError::Precondition(_))));
        Ok(())
    }
}
