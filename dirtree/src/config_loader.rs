use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use directories::BaseDirs;
use log::debug;
use serde::Deserialize;

use dirtree_lib::{
    first_segment, StructureConfig, DEFAULT_PREVIEW_LINES, DEFAULT_PROGRESS_INTERVAL,
};

use crate::Cli;

#[derive(Debug, Clone)]
pub struct RunSettings {
    pub structure: StructureConfig,
    pub collect: CollectSettings,
}

#[derive(Debug, Clone)]
pub struct CollectSettings {
    pub include_empty_dirs: bool,
}

pub fn build_run_settings(
    cli: &Cli,
    target_path: &Path,
    root_folder_name: &str,
) -> Result<RunSettings> {
    let mut settings = Settings::default();
    let mut ignore = NameAccumulator::default();
    let mut prune = NameAccumulator::default();

    if !cli.no_config {
        if let Some(base_dirs) = BaseDirs::new() {
            let config_dir = base_dirs.config_dir().join("dirtree");
            apply_config_file(
                &config_dir.join("config.toml"),
                &mut settings,
                &mut ignore,
                &mut prune,
            )?;
            apply_ignore_file(&config_dir.join("ignore"), &mut ignore)?;
        } else {
            debug!("No base directories available; skipping global config search");
        }

        apply_config_file(
            &target_path.join(".dirtree.toml"),
            &mut settings,
            &mut ignore,
            &mut prune,
        )?;
        apply_ignore_file(&target_path.join(".dirtreeignore"), &mut ignore)?;

        if let Some(explicit_path) = cli.config_path.as_ref() {
            apply_config_file(explicit_path, &mut settings, &mut ignore, &mut prune)?;
        }
    } else if let Some(explicit_path) = cli.config_path.as_ref() {
        debug!(
            "--no-config specified; skipping explicitly requested config file {:?}",
            explicit_path
        );
    }

    // CLI overrides (highest precedence)
    if let Some(lines) = cli.preview_lines {
        if lines == 0 {
            bail!("--preview-lines must be greater than 0");
        }
        settings.preview_lines = lines;
    }
    if cli.no_empty_dirs {
        settings.include_empty_dirs = false;
    }

    // Comma-separated values are split (e.g. -i "dist,target")
    for raw in &cli.ignore {
        ignore.merge(raw.split(','));
    }
    for raw in &cli.prune {
        prune.merge(raw.split(','));
    }

    let mut structure =
        StructureConfig::new(root_folder_name).with_ignore_roots(ignore.into_vec());
    structure.extra_prune = prune.into_vec();
    structure.preview_lines = settings.preview_lines;
    structure.progress_interval = settings.progress_interval;

    Ok(RunSettings {
        structure,
        collect: CollectSettings {
            include_empty_dirs: settings.include_empty_dirs,
        },
    })
}

#[derive(Debug)]
struct Settings {
    preview_lines: usize,
    progress_interval: usize,
    include_empty_dirs: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preview_lines: DEFAULT_PREVIEW_LINES,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            include_empty_dirs: true,
        }
    }
}

/// Collects folder names, each reduced to its first segment, without
/// duplicates and in the order they were first seen.
#[derive(Debug, Default)]
struct NameAccumulator {
    names: Vec<String>,
    seen: HashSet<String>,
}

impl NameAccumulator {
    fn push<S: AsRef<str>>(&mut self, raw: S) {
        let candidate = raw.as_ref().trim();
        if candidate.is_empty() {
            return;
        }
        let name = first_segment(candidate);
        if name.is_empty() {
            debug!("Skipping folder name '{}' with an empty first segment", candidate);
            return;
        }
        if self.seen.insert(name.to_string()) {
            debug!("Adding folder name: {}", name);
            self.names.push(name.to_string());
        } else {
            debug!("Skipping duplicate folder name: {}", name);
        }
    }

    fn merge<I>(&mut self, iter: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for item in iter {
            self.push(item);
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.names
    }
}

fn apply_config_file(
    path: &Path,
    settings: &mut Settings,
    ignore: &mut NameAccumulator,
    prune: &mut NameAccumulator,
) -> Result<()> {
    if !path.exists() {
        debug!("Config file {:?} not found; skipping", path);
        return Ok(());
    }

    debug!("Loading config from {:?}", path);
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {:?}", path))?;

    let parsed: FileConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {:?}", path))?;

    if let Some(section) = parsed.dirtree {
        apply_dirtree_section(section, settings, ignore, prune)
            .with_context(|| format!("Invalid [dirtree] section in {:?}", path))?;
    }

    Ok(())
}

fn apply_dirtree_section(
    section: DirtreeSection,
    settings: &mut Settings,
    ignore: &mut NameAccumulator,
    prune: &mut NameAccumulator,
) -> Result<()> {
    if let Some(values) = section.ignore {
        ignore.merge(values);
    }
    if let Some(values) = section.prune {
        prune.merge(values);
    }
    if let Some(value) = section.preview_lines {
        if value == 0 {
            bail!("preview_lines must be greater than 0");
        }
        settings.preview_lines = value;
    }
    if let Some(value) = section.progress_interval {
        if value == 0 {
            bail!("progress_interval must be greater than 0");
        }
        settings.progress_interval = value;
    }
    if let Some(value) = section.include_empty_dirs {
        settings.include_empty_dirs = value;
    }
    Ok(())
}

fn apply_ignore_file(path: &Path, ignore: &mut NameAccumulator) -> Result<()> {
    if !path.exists() {
        debug!("Ignore file {:?} not found; skipping", path);
        return Ok(());
    }

    debug!("Loading ignored folders from {:?}", path);
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read ignore file {:?}", path))?;

    for line in contents.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        ignore.push(trimmed);
    }

    Ok(())
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    dirtree: Option<DirtreeSection>,
}

#[derive(Debug, Deserialize)]
struct DirtreeSection {
    ignore: Option<Vec<String>>,
    prune: Option<Vec<String>>,
    preview_lines: Option<usize>,
    progress_interval: Option<usize>,
    include_empty_dirs: Option<bool>,
}
