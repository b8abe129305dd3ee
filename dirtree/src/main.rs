use anyhow::{Context, Result}; // Use anyhow for easy error handling in the binary
use arboard::Clipboard;
use clap::Parser;
use dirtree_lib::{output_file_name, JobEvent, StructureJob, TreeError};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, LevelFilter};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

mod collect;
mod config_loader;

use collect::{collect_paths, root_folder_name};
use config_loader::build_run_settings;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Writes a project's file and folder structure as a markdown document.",
    long_about = "Dirtree walks a project directory, drops ignored folders (node_modules, .git and .DS_Store always), and renders the remaining files as a box-drawing tree wrapped in a markdown document.\n\nBy default the document is written to '<folder name>.md' in the current directory."
)]
pub struct Cli {
    /// Optional path to the project directory.
    /// If not provided, the current working directory is used.
    #[arg(index = 1)]
    target_path: Option<PathBuf>,

    /// Write the document to this file instead of '<folder name>.md'.
    #[arg(short = 'o', long, conflicts_with_all = ["clipboard", "stdout"])]
    output: Option<PathBuf>,

    /// Copy the document to the system clipboard instead of writing a file.
    #[arg(short = 'c', long, conflicts_with = "stdout")]
    clipboard: bool,

    /// Print the document to stdout instead of writing a file.
    #[arg(long)]
    stdout: bool,

    /// Ignore a top-level folder. Can be used multiple times or with
    /// comma-separated names. Only the first segment of each value is used,
    /// so "dist/assets" ignores "dist".
    #[arg(short = 'i', long = "ignore", value_name = "NAME")]
    ignore: Vec<String>,

    /// Remove folders or files with this name at any depth, like the built-in
    /// node_modules/.git/.DS_Store. Can be used multiple times.
    #[arg(short = 'p', long = "prune", value_name = "NAME")]
    prune: Vec<String>,

    /// Print the (possibly truncated) structure preview to stderr.
    #[arg(long)]
    preview: bool,

    /// Number of lines shown by --preview before it is truncated.
    #[arg(long, value_name = "N")]
    preview_lines: Option<usize>,

    /// Do not list empty directories.
    #[arg(long)]
    no_empty_dirs: bool,

    /// Read an additional config file (applied after global and local config).
    #[arg(long = "config", value_name = "FILE")]
    config_path: Option<PathBuf>,

    /// Ignore global/local config files and ignore files.
    #[arg(long)]
    no_config: bool,

    /// Enable verbose output. Use -v for info, -vv for debug, -vvv for trace.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[cfg(test)]
impl Cli {
    pub(crate) fn test_default() -> Self {
        Self {
            target_path: None,
            output: None,
            clipboard: false,
            stdout: false,
            ignore: Vec::new(),
            prune: Vec::new(),
            preview: false,
            preview_lines: None,
            no_empty_dirs: false,
            config_path: None,
            no_config: false,
            verbose: 0,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // --- Initialize Logging ---
    let log_level = match cli.verbose {
        0 => LevelFilter::Warn,  // Default: Show warnings and errors
        1 => LevelFilter::Info,  // -v: Show info, warnings, errors
        2 => LevelFilter::Debug, // -vv: Show debug, info, warnings, errors
        _ => LevelFilter::Trace, // -vvv and more: Show everything
    };

    env_logger::Builder::new().filter_level(log_level).init();

    info!("Log level set to: {}", log_level);
    debug!("Parsed arguments: {:?}", cli);

    // --- Determine Target Path ---
    let target_path = match cli.target_path.as_ref() {
        Some(path) => path.clone(),
        None => std::env::current_dir().context("Failed to get current working directory")?,
    };
    let target_path = target_path
        .canonicalize()
        .with_context(|| format!("Target path not found or not accessible: {:?}", target_path))?;
    let root_name = root_folder_name(&target_path);
    info!("Target path {:?} (root folder '{}')", target_path, root_name);

    // --- Settings ---
    let settings = build_run_settings(&cli, &target_path, &root_name)?;

    // --- Collect Paths (host side) ---
    let paths = collect_paths(
        &target_path,
        &root_name,
        &settings.structure.ignore,
        &settings.structure.extra_prune,
        settings.collect.include_empty_dirs,
    )?;

    // --- Run the pipeline on a worker, painting progress meanwhile ---
    let job = StructureJob::submit(paths, settings.structure);
    let progress = ProgressBar::new(100);
    progress.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg} [{bar:30.cyan/blue}] {pos:>3}%")?
            .progress_chars("=> "),
    );
    progress.set_message("Processing");
    for event in job.events() {
        match event {
            JobEvent::Started { total_paths } => {
                progress.set_message(format!("Processing {} paths", total_paths));
            }
            JobEvent::Progress(percent) => progress.set_position(u64::from(percent)),
        }
    }
    progress.finish_and_clear();

    let structure = match job.wait() {
        Ok(structure) => structure,
        Err(TreeError::MissingInput) => {
            error!("No files found under {:?}", target_path);
            return Err(TreeError::MissingInput)
                .with_context(|| format!("Nothing to document in {:?}", target_path));
        }
        Err(e) => {
            error!("Error during dirtree operation: {}", e);
            return Err(e.into());
        }
    };

    if cli.preview {
        eprintln!("{}", structure.preview_text());
    }

    let document = structure.to_markdown();

    // --- Handle Output ---
    if cli.clipboard {
        info!("Copying document to clipboard...");
        let mut clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        clipboard
            .set_text(document)
            .context("Failed to copy document to clipboard")?;
        info!("Successfully copied document to clipboard.");
    } else if cli.stdout {
        debug!("Writing document to stdout...");
        let mut stdout = io::stdout();
        stdout
            .write_all(document.as_bytes())
            .context("Failed to write document to stdout")?;
        stdout.flush().context("Failed to flush stdout")?;
    } else {
        let output_path = cli
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(output_file_name(&root_name)));
        info!("Writing document to file: {:?}", output_path);
        let mut file = File::create(&output_path)
            .with_context(|| format!("Failed to create output file: {:?}", output_path))?;
        file.write_all(document.as_bytes())
            .with_context(|| format!("Failed to write document to file: {:?}", output_path))?;
        eprintln!(
            "Wrote {} lines to {}",
            structure.line_count(),
            output_path.display()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_and_comma_separated_flags() {
        let cli = Cli::parse_from([
            "dirtree", "proj", "-i", "dist", "-i", "build,out", "-p", "vendor", "--preview",
            "-vv",
        ]);
        assert_eq!(cli.target_path, Some(PathBuf::from("proj")));
        assert_eq!(cli.ignore, vec!["dist", "build,out"]);
        assert_eq!(cli.prune, vec!["vendor"]);
        assert!(cli.preview);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn output_conflicts_with_stdout() {
        let result = Cli::try_parse_from(["dirtree", "-o", "out.md", "--stdout"]);
        assert!(result.is_err());
    }

    #[test]
    fn clap_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
