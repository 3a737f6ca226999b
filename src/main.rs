//! Lined - A modal terminal line editor.
//!
//! # Usage
//!
//! ```bash
//! lined notes.txt
//! lined --tab-width 2 notes.txt
//! lined --no-line-numbers --save notes.txt
//! ```

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use lined::app::{App, DEFAULT_TAB_WIDTH};
use lined::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    save_config_flags,
};

/// A modal terminal line editor
#[derive(Parser, Debug)]
#[command(name = "lined", version, about, long_about = None)]
struct Cli {
    /// File to edit (created if it does not exist)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Number of spaces inserted by Tab (1-16)
    #[arg(long, value_name = "N")]
    tab_width: Option<usize>,

    /// Hide the line-number gutter
    #[arg(long)]
    no_line_numbers: bool,

    /// Write log output to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn env_filter() -> EnvFilter {
    EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = ConfigFlags {
        no_line_numbers: cli.no_line_numbers,
        tab_width: cli.tab_width,
        log_file: cli.log_file.clone(),
    };

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.log_file.as_deref())?;
    debug!(?effective, "resolved configuration");

    let mut app = App::new(cli.file)
        .with_tab_width(effective.tab_width.unwrap_or(DEFAULT_TAB_WIDTH))
        .with_line_numbers(!effective.no_line_numbers);

    app.run().context("Application error")
}
