//! Lectern - terminal table view for course-admin menu and category trees
//!
//! Usage: lectern <COMMAND>
//!
//! Commands:
//!   show    Print the visible rows of a record export
//!   check   Report integrity problems of a record export
//!   config  Print or write the effective settings

mod commands;
mod records;
mod render;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use lectern_tree::RecordId;

use crate::commands::ShowOptions;
use crate::settings::{SettingsData, settings_path};

/// Lectern - tree tables for course-admin menus and categories
#[derive(Parser, Debug)]
#[command(name = "lectern")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (defaults to $LECTERN_CONFIG, then
    /// ~/.config/lectern/settings.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the visible rows of a record export
    Show {
        /// JSON export of menu or category records (`-` for stdin)
        source: PathBuf,

        /// Toggle a row by id (repeatable)
        #[arg(short, long, value_name = "ID")]
        expand: Vec<RecordId>,

        /// Expand the ancestors of a row so it becomes visible (repeatable)
        #[arg(long, value_name = "ID")]
        reveal: Vec<RecordId>,

        /// Start with every branch expanded
        #[arg(short = 'a', long)]
        expand_all: bool,

        /// Permission code granted to the viewer (repeatable)
        #[arg(short, long, value_name = "CODE")]
        grant: Vec<String>,

        /// JSON array of granted permission codes
        #[arg(long, value_name = "FILE")]
        grants: Option<PathBuf>,

        /// Print the nested tree as JSON instead of rows
        #[arg(long)]
        json: bool,
    },

    /// Report integrity problems of a record export
    Check {
        /// JSON export of menu or category records (`-` for stdin)
        source: PathBuf,
    },

    /// Print the effective settings
    Config {
        /// Override the number of spaces per tree level
        #[arg(long, value_name = "WIDTH")]
        indent_width: Option<usize>,

        /// Override whether every branch starts expanded
        #[arg(long, value_name = "BOOL")]
        expand_all: Option<bool>,

        /// Write the effective settings to the settings file
        #[arg(long)]
        write: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        },
    }
}

fn run(cli: Cli) -> Result<bool> {
    let settings_file = settings_path(cli.config.as_deref());
    let mut settings = SettingsData::load(&settings_file)?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Show {
            source,
            expand,
            reveal,
            expand_all,
            grant,
            grants,
            json,
        } => {
            let options = ShowOptions {
                expand,
                reveal,
                expand_all,
                grants: grant,
                grants_file: grants,
                json,
            };
            commands::show(&source, &options, &settings, &mut out)?;
            Ok(true)
        },
        Commands::Check { source } => commands::check(&source, &mut out),
        Commands::Config {
            indent_width,
            expand_all,
            write,
        } => {
            if let Some(width) = indent_width {
                settings.set_indent_width(width);
            }
            if let Some(expand_all) = expand_all {
                settings.set_expand_all(expand_all);
            }
            commands::config(&settings_file, &settings, write, &mut out)?;
            Ok(true)
        },
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(level),
    )
    .format_timestamp(None)
    .init();
}
