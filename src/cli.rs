use crate::io::output::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "uimigrate")]
#[command(about = "AST-based UI component migrator between frontend projects", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Migrate component files from a source project into a target project
    Migrate {
        /// Source project directory to read components from
        #[arg(long, env = "UIMIGRATE_SOURCE")]
        source: Option<PathBuf>,

        /// Target project directory to migrate components into
        #[arg(long, env = "UIMIGRATE_TARGET")]
        target: Option<PathBuf>,

        /// Configuration file (defaults to uimigrate.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Report would-be changes without writing any files
        #[arg(long)]
        dry_run: bool,

        /// Do not scaffold test specs for migrated components
        #[arg(long = "skip-tests")]
        skip_tests: bool,

        /// Provenance tag for the migration namespace
        #[arg(long)]
        tag: Option<String>,

        /// Report format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Report file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Increase verbosity level (can be repeated: -v, -vv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Write a default uimigrate.toml configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}
