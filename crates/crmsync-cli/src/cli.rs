//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use crmsync_domain::RecordType;
use std::path::PathBuf;

/// crmsync - Extract CRM records from saved pages into a local collection.
#[derive(Debug, Parser)]
#[command(name = "crmsync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CRMSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database file, overriding the configured one
    #[arg(short, long, global = true, env = "CRMSYNC_DATABASE")]
    pub database: Option<PathBuf>,

    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one extraction pass over a saved HTML page
    Extract(ExtractArgs),

    /// List stored records of one type
    List(ListArgs),

    /// Delete stored records by id
    Delete(DeleteArgs),

    /// Show stored counts and the last sync time
    Status,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Saved HTML page
    #[arg(long)]
    pub html: PathBuf,

    /// Location path the page was served from (e.g. /app/contacts)
    #[arg(short, long)]
    pub path: String,
}

/// Arguments for the list command.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Record type
    #[arg(value_enum)]
    pub record_type: RecordTypeArg,

    /// Only show records with a field containing this text (case-insensitive)
    #[arg(short, long)]
    pub search: Option<String>,
}

/// Arguments for the delete command.
#[derive(Debug, Parser)]
pub struct DeleteArgs {
    /// Record type
    #[arg(value_enum)]
    pub record_type: RecordTypeArg,

    /// Record ids to delete
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Record type argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RecordTypeArg {
    /// Contacts
    #[value(alias = "contact")]
    Contacts,
    /// Deals
    #[value(alias = "deal")]
    Deals,
    /// Tasks
    #[value(alias = "task")]
    Tasks,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

impl From<RecordTypeArg> for RecordType {
    fn from(arg: RecordTypeArg) -> Self {
        match arg {
            RecordTypeArg::Contacts => RecordType::Contacts,
            RecordTypeArg::Deals => RecordType::Deals,
            RecordTypeArg::Tasks => RecordType::Tasks,
        }
    }
}
