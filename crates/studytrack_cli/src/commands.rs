use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_DB_FILE_NAME: &str = "studytrack.sqlite3";

#[derive(Parser)]
#[command(name = "studytrack", about = "Track the subjects you are studying", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Subject database file
    #[arg(long, global = true, default_value = DEFAULT_DB_FILE_NAME)]
    pub db: PathBuf,

    /// Absolute directory for rolling log files (logging is off when omitted)
    #[arg(long, global = true)]
    pub log_dir: Option<String>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List subjects, optionally filtered by a case-insensitive query
    List(ListArgs),
    /// Add a subject
    Add(AddArgs),
    /// Rename a subject
    Edit(EditArgs),
    /// Delete a subject
    Delete(DeleteArgs),
    /// Print core health check and version
    Ping,
}

#[derive(Args)]
pub struct ListArgs {
    /// Substring to match against titles
    #[arg(long, short)]
    pub query: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct AddArgs {
    pub title: String,
}

#[derive(Args)]
pub struct EditArgs {
    pub id: i64,
    pub title: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub id: i64,
}
