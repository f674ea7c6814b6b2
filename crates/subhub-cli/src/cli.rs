//! CLI argument definitions for subhub.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "subhub",
    version,
    about = "Normalize and flatten B2B customer hierarchies",
    long_about = "Normalize customer records from a workflow-automation backend.\n\n\
                  Resolves inconsistent field names, rejects unusable records with a reason,\n\
                  and flattens organizations and their sub-organizations into display rows."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Print results as JSON instead of tables.
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// JSON configuration file (webhook and draft settings).
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Webhook base URL (overrides the config file).
    #[arg(long = "webhook-url", value_name = "URL", global = true)]
    pub webhook_url: Option<String>,

    /// Draft file path (overrides the config file).
    #[arg(long = "drafts", value_name = "FILE", global = true)]
    pub drafts: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize a raw customer payload and report rejected records.
    Normalize(PayloadArgs),

    /// Normalize a payload and flatten it into display rows.
    Flatten(FlattenArgs),

    /// Fetch customers from the configured webhook.
    Fetch(FetchArgs),

    /// Create customers one at a time from a JSON list of requests.
    CreateBatch(CreateBatchArgs),

    /// Inspect and manage saved form drafts.
    #[command(subcommand)]
    Drafts(DraftsCommand),
}

#[derive(Parser)]
pub struct PayloadArgs {
    /// JSON payload file (`-` reads stdin).
    #[arg(value_name = "PAYLOAD")]
    pub payload: PathBuf,
}

#[derive(Parser)]
pub struct FlattenArgs {
    /// JSON payload file (`-` reads stdin).
    #[arg(value_name = "PAYLOAD")]
    pub payload: PathBuf,

    /// Only show sub-organization rows.
    #[arg(long = "sub-orgs-only")]
    pub sub_orgs_only: bool,

    /// Case-insensitive filter on name, id, or parent name.
    #[arg(long = "search", value_name = "QUERY")]
    pub search: Option<String>,
}

#[derive(Parser)]
pub struct FetchArgs {
    /// Print flattened rows instead of entities.
    #[arg(long = "flatten")]
    pub flatten: bool,
}

#[derive(Parser)]
pub struct CreateBatchArgs {
    /// JSON list of create requests (`-` reads stdin).
    #[arg(value_name = "REQUESTS")]
    pub requests: PathBuf,
}

#[derive(Subcommand)]
pub enum DraftsCommand {
    /// List stored drafts with their expiry.
    List,

    /// Print one live draft.
    Show {
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// Store a draft from a JSON file (`-` reads stdin).
    Save {
        #[arg(value_name = "KEY")]
        key: String,
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Delete one draft.
    Remove {
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// Delete every expired draft.
    Purge,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
