//! CLI command definitions for the `codegram` binary.
//!
//! `codegram serve` runs the webhook server. The remaining subcommands are
//! admin tools that operate directly on the store in the data directory.

pub mod project;
pub mod session;
pub mod whitelist;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Telegram front end for a coding-agent server.
#[derive(Parser)]
#[command(name = "codegram", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Directory holding the database, config.toml, and projects.
    #[arg(long, global = true, env = "DATA_DIR", default_value = "/data")]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the webhook server.
    Serve(ServeArgs),

    /// Manage the stored whitelist flag of a user.
    Whitelist {
        #[command(subcommand)]
        action: whitelist::WhitelistCommand,
    },

    /// Inspect and edit the project catalog.
    Project {
        #[command(subcommand)]
        action: project::ProjectCommand,
    },

    /// Inspect and close backend session records.
    Session {
        #[command(subcommand)]
        action: session::SessionCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Telegram bot token.
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    pub telegram_token: String,

    /// Base URL of the coding-agent server.
    #[arg(long, env = "OPENCODE_URL", default_value = "http://opencode-server:4000")]
    pub backend_url: String,

    /// Let every Telegram user in.
    #[arg(long, env = "ALLOW_ALL_USERS", value_parser = parse_true)]
    pub allow_all_users: bool,

    /// Comma-separated Telegram user ids allowed in.
    #[arg(long, env = "WHITELIST_USER_IDS", value_parser = parse_user_ids)]
    pub whitelist: Option<UserIdList>,

    /// Host to bind to.
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value = "8000")]
    pub port: u16,
}

/// Telegram user ids parsed from a comma-separated list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserIdList(pub Vec<i64>);

/// Entries are trimmed and empty ones skipped, so `""` and `"1, 2,"` are valid.
fn parse_user_ids(raw: &str) -> Result<UserIdList, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry
                .parse::<i64>()
                .map_err(|e| format!("invalid Telegram user id '{entry}': {e}"))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(UserIdList)
}

/// Only `true` (any case) turns the flag on; every other value leaves it off.
fn parse_true(raw: &str) -> Result<bool, String> {
    Ok(raw.trim().eq_ignore_ascii_case("true"))
}
