//! `codegram session` -- inspect and close backend session records.

use anyhow::{Result, bail};
use clap::Subcommand;
use codegram_core::repository::session::SessionRepository;
use codegram_core::repository::user::UserRepository;
use codegram_types::session::Session;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use crate::state::AdminState;

#[derive(Subcommand)]
pub enum SessionCommand {
    /// List a user's sessions, most recent first.
    #[command(alias = "ls")]
    List {
        /// Telegram id of the owner.
        #[arg(long)]
        owner: i64,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Mark a session inactive. The next message in its scope starts a new one.
    Close {
        /// Session id as minted by the agent backend.
        backend_session_id: String,
    },
    /// Replace a session's title.
    Rename {
        backend_session_id: String,
        title: String,
    },
}

async fn find_session(state: &AdminState, backend_session_id: &str) -> Result<Session> {
    match state.sessions.get_by_backend_id(backend_session_id).await? {
        Some(session) => Ok(session),
        None => bail!("no session {backend_session_id} on record"),
    }
}

pub async fn run(state: &AdminState, command: SessionCommand, json: bool) -> Result<()> {
    match command {
        SessionCommand::List { owner, limit } => {
            let Some(user) = state.users.get_by_telegram_id(owner).await? else {
                bail!("no user with Telegram id {owner}");
            };
            let sessions = state.sessions.list_for_owner(user.id, limit).await?;
            print_sessions(&sessions, json)
        }
        SessionCommand::Close { backend_session_id } => {
            let session = find_session(state, &backend_session_id).await?;
            state.sessions.deactivate(session.id).await?;
            tracing::info!(session_id = %session.id, backend_session_id = %backend_session_id, "Session closed");
            print_outcome("Closed", &backend_session_id, json)
        }
        SessionCommand::Rename {
            backend_session_id,
            title,
        } => {
            let session = find_session(state, &backend_session_id).await?;
            state.sessions.set_title(session.id, &title).await?;
            print_outcome("Renamed", &backend_session_id, json)
        }
    }
}

fn print_sessions(sessions: &[Session], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!();
        println!("  {} No sessions found.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Session").fg(Color::White),
        Cell::new("Title").fg(Color::White),
        Cell::new("Project").fg(Color::White),
        Cell::new("Active").fg(Color::White),
        Cell::new("Last message").fg(Color::White),
    ]);

    for session in sessions {
        let active = if session.is_active {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no").fg(Color::DarkGrey)
        };
        table.add_row(vec![
            Cell::new(&session.backend_session_id).fg(Color::Cyan),
            Cell::new(session.title.as_deref().unwrap_or("")),
            Cell::new(session.project_id.map(|id| id.to_string()).unwrap_or_else(|| "-".into())),
            active,
            Cell::new(session.last_message_at.format("%Y-%m-%d %H:%M")).fg(Color::DarkGrey),
        ]);
    }

    println!("{table}");
    Ok(())
}

fn print_outcome(verb: &str, backend_session_id: &str, json: bool) -> Result<()> {
    if json {
        let out = serde_json::json!({"session": backend_session_id, "result": verb.to_lowercase()});
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    println!(
        "  {} {verb} session {}",
        style("✓").green().bold(),
        style(backend_session_id).cyan()
    );
    Ok(())
}
