//! `codegram project` -- inspect and edit a user's project catalog.
//!
//! Edits touch the catalog only. Directories on disk are never moved or
//! removed.

use anyhow::{Result, bail};
use clap::Subcommand;
use codegram_core::repository::user::UserRepository;
use codegram_types::project::Project;
use codegram_types::user::UserId;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use crate::state::AdminState;

#[derive(Subcommand)]
pub enum ProjectCommand {
    /// List a user's projects.
    #[command(alias = "ls")]
    List {
        /// Telegram id of the owner.
        #[arg(long)]
        owner: i64,
    },
    /// Rename a project. Its directory keeps the original path.
    Rename {
        #[arg(long)]
        owner: i64,
        name: String,
        new_name: String,
    },
    /// Set or clear a project's description.
    Describe {
        #[arg(long)]
        owner: i64,
        name: String,
        /// New description; omit to clear.
        description: Option<String>,
    },
    /// Remove a project from the catalog. Files on disk are kept.
    #[command(alias = "rm")]
    Delete {
        #[arg(long)]
        owner: i64,
        name: String,
    },
}

async fn resolve_owner(state: &AdminState, telegram_id: i64) -> Result<UserId> {
    match state.users.get_by_telegram_id(telegram_id).await? {
        Some(user) => Ok(user.id),
        None => bail!("no user with Telegram id {telegram_id}"),
    }
}

pub async fn run(state: &AdminState, command: ProjectCommand, json: bool) -> Result<()> {
    match command {
        ProjectCommand::List { owner } => {
            let owner_id = resolve_owner(state, owner).await?;
            let projects = state.projects.list_projects(owner_id).await?;
            print_projects(&projects, json)
        }
        ProjectCommand::Rename {
            owner,
            name,
            new_name,
        } => {
            let owner_id = resolve_owner(state, owner).await?;
            let project = state.projects.rename_project(owner_id, &name, &new_name).await?;
            print_project("Renamed", &project, json)
        }
        ProjectCommand::Describe {
            owner,
            name,
            description,
        } => {
            let owner_id = resolve_owner(state, owner).await?;
            let project = state
                .projects
                .describe_project(owner_id, &name, description.as_deref())
                .await?;
            print_project("Updated", &project, json)
        }
        ProjectCommand::Delete { owner, name } => {
            let owner_id = resolve_owner(state, owner).await?;
            let project = state.projects.delete_project(owner_id, &name).await?;
            print_project("Removed from catalog", &project, json)
        }
    }
}

fn print_projects(projects: &[Project], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(projects)?);
        return Ok(());
    }

    if projects.is_empty() {
        println!();
        println!("  {} No projects found.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("Description").fg(Color::White),
        Cell::new("Path").fg(Color::White),
        Cell::new("Updated").fg(Color::White),
    ]);

    for project in projects {
        table.add_row(vec![
            Cell::new(&project.name).fg(Color::Cyan),
            Cell::new(project.description.as_deref().unwrap_or("")),
            Cell::new(project.path.display()).fg(Color::DarkGrey),
            Cell::new(project.updated_at.format("%Y-%m-%d %H:%M")).fg(Color::DarkGrey),
        ]);
    }

    println!("{table}");
    Ok(())
}

fn print_project(verb: &str, project: &Project, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(project)?);
        return Ok(());
    }
    println!(
        "  {} {verb} {} ({})",
        style("✓").green().bold(),
        style(&project.name).cyan(),
        style(project.path.display()).dim()
    );
    Ok(())
}
