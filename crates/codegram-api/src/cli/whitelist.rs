//! `codegram whitelist` -- set or clear a user's stored whitelist flag.

use anyhow::Result;
use clap::Subcommand;
use codegram_core::repository::user::UserRepository;
use codegram_types::user::UserContact;
use console::style;

use crate::state::AdminState;

#[derive(Subcommand)]
pub enum WhitelistCommand {
    /// Allow a Telegram user in.
    Add {
        /// Telegram user id.
        telegram_id: i64,
    },
    /// Revoke a Telegram user's stored permission.
    Remove {
        /// Telegram user id.
        telegram_id: i64,
    },
}

pub async fn run(state: &AdminState, command: WhitelistCommand, json: bool) -> Result<()> {
    let (telegram_id, whitelisted) = match command {
        WhitelistCommand::Add { telegram_id } => (telegram_id, true),
        WhitelistCommand::Remove { telegram_id } => (telegram_id, false),
    };

    let existed = state.users.set_whitelisted(telegram_id, whitelisted).await?;
    if !existed && whitelisted {
        // Users are otherwise created on first contact; pre-create so the flag
        // is already set when they first write.
        state
            .users
            .upsert_contact(&UserContact {
                telegram_id,
                ..UserContact::default()
            })
            .await?;
        state.users.set_whitelisted(telegram_id, true).await?;
    }

    if json {
        let out = serde_json::json!({
            "telegram_id": telegram_id,
            "whitelisted": whitelisted,
            "created": !existed && whitelisted,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    match (whitelisted, existed) {
        (true, _) => println!(
            "  {} User {} is whitelisted",
            style("✓").green().bold(),
            style(telegram_id).cyan()
        ),
        (false, true) => println!(
            "  {} User {} removed from the whitelist",
            style("✓").green().bold(),
            style(telegram_id).cyan()
        ),
        (false, false) => println!(
            "  {} No user {} on record",
            style("i").blue().bold(),
            style(telegram_id).cyan()
        ),
    }
    Ok(())
}
