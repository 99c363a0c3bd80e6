use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{self, BufRead, Write};

use crate::app::render;
use crate::app::setup::AppConfig;
use crate::cli::HistoryCommands;
use crate::session::AnswerSession;

pub const CLEAR_PROMPT: &str = "This cannot be undone. Delete all history? [y/N] ";

/// Print every past question, newest first
pub async fn list_history(app: &AppConfig) {
    let items = app.store.load().await;
    render::print_history(&items);
}

/// Open a past exchange as a replay. Returns `None` for unknown ids.
pub async fn open_replay(app: &AppConfig, id: &str) -> Option<AnswerSession> {
    match app.store.get(id).await {
        Some(item) => {
            println!("{} {}", "🕘".bright_black(), item.local_time().bright_black());
            render::print_exchange(&item.question, &item.answer);
            Some(AnswerSession::replay(item))
        }
        None => {
            eprintln!("{} No history entry with id {}", "❌".bright_red(), id);
            None
        }
    }
}

pub async fn delete_entry(app: &AppConfig, id: &str) -> Result<bool> {
    let removed = app
        .store
        .remove(id)
        .await
        .with_context(|| format!("Failed to delete history entry {}", id))?;

    if removed {
        println!("{} Deleted {}", "🗑️".bright_green(), id);
    } else {
        println!("{} No history entry with id {}", "ℹ️".bright_blue(), id);
    }
    Ok(removed)
}

pub async fn clear_all(app: &AppConfig) -> Result<()> {
    app.store.clear().await.context("Failed to clear history")?;
    println!("{} History cleared", "🗑️".bright_green());
    Ok(())
}

/// Whether an answer to the clear prompt means yes
pub fn is_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn confirm_on_stdin(prompt: &str) -> Result<bool> {
    print!("{}", prompt.yellow());
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_confirmation(&answer))
}

/// Run a `history` subcommand
pub async fn run_history_command(app: &mut AppConfig, command: Option<HistoryCommands>) -> Result<()> {
    match command.unwrap_or(HistoryCommands::List) {
        HistoryCommands::List => list_history(app).await,
        HistoryCommands::Show { id, speak } => {
            let Some(session) = open_replay(app, &id).await else {
                anyhow::bail!("no history entry with id {}", id);
            };
            if speak {
                if let Some((_, answer)) = session.current_exchange() {
                    render::print_speech_state(&app.speech.toggle(&answer));
                    tokio::select! {
                        _ = app.speech.wait_idle() => {}
                        _ = tokio::signal::ctrl_c() => {}
                    }
                }
            }
            session.leave(&app.speech, &app.store).await;
            render::drain_speech_notices(&mut app.speech_notices);
        }
        HistoryCommands::Delete { id } => {
            delete_entry(app, &id).await?;
        }
        HistoryCommands::Clear { yes } => {
            if !yes && !confirm_on_stdin(CLEAR_PROMPT)? {
                println!("{}", "Cancelled.".bright_black());
                return Ok(());
            }
            clear_all(app).await?;
        }
    }
    Ok(())
}
