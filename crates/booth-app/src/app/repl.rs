use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::app::ask::{ask_question, toggle_speech};
use crate::app::history::{clear_all, delete_entry, is_confirmation, list_history, open_replay, CLEAR_PROMPT};
use crate::app::render;
use crate::app::setup::AppConfig;
use crate::pipeline::QueryState;
use crate::session::AnswerSession;

/// One line of REPL input
#[derive(Debug, PartialEq, Eq)]
pub enum ReplCommand<'a> {
    Ask(&'a str),
    Speak,
    Back,
    Retry,
    History,
    Show(&'a str),
    Delete(&'a str),
    Clear,
    Help,
    Quit,
    Empty,
    Unknown(&'a str),
}

impl<'a> ReplCommand<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplCommand::Empty;
        }
        if !line.starts_with('/') {
            return match line {
                "exit" | "quit" => ReplCommand::Quit,
                _ => ReplCommand::Ask(line),
            };
        }

        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };
        match (command, arg) {
            ("/speak", _) => ReplCommand::Speak,
            ("/back", _) => ReplCommand::Back,
            ("/retry", _) => ReplCommand::Retry,
            ("/history", _) => ReplCommand::History,
            ("/show", id) if !id.is_empty() => ReplCommand::Show(id),
            ("/delete", id) if !id.is_empty() => ReplCommand::Delete(id),
            ("/clear", _) => ReplCommand::Clear,
            ("/help", _) => ReplCommand::Help,
            ("/quit", _) | ("/exit", _) => ReplCommand::Quit,
            _ => ReplCommand::Unknown(line),
        }
    }
}

fn print_help() {
    println!("{} Commands:", "💡".bright_yellow());
    println!("  <question>      - Ask a question (saves the previous answer)");
    println!("  /speak          - Read the current answer aloud, or stop reading");
    println!("  /back           - Leave the current answer");
    println!("  /retry          - Ask the failed question again");
    println!("  /history        - List past questions");
    println!("  /show <id>      - Open a past answer");
    println!("  /delete <id>    - Delete a past answer");
    println!("  /clear          - Delete all past answers");
    println!("  /quit           - Exit");
}

/// Drawn once per read, so it shows no speech state
fn ask_prompt() -> String {
    format!("{} ", "Ask:".bright_green().bold())
}

/// Leave the current answer view, if any, reporting whether it was saved
async fn leave_current(app: &AppConfig, current: &mut Option<AnswerSession>) {
    if let Some(session) = current.take() {
        let outcome = session.leave(&app.speech, &app.store).await;
        render::print_commit_outcome(&outcome);
    }
}

/// Re-send the question of a failed fresh answer on the same pipeline
async fn retry_current(current: &Option<AnswerSession>) {
    let Some(pipeline) = current.as_ref().and_then(|s| s.pipeline()) else {
        println!("{}", "Nothing to retry.".bright_black());
        return;
    };
    let QueryState::Error(question, _) = pipeline.state() else {
        println!("{}", "Only a failed question can be retried.".bright_black());
        return;
    };

    if let Err(e) = pipeline.submit(&question) {
        eprintln!("{} {}", "❌".bright_red(), e);
        return;
    }
    println!("{}", "🤔 Thinking...".bright_black());
    match pipeline.wait_settled().await {
        QueryState::Success(q, a) => render::print_exchange(&q, &a),
        QueryState::Error(q, e) => render::print_query_error(&q, &e),
        _ => {}
    }
}

/// Run interactive REPL mode
pub async fn run_repl_mode(app: &mut AppConfig) -> Result<()> {
    println!("{}", "🎤 Booth Assistant".bright_cyan().bold());
    println!(
        "{}",
        format!("Model: {} • Type a question, /help for commands, /quit to exit\n", app.client_config.model)
            .bright_black()
    );

    let mut rl = DefaultEditor::new()?;
    let mut current: Option<AnswerSession> = None;

    loop {
        render::drain_speech_notices(&mut app.speech_notices);

        let readline = rl.readline(&ask_prompt());

        let line = match readline {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C stops narration first, then exits
                if app.speech.is_speaking() {
                    app.speech.stop();
                    continue;
                }
                break;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{} {}", "Error:".bright_red().bold(), e);
                break;
            }
        };
        let _ = rl.add_history_entry(line.as_str());

        match ReplCommand::parse(&line) {
            ReplCommand::Empty => continue,
            ReplCommand::Quit => break,
            ReplCommand::Help => print_help(),
            ReplCommand::Ask(question) => {
                leave_current(app, &mut current).await;
                match ask_question(app, question).await {
                    Ok(session) => current = Some(session),
                    Err(e) => eprintln!("{} {}", "❌".bright_red(), e),
                }
            }
            ReplCommand::Speak => match &current {
                Some(session) => toggle_speech(app, session),
                None => println!("{}", "Nothing to read aloud yet.".bright_black()),
            },
            ReplCommand::Back => {
                if current.is_none() {
                    println!("{}", "No answer open.".bright_black());
                }
                leave_current(app, &mut current).await;
            }
            ReplCommand::Retry => retry_current(&current).await,
            ReplCommand::History => list_history(app).await,
            ReplCommand::Show(id) => {
                leave_current(app, &mut current).await;
                current = open_replay(app, id).await;
            }
            ReplCommand::Delete(id) => {
                if let Err(e) = delete_entry(app, id).await {
                    eprintln!("{} {:#}", "❌".bright_red(), e);
                }
            }
            ReplCommand::Clear => {
                let confirmed = match rl.readline(&CLEAR_PROMPT.yellow().to_string()) {
                    Ok(answer) => is_confirmation(&answer),
                    Err(_) => false,
                };
                if !confirmed {
                    println!("{}", "Cancelled.".bright_black());
                } else if let Err(e) = clear_all(app).await {
                    eprintln!("{} {:#}", "❌".bright_red(), e);
                }
            }
            ReplCommand::Unknown(command) => {
                eprintln!("{} Unknown command '{}'. Type /help for commands.", "❌".bright_red(), command);
            }
        }
    }

    leave_current(app, &mut current).await;
    render::drain_speech_notices(&mut app.speech_notices);
    println!("{}", "Goodbye!".bright_cyan());
    Ok(())
}
