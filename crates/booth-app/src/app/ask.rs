use anyhow::{bail, Result};
use colored::Colorize;

use crate::app::render;
use crate::app::setup::AppConfig;
use crate::pipeline::QueryState;
use crate::session::{AnswerSession, CommitOutcome};

/// Submit `question` in a new answer view and show how it resolved
pub async fn ask_question(app: &AppConfig, question: &str) -> Result<AnswerSession> {
    let pipeline = app.new_pipeline()?;
    pipeline.submit(question)?;

    println!("{}", "🤔 Thinking...".bright_black());
    match pipeline.wait_settled().await {
        QueryState::Success(q, a) => render::print_exchange(&q, &a),
        QueryState::Error(q, e) => render::print_query_error(&q, &e),
        other => log::debug!("pipeline settled in {:?}", other),
    }

    Ok(AnswerSession::fresh(pipeline))
}

/// Toggle narration of the session's answer, if it has one
pub fn toggle_speech(app: &AppConfig, session: &AnswerSession) {
    match session.current_exchange() {
        Some((_, answer)) => render::print_speech_state(&app.speech.toggle(&answer)),
        None => println!("{}", "Nothing to read aloud yet.".bright_black()),
    }
}

/// Run in ask mode: answer one question, optionally read it aloud, save it and exit
pub async fn run_ask_mode(app: &mut AppConfig, question: &str, speak: bool) -> Result<()> {
    let session = ask_question(app, question).await?;

    if speak && session.current_exchange().is_some() {
        toggle_speech(app, &session);
        tokio::select! {
            _ = app.speech.wait_idle() => {}
            _ = tokio::signal::ctrl_c() => {
                println!("\n{}", "^C - Stopping speech".bright_yellow());
            }
        }
    }

    let failed = match session.pipeline().map(|p| p.state()) {
        Some(QueryState::Error(_, e)) => Some(e),
        _ => None,
    };

    let outcome = session.leave(&app.speech, &app.store).await;
    render::print_commit_outcome(&outcome);
    render::drain_speech_notices(&mut app.speech_notices);

    if let Some(e) = failed {
        bail!("question failed: {}", e);
    }
    if let CommitOutcome::Failed(e) = outcome {
        bail!("answer not saved: {}", e);
    }
    Ok(())
}
