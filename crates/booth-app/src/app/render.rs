use colored::Colorize;

use booth_llm_api::ServiceError;
use booth_logging::safe_truncate;
use booth_types::HistoryItem;

use crate::session::CommitOutcome;
use crate::speech::{SpeechNotices, SpeechState};

/// Longest question preview in history listings
const PREVIEW_CHARS: usize = 80;

/// First two lines of a question, flattened and cut to listing width
pub fn preview(question: &str) -> String {
    let lines: Vec<&str> = question
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(2)
        .collect();
    safe_truncate(&lines.join(" "), PREVIEW_CHARS)
}

pub fn print_exchange(question: &str, answer: &str) {
    println!("{} {}", "Q:".bright_cyan().bold(), question);
    println!("{} {}", "A:".bright_green().bold(), answer);
    println!();
}

pub fn print_query_error(question: &str, error: &ServiceError) {
    eprintln!("{} {}", "Q:".bright_cyan().bold(), question);
    eprintln!("{} {}", "❌ Could not get an answer:".bright_red().bold(), error);
}

pub fn print_history(items: &[HistoryItem]) {
    if items.is_empty() {
        println!("{}", "No questions yet. Ask something to get started.".bright_black());
        return;
    }

    println!("{} {} past question(s):", "📜".bright_cyan(), items.len());
    for item in items {
        println!(
            "  {}  {}  {}",
            item.id.bright_black(),
            item.local_time().bright_blue(),
            preview(&item.question)
        );
    }
}

pub fn print_commit_outcome(outcome: &CommitOutcome) {
    match outcome {
        CommitOutcome::Saved(item) => {
            println!("{} Saved to history ({})", "💾".bright_green(), item.id.bright_black());
        }
        CommitOutcome::Skipped => {}
        CommitOutcome::Failed(e) => {
            eprintln!("{} Could not save to history: {}", "⚠️".yellow(), e);
        }
    }
}

pub fn print_speech_state(state: &SpeechState) {
    match state {
        SpeechState::Speaking(_) => println!("{} Reading the answer aloud (toggle again to stop)", "🔊".bright_cyan()),
        SpeechState::Idle => println!("{} Speech stopped", "🔇".bright_black()),
    }
}

/// Report narration failures that arrived since the last call
pub fn drain_speech_notices(notices: &mut SpeechNotices) {
    while let Ok(error) = notices.try_recv() {
        eprintln!("{} {}", "⚠️".yellow(), error);
    }
}
