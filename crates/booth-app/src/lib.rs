//! Booth assistant application library
//!
//! Question pipeline, narration and the commit-on-leave flow that ties the
//! assistant client to the history store, plus the CLI and REPL around them.

pub use booth_history as history;
pub use booth_llm_api as llm_api;
pub use booth_types as types;

pub mod app;
pub mod cli;
pub mod config;
pub mod pipeline;
pub mod retry;
pub mod session;
pub mod speech;

#[cfg(test)]
mod test_support;

pub use app::{run_ask_mode, run_history_command, run_repl_mode, setup_from_cli, AppConfig};
pub use cli::{Cli, Commands, HistoryCommands};
pub use config::ClientConfig;
pub use pipeline::{PipelineError, QueryPipeline, QueryState};
pub use retry::RetryPolicy;
pub use session::{AnswerOrigin, AnswerSession, CommitOutcome};
pub use speech::{CommandSpeechEngine, SpeechController, SpeechEngine, SpeechError, SpeechState};
