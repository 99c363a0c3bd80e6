//! Reading answers aloud
//!
//! A [`SpeechEngine`] starts and stops narrations and reports how each one
//! ended over a single-shot channel. [`SpeechController`] turns that into a
//! speaking/idle state the presentation layer can toggle.

use thiserror::Error;
use tokio::sync::oneshot;

pub mod command;
pub mod controller;

pub use command::CommandSpeechEngine;
pub use controller::{SpeechController, SpeechNotices, SpeechState};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SpeechError {
    #[error("nothing to read aloud")]
    EmptyText,
    #[error("could not start speech: {0}")]
    Start(String),
    #[error("speech failed: {0}")]
    Playback(String),
}

/// Completion of one narration. Resolves to `Ok(())` when it finished,
/// `Err` when it failed; the sender is dropped when `stop()` preempts it.
pub type SpeechCompletion = oneshot::Receiver<Result<(), SpeechError>>;

pub trait SpeechEngine: Send + Sync {
    /// Begin narrating `text`. Must be called within a tokio runtime.
    fn speak(&self, text: &str) -> Result<SpeechCompletion, SpeechError>;

    /// Abort the current narration, if any
    fn stop(&self);
}
