use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

use super::{SpeechEngine, SpeechError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechState {
    Idle,
    Speaking(String),
}

impl SpeechState {
    pub fn is_speaking(&self) -> bool {
        matches!(self, SpeechState::Speaking(_))
    }
}

/// Failures of narrations, delivered once each and never fatal
pub type SpeechNotices = mpsc::UnboundedReceiver<SpeechError>;

/// Single speaking/idle switch on top of a [`SpeechEngine`].
///
/// Each narration is tagged with a generation number; a completion whose
/// generation is no longer current belongs to a narration that was stopped
/// or replaced and is ignored.
pub struct SpeechController {
    engine: Arc<dyn SpeechEngine>,
    state: Arc<watch::Sender<SpeechState>>,
    generation: Arc<AtomicU64>,
    notices: mpsc::UnboundedSender<SpeechError>,
}

impl SpeechController {
    pub fn new(engine: Arc<dyn SpeechEngine>) -> (Self, SpeechNotices) {
        let (state, _) = watch::channel(SpeechState::Idle);
        let (notices, notices_rx) = mpsc::unbounded_channel();
        let controller = Self {
            engine,
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
            notices,
        };
        (controller, notices_rx)
    }

    pub fn state(&self) -> SpeechState {
        self.state.borrow().clone()
    }

    pub fn is_speaking(&self) -> bool {
        self.state.borrow().is_speaking()
    }

    pub fn subscribe(&self) -> watch::Receiver<SpeechState> {
        self.state.subscribe()
    }

    /// Start narrating `text` when idle, stop when speaking.
    /// Returns the state after the toggle.
    pub fn toggle(&self, text: &str) -> SpeechState {
        if self.is_speaking() {
            self.stop();
            return SpeechState::Idle;
        }
        self.start(text)
    }

    /// Go idle, aborting any narration. No-op when already idle.
    pub fn stop(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let previous = self.state.send_replace(SpeechState::Idle);
        if previous.is_speaking() {
            log::debug!("speech stopped");
            self.engine.stop();
        }
    }

    /// Resolves once the controller is idle
    pub async fn wait_idle(&self) {
        let mut rx = self.subscribe();
        let _ = rx.wait_for(|state| !state.is_speaking()).await;
    }

    fn start(&self, text: &str) -> SpeechState {
        if text.trim().is_empty() {
            log::debug!("nothing to speak");
            return SpeechState::Idle;
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let done = match self.engine.speak(text) {
            Ok(done) => done,
            Err(e) => {
                log::warn!("{}", e);
                let _ = self.notices.send(e);
                return SpeechState::Idle;
            }
        };

        let speaking = SpeechState::Speaking(text.to_string());
        self.state.send_replace(speaking.clone());

        let state = Arc::clone(&self.state);
        let current = Arc::clone(&self.generation);
        let notices = self.notices.clone();
        tokio::spawn(async move {
            let outcome = done.await;

            let still_current = state.send_if_modified(|s| {
                if current.load(Ordering::SeqCst) != generation {
                    return false;
                }
                *s = SpeechState::Idle;
                true
            });
            if !still_current {
                return;
            }

            match outcome {
                Ok(Ok(())) => log::debug!("speech finished"),
                Ok(Err(e)) => {
                    log::warn!("{}", e);
                    let _ = notices.send(e);
                }
                Err(_) => log::debug!("speech ended without a result"),
            }
        });

        speaking
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedEngine;
    use pretty_assertions::assert_eq;

    fn controller() -> (SpeechController, SpeechNotices, Arc<ScriptedEngine>) {
        let engine = ScriptedEngine::new();
        let (controller, notices) = SpeechController::new(engine.clone());
        (controller, notices, engine)
    }

    #[tokio::test]
    async fn test_toggle_starts_and_stops() {
        let (speech, _notices, engine) = controller();

        assert_eq!(speech.toggle("answer"), SpeechState::Speaking("answer".to_string()));
        assert_eq!(speech.state(), SpeechState::Speaking("answer".to_string()));
        assert_eq!(engine.spoken(), vec!["answer".to_string()]);

        assert_eq!(speech.toggle("answer"), SpeechState::Idle);
        assert_eq!(speech.state(), SpeechState::Idle);
        assert_eq!(engine.stops(), 1);
    }

    #[tokio::test]
    async fn test_stop_twice_is_idle_both_times() {
        let (speech, mut notices, engine) = controller();
        speech.toggle("answer");

        speech.stop();
        assert_eq!(speech.state(), SpeechState::Idle);
        speech.stop();
        assert_eq!(speech.state(), SpeechState::Idle);

        assert_eq!(engine.stops(), 1);
        assert!(notices.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_stop_when_never_started_is_noop() {
        let (speech, _notices, engine) = controller();
        speech.stop();
        assert_eq!(speech.state(), SpeechState::Idle);
        assert_eq!(engine.stops(), 0);
    }

    #[tokio::test]
    async fn test_completion_returns_to_idle() {
        let (speech, mut notices, engine) = controller();
        speech.toggle("answer");

        engine.finish(Ok(()));
        speech.wait_idle().await;

        assert_eq!(speech.state(), SpeechState::Idle);
        assert!(notices.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_failure_returns_to_idle_and_notifies() {
        let (speech, mut notices, engine) = controller();
        speech.toggle("answer");

        engine.finish(Err(SpeechError::Playback("device busy".to_string())));
        let notice = notices.recv().await.unwrap();

        assert_eq!(notice, SpeechError::Playback("device busy".to_string()));
        assert_eq!(speech.state(), SpeechState::Idle);
    }

    #[tokio::test]
    async fn test_start_failure_stays_idle_and_notifies() {
        let (speech, mut notices, engine) = controller();
        engine.fail_next_start(SpeechError::Start("no engine".to_string()));

        assert_eq!(speech.toggle("answer"), SpeechState::Idle);
        assert_eq!(notices.recv().await.unwrap(), SpeechError::Start("no engine".to_string()));
    }

    #[tokio::test]
    async fn test_empty_text_does_nothing() {
        let (speech, _notices, engine) = controller();
        assert_eq!(speech.toggle("   "), SpeechState::Idle);
        assert!(engine.spoken().is_empty());
    }

    #[tokio::test]
    async fn test_stale_completion_is_ignored() {
        let (speech, mut notices, engine) = controller();

        speech.toggle("first");
        let first = engine.take_pending();
        speech.stop();
        speech.toggle("second");

        // The first narration reports late; the second keeps speaking
        let _ = first.send(Err(SpeechError::Playback("late".to_string())));
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        assert_eq!(speech.state(), SpeechState::Speaking("second".to_string()));
        assert!(notices.try_recv().is_err());

        engine.finish(Ok(()));
        speech.wait_idle().await;
    }
}
