use booth_history::{HistoryError, HistoryStore};
use booth_types::HistoryItem;

use crate::pipeline::{QueryPipeline, QueryState};
use crate::speech::SpeechController;

/// How the answer on screen came to be
pub enum AnswerOrigin {
    /// Asked just now through this pipeline
    Fresh(QueryPipeline),
    /// Reopened from an existing history record
    Replay(HistoryItem),
}

/// Result of leaving an answer view
#[derive(Debug)]
pub enum CommitOutcome {
    Saved(HistoryItem),
    Skipped,
    Failed(HistoryError),
}

/// The answer view: one exchange on screen until the user leaves it
pub struct AnswerSession {
    origin: AnswerOrigin,
}

impl AnswerSession {
    pub fn fresh(pipeline: QueryPipeline) -> Self {
        Self {
            origin: AnswerOrigin::Fresh(pipeline),
        }
    }

    pub fn replay(item: HistoryItem) -> Self {
        Self {
            origin: AnswerOrigin::Replay(item),
        }
    }

    pub fn is_replay(&self) -> bool {
        matches!(self.origin, AnswerOrigin::Replay(_))
    }

    pub fn pipeline(&self) -> Option<&QueryPipeline> {
        match &self.origin {
            AnswerOrigin::Fresh(pipeline) => Some(pipeline),
            AnswerOrigin::Replay(_) => None,
        }
    }

    /// Question and answer currently shown, if there is an answer
    pub fn current_exchange(&self) -> Option<(String, String)> {
        match &self.origin {
            AnswerOrigin::Fresh(pipeline) => pipeline.current_answer(),
            AnswerOrigin::Replay(item) => Some((item.question.clone(), item.answer.clone())),
        }
    }

    /// Leave the view: narration always stops, and a freshly answered
    /// exchange is appended to history. Leaving itself never fails; a save
    /// failure is logged and handed back for the caller to report.
    pub async fn leave(self, speech: &SpeechController, store: &HistoryStore) -> CommitOutcome {
        speech.stop();

        let pipeline = match self.origin {
            AnswerOrigin::Replay(item) => {
                log::debug!("left replay of {}; nothing to save", item.id);
                return CommitOutcome::Skipped;
            }
            AnswerOrigin::Fresh(pipeline) => pipeline,
        };

        let (question, answer) = match pipeline.state() {
            QueryState::Success(q, a) if !q.trim().is_empty() && !a.trim().is_empty() => (q, a),
            other => {
                log::debug!("left without a saveable answer: {:?}", other);
                return CommitOutcome::Skipped;
            }
        };

        match store.add(HistoryItem::new(question, answer)).await {
            Ok(saved) => {
                log::info!("saved exchange {} to history", saved.id);
                CommitOutcome::Saved(saved)
            }
            Err(e) => {
                log::error!("could not save exchange to history: {}", e);
                CommitOutcome::Failed(e)
            }
        }
    }
}
