use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

use booth_llm_api::{AssistantClient, ServiceError};

use crate::retry::{ask_with_retry, RetryPolicy};

/// Where a pipeline is in answering its current question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState {
    Idle,
    Loading(String),
    Success(String, String),
    Error(String, ServiceError),
}

impl QueryState {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading(_))
    }

    pub fn question(&self) -> Option<&str> {
        match self {
            QueryState::Idle => None,
            QueryState::Loading(q) | QueryState::Success(q, _) | QueryState::Error(q, _) => Some(q),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("a question is already being answered")]
    Busy,
    #[error("please enter a question")]
    EmptyQuestion,
}

/// Drives one question at a time through the assistant service.
///
/// The state is published on a watch channel so callers can render each
/// transition. A `submit` while a request is in flight is refused; the
/// running request always lands in `Success` or `Error`.
pub struct QueryPipeline {
    client: Arc<dyn AssistantClient>,
    retry: RetryPolicy,
    state: Arc<watch::Sender<QueryState>>,
}

impl QueryPipeline {
    pub fn new(client: Arc<dyn AssistantClient>) -> Self {
        let (state, _) = watch::channel(QueryState::Idle);
        Self {
            client,
            retry: RetryPolicy::default(),
            state: Arc::new(state),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn state(&self) -> QueryState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.state.subscribe()
    }

    /// The resolved exchange, once the current question has an answer
    pub fn current_answer(&self) -> Option<(String, String)> {
        match &*self.state.borrow() {
            QueryState::Success(q, a) => Some((q.clone(), a.clone())),
            _ => None,
        }
    }

    /// Start answering `question`. Must be called within a tokio runtime.
    pub fn submit(&self, question: &str) -> Result<(), PipelineError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(PipelineError::EmptyQuestion);
        }
        let question = question.to_string();

        // Check and transition under the channel's lock so two submits
        // cannot both leave a non-loading state
        let accepted = self.state.send_if_modified(|state| {
            if state.is_loading() {
                return false;
            }
            *state = QueryState::Loading(question.clone());
            true
        });
        if !accepted {
            log::debug!("rejected submit while loading: {}", question);
            return Err(PipelineError::Busy);
        }

        let client = Arc::clone(&self.client);
        let state = Arc::clone(&self.state);
        let retry = self.retry;
        tokio::spawn(async move {
            let next = match ask_with_retry(client.as_ref(), &question, retry).await {
                Ok(answer) => {
                    log::info!("answered with {} chars", answer.chars().count());
                    QueryState::Success(question, answer)
                }
                Err(e) => {
                    log::warn!("question failed: {}", e);
                    QueryState::Error(question, e)
                }
            };
            state.send_replace(next);
        });

        Ok(())
    }

    /// Wait until the pipeline is no longer loading and return that state
    pub async fn wait_settled(&self) -> QueryState {
        let mut rx = self.subscribe();
        let settled = rx.wait_for(|state| !state.is_loading()).await;
        match settled {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }
}
