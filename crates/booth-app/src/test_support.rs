//! Scripted stand-ins for the assistant service and the speech engine

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{oneshot, Notify};

use booth_llm_api::{AssistantClient, ServiceError};

use crate::speech::{SpeechEngine, SpeechError};

/// Replies with queued results in order; transport errors once exhausted
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, ServiceError>>>,
    questions: Mutex<Vec<String>>,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<Result<String, ServiceError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            questions: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    pub fn answering(answer: &str) -> Self {
        Self::new(vec![Ok(answer.to_string())])
    }

    /// Every call waits for one `notify_one()` on the returned handle
    pub fn gated(replies: Vec<Result<String, ServiceError>>) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let mut client = Self::new(replies);
        client.gate = Some(Arc::clone(&gate));
        (client, gate)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssistantClient for ScriptedClient {
    async fn ask(&self, question: &str) -> Result<String, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.questions.lock().unwrap().push(question.to_string());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::transport("script exhausted")))
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

type Completion = oneshot::Sender<Result<(), SpeechError>>;

/// Speech engine whose narrations finish only when the test says so
#[derive(Default)]
pub struct ScriptedEngine {
    pending: Mutex<Vec<(String, Completion)>>,
    spoken: Mutex<Vec<String>>,
    stops: AtomicUsize,
    fail_start: Mutex<Option<SpeechError>>,
}

impl ScriptedEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_next_start(&self, error: SpeechError) {
        *self.fail_start.lock().unwrap() = Some(error);
    }

    /// Resolve the oldest unfinished narration
    pub fn finish(&self, result: Result<(), SpeechError>) {
        let mut pending = self.pending.lock().unwrap();
        assert!(!pending.is_empty(), "no narration in progress");
        let (_, done) = pending.remove(0);
        let _ = done.send(result);
    }

    /// Take the oldest unfinished narration's completion handle
    pub fn take_pending(&self) -> Completion {
        self.pending.lock().unwrap().remove(0).1
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

impl SpeechEngine for ScriptedEngine {
    fn speak(&self, text: &str) -> Result<oneshot::Receiver<Result<(), SpeechError>>, SpeechError> {
        if let Some(error) = self.fail_start.lock().unwrap().take() {
            return Err(error);
        }
        let (tx, rx) = oneshot::channel();
        self.spoken.lock().unwrap().push(text.to_string());
        self.pending.lock().unwrap().push((text.to_string(), tx));
        Ok(rx)
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        // Preempted narrations never report back
        self.pending.lock().unwrap().clear();
    }
}
