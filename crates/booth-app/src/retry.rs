use std::time::Duration;

use booth_llm_api::{AssistantClient, ServiceError};

/// How often a failed question is re-sent to the assistant service.
///
/// Only transport failures are retried; the service's own answers (status
/// errors, malformed bodies) are final. `max_attempts` counts the first try,
/// so the default of 1 never retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_millis(8_000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, base_delay: Duration) -> Self {
        let defaults = Self::default();
        Self {
            max_attempts: max_attempts.clamp(1, 20),
            base_delay,
            max_delay: defaults.max_delay.max(base_delay),
        }
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Delay before the retry that follows failed `attempt` (1-based)
    pub fn backoff(&self, attempt: usize) -> Duration {
        if attempt <= 1 {
            return self.base_delay.min(self.max_delay);
        }

        let exp_shift = (attempt - 1).min(30) as u32;
        let base_ms = self.base_delay.as_millis() as u64;
        let raw_ms = base_ms.saturating_mul(1u64 << exp_shift);
        Duration::from_millis(raw_ms).min(self.max_delay)
    }

    fn should_retry(&self, error: &ServiceError, attempt: usize) -> bool {
        error.is_transport() && attempt < self.max_attempts
    }
}

/// Ask `question`, re-sending it on transport failures as `policy` allows
pub async fn ask_with_retry(
    client: &dyn AssistantClient,
    question: &str,
    policy: RetryPolicy,
) -> Result<String, ServiceError> {
    let mut attempt = 1;
    loop {
        match client.ask(question).await {
            Ok(answer) => return Ok(answer),
            Err(e) if policy.should_retry(&e, attempt) => {
                let delay = policy.backoff(attempt);
                log::warn!(
                    "attempt {}/{} failed ({}); retrying in {:?}",
                    attempt,
                    policy.max_attempts,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
