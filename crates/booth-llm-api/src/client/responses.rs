use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

use crate::client::{AssistantClient, ResponsesRequest, ToolConfig};
use crate::config::AssistantConfig;
use crate::error::ServiceError;

/// Client for the OpenAI Responses API
pub struct ResponsesClient {
    api_key: String,
    model: String,
    api_url: String,
    tools: Vec<ToolConfig>,
    verbose: bool,
    logs_dir: Option<PathBuf>,
    client: reqwest::Client,
}

impl ResponsesClient {
    pub fn new(config: AssistantConfig) -> Self {
        Self {
            api_key: config.api_key,
            model: config.model,
            api_url: config.api_url,
            tools: config.tools,
            verbose: config.verbose,
            logs_dir: config.logs_dir,
            client: reqwest::Client::new(),
        }
    }

    fn log_request(&self, request: &ResponsesRequest<'_>) -> Option<u64> {
        booth_logging::log_request(&self.api_url, request, &self.api_key, self.verbose);

        let logs_dir = self.logs_dir.as_ref()?;
        match booth_logging::log_request_to_file(
            logs_dir,
            &self.api_url,
            request,
            &self.model,
            &self.api_key,
        ) {
            Ok((_, timestamp)) => Some(timestamp),
            Err(e) => {
                log::warn!("request logging failed: {:#}", e);
                None
            }
        }
    }

    fn log_response(
        &self,
        status: &reqwest::StatusCode,
        headers: &reqwest::header::HeaderMap,
        body: &str,
        request_timestamp: Option<u64>,
    ) {
        booth_logging::log_response(status, headers, body, self.verbose);

        if let (Some(logs_dir), Some(ts)) = (self.logs_dir.as_ref(), request_timestamp) {
            if let Err(e) = booth_logging::log_response_to_file(
                logs_dir, status, headers, body, ts, &self.model,
            ) {
                log::warn!("response logging failed: {:#}", e);
            }
        }
    }
}

#[async_trait]
impl AssistantClient for ResponsesClient {
    async fn ask(&self, question: &str) -> Result<String, ServiceError> {
        if question.trim().is_empty() {
            return Err(ServiceError::invalid_request("question must not be empty"));
        }

        let request = ResponsesRequest {
            model: &self.model,
            input: question,
            tools: &self.tools,
        };
        let request_timestamp = self.log_request(&request);

        log::debug!("asking {} via {}", self.model, self.api_url);

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let response_text = response.text().await?;

        self.log_response(&status, &headers, &response_text, request_timestamp);

        if !status.is_success() {
            log::warn!("assistant service returned {}", status);
            return Err(ServiceError::status(
                status.as_u16(),
                error_message(&response_text),
            ));
        }

        let body: Value = serde_json::from_str(&response_text)
            .map_err(|e| ServiceError::malformed(format!("invalid JSON body: {}", e)))?;

        match extract_output_text(&body) {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(ServiceError::malformed("response contained no output text")),
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Pull the answer out of a Responses body.
///
/// Prefers the aggregated `output_text` field; otherwise joins every
/// `output_text` part of every `message` item in `output`.
pub(crate) fn extract_output_text(body: &Value) -> Option<String> {
    if let Some(text) = body.get("output_text").and_then(Value::as_str) {
        return Some(text.to_string());
    }

    let parts: Vec<&str> = body
        .get("output")?
        .as_array()?
        .iter()
        .filter(|item| item.get("type").and_then(Value::as_str) == Some("message"))
        .filter_map(|item| item.get("content").and_then(Value::as_array))
        .flatten()
        .filter(|part| part.get("type").and_then(Value::as_str) == Some("output_text"))
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.concat())
    }
}

/// Best-effort message from an error body (`{"error": {"message": ...}}`)
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| booth_logging::safe_truncate(body.trim(), 500))
}
