#![allow(dead_code)]

use serde_json::json;
use wiremock::matchers::*;
use wiremock::{Mock, MockServer, ResponseTemplate};

use booth_llm_api::{AssistantConfig, ToolConfig};

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_MODEL: &str = "gpt-4.1-nano";

/// Mock server utilities for testing the Responses client
pub struct ResponsesMockServer {
    server: MockServer,
}

impl ResponsesMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn inner(&self) -> &MockServer {
        &self.server
    }

    /// Config pointing at this server with the test key and no tools
    pub fn config(&self) -> AssistantConfig {
        AssistantConfig::new(TEST_API_KEY.to_string())
            .with_model(TEST_MODEL)
            .with_api_url(&self.uri())
            .with_tools(vec![])
    }

    /// Config pointing at this server with one MCP tool
    pub fn config_with_tool(&self) -> AssistantConfig {
        self.config()
            .with_tools(vec![ToolConfig::mcp("handbook", "https://mcp.example.com/sse")])
    }

    /// Mock a successful answer carrying the aggregated `output_text`
    pub async fn mock_success(&self, question: &str, answer: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/responses"))
            .and(header("authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
            .and(body_partial_json(json!({
                "model": TEST_MODEL,
                "input": question
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "resp_test123",
                "object": "response",
                "model": TEST_MODEL,
                "status": "completed",
                "output_text": answer
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock a successful answer expressed only as `output` message items
    pub async fn mock_success_output_items(&self, parts: &[&str]) {
        let content: Vec<serde_json::Value> = parts
            .iter()
            .map(|text| json!({ "type": "output_text", "text": text, "annotations": [] }))
            .collect();

        Mock::given(method("POST"))
            .and(path("/v1/responses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "resp_test456",
                "object": "response",
                "status": "completed",
                "output": [
                    {
                        "type": "mcp_list_tools",
                        "server_label": "handbook",
                        "tools": []
                    },
                    {
                        "type": "message",
                        "role": "assistant",
                        "content": content
                    }
                ]
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock an OpenAI-style error response
    pub async fn mock_error(&self, status: u16, error_body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path("/v1/responses"))
            .respond_with(ResponseTemplate::new(status).set_body_json(error_body))
            .mount(&self.server)
            .await;
    }

    /// Mock an arbitrary raw body
    pub async fn mock_raw(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/responses"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Fail verification if any request reaches the server
    pub async fn expect_no_requests(&self) {
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.server)
            .await;
    }

    /// JSON bodies of every request received so far
    pub async fn received_bodies(&self) -> Vec<serde_json::Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|req| serde_json::from_slice(&req.body).ok())
            .collect()
    }
}

/// Error bodies for testing
pub mod error_scenarios {
    use serde_json::json;

    pub fn authentication_error() -> serde_json::Value {
        json!({
            "error": {
                "message": "Incorrect API key provided: test-api***",
                "type": "invalid_request_error",
                "code": "invalid_api_key"
            }
        })
    }

    pub fn rate_limit_error() -> serde_json::Value {
        json!({
            "error": {
                "message": "Rate limit reached for gpt-4.1-nano",
                "type": "requests",
                "code": "rate_limit_exceeded"
            }
        })
    }

    pub fn server_error() -> serde_json::Value {
        json!({
            "error": {
                "message": "The server had an error while processing your request.",
                "type": "server_error"
            }
        })
    }
}
