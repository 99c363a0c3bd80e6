use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

pub mod responses;

pub use responses::ResponsesClient;

/// Tool configuration forwarded verbatim to the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolConfig {
    /// Remote MCP server the model may consult while answering
    Mcp {
        server_label: String,
        server_url: String,
    },
}

impl ToolConfig {
    pub fn mcp(server_label: impl Into<String>, server_url: impl Into<String>) -> Self {
        ToolConfig::Mcp {
            server_label: server_label.into(),
            server_url: server_url.into(),
        }
    }
}

/// Request body for the Responses endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ResponsesRequest<'a> {
    pub model: &'a str,
    pub input: &'a str,
    #[serde(skip_serializing_if = "<[ToolConfig]>::is_empty")]
    pub tools: &'a [ToolConfig],
}

/// Assistant client trait - the one call the rest of the app needs
#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// Send `question` to the service and return its answer text.
    ///
    /// The question must be non-empty. Failures are classified in
    /// [`ServiceError`]; no retry is attempted here.
    async fn ask(&self, question: &str) -> Result<String, ServiceError>;

    /// Model identifier used for requests, for display and logging
    fn model(&self) -> &str;
}
