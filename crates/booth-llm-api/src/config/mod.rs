use std::path::PathBuf;

use booth_types::{DEFAULT_MCP_SERVER_LABEL, DEFAULT_MCP_SERVER_URL, DEFAULT_MODEL};

use crate::client::ToolConfig;

pub mod factory;
pub use factory::ClientFactory;

/// Default OpenAI Responses API URL
pub const OPENAI_API_URL: &str = "https://api.openai.com/v1/responses";

/// Everything needed to build an assistant client
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub api_key: String,
    pub model: String,
    pub api_url: String,
    pub tools: Vec<ToolConfig>,
    /// Echo requests and responses to the console
    pub verbose: bool,
    /// When set, every exchange is also written to files in this directory
    pub logs_dir: Option<PathBuf>,
}

impl AssistantConfig {
    /// Config with the default model, endpoint and MCP tool
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            api_url: OPENAI_API_URL.to_string(),
            tools: vec![default_tool()],
            verbose: false,
            logs_dir: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Use a custom endpoint; bare hosts get the Responses path appended
    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_url = normalize_api_url(url);
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolConfig>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_logs_dir(mut self, logs_dir: Option<PathBuf>) -> Self {
        self.logs_dir = logs_dir;
        self
    }
}

/// The handbook MCP server the assistant consults by default
pub fn default_tool() -> ToolConfig {
    ToolConfig::mcp(DEFAULT_MCP_SERVER_LABEL, DEFAULT_MCP_SERVER_URL)
}

/// Normalize API URL by ensuring it points at the Responses endpoint
pub fn normalize_api_url(url: &str) -> String {
    let url = url.trim();

    // If URL already names the endpoint, use it as-is
    if url.contains("/responses") {
        return url.to_string();
    }

    // If URL ends with a slash, append path without leading slash
    if url.ends_with('/') {
        format!("{}v1/responses", url)
    } else if url.ends_with("/v1") {
        format!("{}/responses", url)
    } else {
        format!("{}/v1/responses", url)
    }
}
