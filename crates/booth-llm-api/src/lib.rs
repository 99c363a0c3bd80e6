//! # booth-llm-api
//!
//! Client for the language-model service that answers booth questions.
//!
//! ## Features
//!
//! - **Single operation**: the `AssistantClient` trait turns a question into
//!   answer text
//! - **Classified failures**: `ServiceError` distinguishes transport errors,
//!   non-success responses and malformed/empty bodies
//! - **Tool pass-through**: a fixed MCP tool configuration is forwarded with
//!   every request
//! - **Request logging**: optional console and file logging of each exchange
//!
//! No retries happen in this crate; callers decide on a retry policy.
//!
//! ## Example
//!
//! ```rust,no_run
//! use booth_llm_api::{AssistantConfig, ClientFactory};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AssistantConfig::new("your-api-key".to_string());
//!     let client = ClientFactory::create(config);
//!
//!     let answer = client.ask("What is the dress code?").await?;
//!     println!("{}", answer);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use client::{
    AssistantClient,
    ResponsesClient,
    ResponsesRequest,
    ToolConfig,
};

pub use config::{
    AssistantConfig,
    ClientFactory,
    OPENAI_API_URL,
    normalize_api_url,
};

pub use error::{ServiceError, ServiceErrorKind};
