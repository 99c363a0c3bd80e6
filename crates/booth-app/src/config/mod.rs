use anyhow::{bail, Result};
use std::path::PathBuf;
use std::time::Duration;

use booth_llm_api::{AssistantConfig, ToolConfig};

use crate::cli::Cli;
use crate::retry::RetryPolicy;

pub mod helpers;

pub use helpers::{default_speech_command, resolve_data_dir};

/// Settings resolved from CLI flags, environment and defaults
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_url: String,
    pub tools: Vec<ToolConfig>,
    pub data_dir: PathBuf,
    pub speech_command: String,
    pub voice: String,
    pub retry: RetryPolicy,
    pub verbose: bool,
}

impl ClientConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let tools = if cli.no_tools {
            Vec::new()
        } else {
            vec![ToolConfig::mcp(&cli.mcp_server_label, &cli.mcp_server_url)]
        };

        Ok(Self {
            api_key: cli.api_key.clone().filter(|key| !key.trim().is_empty()),
            model: cli.model.clone(),
            api_url: cli.api_url.clone(),
            tools,
            data_dir: resolve_data_dir(cli.data_dir.as_deref())?,
            speech_command: cli
                .speech_command
                .clone()
                .unwrap_or_else(|| default_speech_command().to_string()),
            voice: cli.voice.clone(),
            retry: RetryPolicy::new(cli.max_attempts, Duration::from_millis(cli.retry_delay_ms)),
            verbose: cli.verbose,
        })
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    /// Configuration for the assistant client. Only asking needs a key, so
    /// a missing one is reported here rather than at startup.
    pub fn assistant_config(&self) -> Result<AssistantConfig> {
        let Some(api_key) = self.api_key.clone() else {
            bail!("OPENAI_API_KEY environment variable not set. Pass --api-key or add it to .env.");
        };

        let logs_dir = if self.verbose {
            Some(booth_logging::get_logs_dir(&self.data_dir)?)
        } else {
            None
        };

        Ok(AssistantConfig::new(api_key)
            .with_model(self.model.clone())
            .with_api_url(&self.api_url)
            .with_tools(self.tools.clone())
            .with_verbose(self.verbose)
            .with_logs_dir(logs_dir))
    }
}
