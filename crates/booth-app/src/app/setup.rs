use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

use booth_history::HistoryStore;
use booth_llm_api::{AssistantClient, ClientFactory};

use crate::cli::Cli;
use crate::config::ClientConfig;
use crate::pipeline::QueryPipeline;
use crate::speech::{CommandSpeechEngine, SpeechController, SpeechEngine, SpeechNotices};

/// Process-wide state shared by every command and the REPL
pub struct AppConfig {
    pub client_config: ClientConfig,
    pub store: Arc<HistoryStore>,
    pub speech: SpeechController,
    pub speech_notices: SpeechNotices,
    client: Option<Arc<dyn AssistantClient>>,
}

impl AppConfig {
    /// Assemble from already-built parts
    pub fn from_parts(
        client_config: ClientConfig,
        store: Arc<HistoryStore>,
        engine: Arc<dyn SpeechEngine>,
        client: Option<Arc<dyn AssistantClient>>,
    ) -> Self {
        let (speech, speech_notices) = SpeechController::new(engine);
        Self {
            client_config,
            store,
            speech,
            speech_notices,
            client,
        }
    }

    /// A fresh pipeline for one answer view
    pub fn new_pipeline(&self) -> Result<QueryPipeline> {
        let client = match &self.client {
            Some(client) => Arc::clone(client),
            // Without a key this reports what is missing
            None => ClientFactory::create(self.client_config.assistant_config()?),
        };
        Ok(QueryPipeline::new(client).with_retry(self.client_config.retry))
    }
}

/// Set up application state from CLI arguments
pub fn setup_from_cli(cli: &Cli) -> Result<AppConfig> {
    let client_config = ClientConfig::from_cli(cli)?;

    let store = Arc::new(HistoryStore::open(&client_config.data_dir));
    let engine = CommandSpeechEngine::new(client_config.speech_command.clone())
        .with_voice(Some(client_config.voice.clone()));

    // History commands work without a key; asking reports it when needed
    let client = match client_config.assistant_config() {
        Ok(config) => Some(ClientFactory::create(config)),
        Err(e) => {
            log::debug!("assistant client not configured: {}", e);
            None
        }
    };

    if cli.verbose {
        eprintln!(
            "{} model {} • data in {}",
            "🤖".cyan(),
            client_config.model.bright_white(),
            client_config.data_dir.display()
        );
    }

    Ok(AppConfig::from_parts(client_config, store, Arc::new(engine), client))
}
