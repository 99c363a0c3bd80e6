use std::sync::Arc;

use crate::client::{AssistantClient, ResponsesClient};
use crate::config::AssistantConfig;

/// Client factory for creating assistant clients
pub struct ClientFactory;

impl ClientFactory {
    /// Create an assistant client from a complete configuration
    ///
    /// # Returns
    /// Arc-wrapped client implementing the AssistantClient trait, ready to be
    /// shared by every pipeline in the process
    pub fn create(config: AssistantConfig) -> Arc<dyn AssistantClient> {
        log::debug!("creating assistant client for model {}", config.model);
        Arc::new(ResponsesClient::new(config))
    }
}
