use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("question must not be empty")]
    EmptyQuestion,
    #[error("failed to read history: {0}")]
    StorageRead(String),
    #[error("failed to save history: {0}")]
    StorageWrite(String),
}

impl HistoryError {
    pub fn is_write_failure(&self) -> bool {
        matches!(self, HistoryError::StorageWrite(_))
    }
}
