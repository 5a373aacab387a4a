use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("chain watcher backend error: {0}")]
    Backend(String),
}
