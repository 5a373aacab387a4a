use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("store error: {0}")]
    Store(#[from] umbra_store::StoreError),

    #[error("ledger error: {0}")]
    Ledger(#[from] umbra_ledger::LedgerError),

    #[error("chain watcher error: {0}")]
    Chain(#[from] umbra_chain::ChainError),

    #[error("config error: {0}")]
    Config(String),

    /// The verification harness could not read its comparison snapshot.
    /// Unrecoverable: no meaningful comparison can proceed.
    #[error("reference snapshot could not be loaded: {0}")]
    ReferenceLoad(String),

    #[error("block queue is closed")]
    QueueClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
