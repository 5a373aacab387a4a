use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// A store read or write failed. Fatal for the current operation: the
    /// record could not be durably recorded, so continuing would violate
    /// the ledger's durability invariant.
    #[error("store error: {0}")]
    Store(#[from] umbra_store::StoreError),
}
