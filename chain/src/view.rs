//! Read-only view of the host chain, provided by the chain watcher.

use crate::error::ChainError;
use crate::transaction::OutPoint;
use umbra_types::{Address, HostAmount};

/// The resolved origin of a spent output: who was paid, and how much.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrevOutput {
    /// The paid address, when the output script is address-bearing.
    pub address: Option<Address>,
    pub value: HostAmount,
}

/// Previous-output resolution against the host chain.
///
/// May be called concurrently; implementations are read-only. Returns
/// `Ok(None)` when the referenced output cannot be traced (e.g. pruned
/// history) — that is an expected condition, not an error.
pub trait ChainView: Send + Sync {
    fn previous_output(&self, outpoint: &OutPoint) -> Result<Option<PrevOutput>, ChainError>;
}
