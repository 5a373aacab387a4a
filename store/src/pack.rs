//! Raw overlay packages: the persisted, replayable unit of one block's
//! overlay-relevant transactions.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use umbra_chain::Transaction;
use umbra_types::{Address, HostAmount, Timestamp};

/// The resolved origin of one transaction input, captured at ingestion time.
///
/// Embedding origins in the pack makes it independently re-decodable: replay
/// never consults the live chain, and sender resolution is a pure function
/// of pack contents. `address` is `None` when the input could not be traced
/// to a previous output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputOrigin {
    pub address: Option<Address>,
    pub value: HostAmount,
}

/// One overlay-relevant transaction plus its resolved input origins, in
/// input order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayTx {
    pub tx: Transaction,
    pub origins: Vec<InputOrigin>,
}

/// The overlay-relevant transactions of one block, with the block's height
/// and header timestamp. Immutable once persisted; replayed strictly in
/// ascending height order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxPack {
    pub height: u64,
    pub time: Timestamp,
    pub txs: Vec<OverlayTx>,
}

/// Trait for raw-package storage.
pub trait PackStore: Send + Sync {
    /// Persist a pack, keyed by height. Write-once: an existing pack at the
    /// same height yields [`StoreError::Duplicate`].
    fn persist_pack(&self, pack: &TxPack) -> Result<(), StoreError>;

    /// Explicitly overwrite the pack at `pack.height`, whether or not one
    /// exists.
    fn replace_pack(&self, pack: &TxPack) -> Result<(), StoreError>;

    fn get_pack(&self, height: u64) -> Result<Option<TxPack>, StoreError>;

    /// All persisted packs in ascending height order.
    fn iter_packs(&self) -> Result<Vec<TxPack>, StoreError>;

    fn pack_count(&self) -> Result<u64, StoreError>;
}
