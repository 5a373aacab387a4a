//! Host-chain transaction structure.
//!
//! Only the fields the overlay decoder reads are modeled: output values and
//! scripts, and input previous-output references. The transactions are
//! assumed consensus-valid on the host chain before they reach this crate.

use serde::{Deserialize, Serialize};
use umbra_types::{HostAmount, Timestamp, TxHash};

/// Reference to a specific output of a previous transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub txid: TxHash,
    pub vout: u32,
}

/// A transaction input spending a previous output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxIn {
    pub prevout: OutPoint,
    pub script_sig: Vec<u8>,
    pub sequence: u32,
}

/// A transaction output: a value locked by a script.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOut {
    pub value: HostAmount,
    pub script_pubkey: Vec<u8>,
}

/// A host-chain transaction, as delivered by the chain watcher.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// The host-chain transaction id, carried through from the watcher.
    pub txid: TxHash,
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
}

/// A confirmed block as handed to the ingestion pipeline: height, header
/// timestamp, and the block's transactions in consensus order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchedBlock {
    pub height: u64,
    pub time: Timestamp,
    pub txs: Vec<Transaction>,
}
