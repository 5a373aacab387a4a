//! Nullable chain view — scripted previous-output resolution for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use umbra_chain::{ChainError, ChainView, OutPoint, PrevOutput};
use umbra_types::{Address, HostAmount, TxHash};

/// A chain view whose previous outputs are seeded by the test.
/// Unseeded outpoints resolve to `None`, mimicking pruned history.
#[derive(Default)]
pub struct NullChainView {
    outputs: Mutex<HashMap<(TxHash, u32), PrevOutput>>,
}

impl NullChainView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the origin of `outpoint`.
    pub fn seed(&self, outpoint: OutPoint, address: Option<Address>, value: HostAmount) {
        self.outputs
            .lock()
            .unwrap()
            .insert((outpoint.txid, outpoint.vout), PrevOutput { address, value });
    }
}

impl ChainView for NullChainView {
    fn previous_output(&self, outpoint: &OutPoint) -> Result<Option<PrevOutput>, ChainError> {
        Ok(self
            .outputs
            .lock()
            .unwrap()
            .get(&(outpoint.txid, outpoint.vout))
            .cloned())
    }
}
