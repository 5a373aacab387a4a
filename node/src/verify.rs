//! Balance verification harness.
//!
//! Diagnostic, not part of steady-state operation: loads a reference
//! snapshot of expected balances and reports every divergence from the
//! live ledger. A snapshot that cannot be loaded is a hard stop — a silent
//! partial comparison would be misleading.

use std::path::Path;

use serde::Deserialize;

use umbra_ledger::Ledger;
use umbra_types::{Address, CurrencyId, TokenAmount};

use crate::error::NodeError;

/// One reference record: an address and its expected founding-currency
/// balances, in raw units.
#[derive(Debug, Deserialize)]
struct ReferenceEntry {
    address: String,
    #[serde(default)]
    umbra: u128,
    #[serde(default)]
    penumbra: u128,
}

/// A single divergence between the reference snapshot and the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mismatch {
    pub address: Address,
    pub currency: CurrencyId,
    pub expected: TokenAmount,
    pub actual: TokenAmount,
}

/// Result of one verification run.
#[derive(Clone, Debug, Default)]
pub struct VerifyReport {
    /// Number of reference entries compared.
    pub compared: usize,
    pub mismatches: Vec<Mismatch>,
}

impl VerifyReport {
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Compare the ledger's balances against the snapshot at `path`.
///
/// Fails with [`NodeError::ReferenceLoad`] when the snapshot cannot be
/// read or parsed; ledger read failures propagate as store errors.
pub fn verify_balances(ledger: &Ledger, path: &Path) -> Result<VerifyReport, NodeError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| NodeError::ReferenceLoad(format!("{}: {e}", path.display())))?;
    let entries: Vec<ReferenceEntry> = serde_json::from_str(&raw)
        .map_err(|e| NodeError::ReferenceLoad(format!("{}: {e}", path.display())))?;

    let mut report = VerifyReport::default();
    for entry in &entries {
        let address = Address::new(entry.address.clone());
        for (currency, expected) in [
            (CurrencyId::UMBRA, TokenAmount::new(entry.umbra)),
            (CurrencyId::PENUMBRA, TokenAmount::new(entry.penumbra)),
        ] {
            let actual = ledger.balance(&address, currency)?;
            if actual != expected {
                tracing::warn!(
                    %address,
                    %currency,
                    %expected,
                    %actual,
                    "balance mismatch"
                );
                report.mismatches.push(Mismatch {
                    address: address.clone(),
                    currency,
                    expected,
                    actual,
                });
            }
        }
        report.compared += 1;
    }

    tracing::info!(
        compared = report.compared,
        failed = report.mismatches.len(),
        "balance verification finished"
    );
    Ok(report)
}
