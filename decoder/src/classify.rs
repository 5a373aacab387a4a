//! Encoding-scheme classification.

use umbra_chain::{ScriptInspector, ScriptType, Transaction};

/// The two encoding styles used to embed overlay data in host transactions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodingClass {
    /// Plain: receiver and amount are read directly from pay-to-address
    /// outputs.
    SchemeA,
    /// Hidden: the payload is carried in place of real public keys inside
    /// multi-signature-style outputs.
    SchemeB,
}

/// Classify a transaction: any multisig-style output forces Scheme-B,
/// otherwise Scheme-A.
///
/// The rule is a deliberately conservative proxy for "is protocol data
/// hidden in pseudo-public-key bytes". Classification is total — every
/// transaction is exactly one of the two schemes — and must be preserved
/// exactly for compatibility with previously decoded history.
pub fn classify(tx: &Transaction, inspector: &dyn ScriptInspector) -> EncodingClass {
    for output in &tx.outputs {
        if inspector.script_type(&output.script_pubkey) == ScriptType::Multisig {
            return EncodingClass::SchemeB;
        }
    }
    EncodingClass::SchemeA
}
