//! Field extraction for the two encoding schemes.
//!
//! Scheme-A reads receiver and amount straight from plain outputs.
//! Scheme-B recovers them from the pseudo-public-keys of multisig-style
//! outputs. The Scheme-B byte layout is a versioned contract (v1 below),
//! pinned against golden vectors — it must not be re-derived from drafts.

use crate::error::DecodeError;
use crate::message::SimpleSend;
use umbra_chain::{ScriptInspector, ScriptType, Transaction};
use umbra_types::{Address, CurrencyId, HostAmount, TokenAmount};

/// Fields recovered from the first data key of a Scheme-B transaction.
///
/// Contract v1 — layout inside a 33-byte pseudo-public-key:
///
/// ```text
/// byte  0        compression prefix (ignored)
/// bytes 1..3     protocol version, u16 big-endian
/// bytes 3..5     message-type tag, u16 big-endian
/// bytes 5..9     currency id, u32 big-endian
/// bytes 9..17    amount in raw overlay units, u64 big-endian
/// bytes 17..33   padding (ignored)
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemeBPayload {
    pub version: u16,
    pub msg_type: u16,
    pub currency: CurrencyId,
    pub amount: TokenAmount,
}

/// Decode the v1 payload carried by one pseudo-public-key.
pub fn payload_from_key(key: &[u8]) -> Result<SchemeBPayload, DecodeError> {
    if key.len() < 17 {
        return Err(DecodeError::MalformedPayload(format!(
            "data key of {} bytes is too short for the v1 layout",
            key.len()
        )));
    }
    let version = u16::from_be_bytes([key[1], key[2]]);
    let msg_type = u16::from_be_bytes([key[3], key[4]]);
    let currency = u32::from_be_bytes([key[5], key[6], key[7], key[8]]);
    let amount = u64::from_be_bytes([
        key[9], key[10], key[11], key[12], key[13], key[14], key[15], key[16],
    ]);
    Ok(SchemeBPayload {
        version,
        msg_type,
        currency: CurrencyId::new(currency),
        amount: TokenAmount::new(amount as u128),
    })
}

/// Plain outputs of `tx` as (address, value) pairs, in output order.
fn plain_outputs(tx: &Transaction, inspector: &dyn ScriptInspector) -> Vec<(Address, HostAmount)> {
    let mut outputs = Vec::new();
    for txout in &tx.outputs {
        if inspector.script_type(&txout.script_pubkey) != ScriptType::Plain {
            continue;
        }
        for address in inspector.addresses(&txout.script_pubkey) {
            outputs.push((address, txout.value));
        }
    }
    outputs
}

/// The pseudo-public-keys that may carry hidden payload: every key after
/// the first in each multisig output, in output order. The first key of
/// each output is the spender's real key.
pub fn data_keys(tx: &Transaction, inspector: &dyn ScriptInspector) -> Vec<Vec<u8>> {
    let mut keys = Vec::new();
    for txout in &tx.outputs {
        let mut slot = inspector.multisig_keys(&txout.script_pubkey);
        if slot.len() > 1 {
            keys.extend(slot.drain(1..));
        }
    }
    keys
}

/// Extract a Scheme-A simple send.
///
/// The receiver is the first plain output paid to an address that is
/// neither the exodus address nor the sender; the amount is that output's
/// value in host units, used directly as raw overlay units; the currency is
/// always the primary founding token.
pub fn extract_scheme_a(
    tx: &Transaction,
    inspector: &dyn ScriptInspector,
    exodus: &Address,
    sender: &Address,
) -> Result<SimpleSend, DecodeError> {
    plain_outputs(tx, inspector)
        .into_iter()
        .find(|(address, _)| address != exodus && address != sender)
        .map(|(receiver, value)| SimpleSend {
            sender: sender.clone(),
            receiver,
            currency: CurrencyId::UMBRA,
            amount: TokenAmount::new(value.raw() as u128),
        })
        .ok_or_else(|| {
            DecodeError::MalformedPayload("no candidate receiver output".to_string())
        })
}

/// Extract the Scheme-B payload and receiver.
///
/// The payload comes from the first recovered data key; the receiver is the
/// first plain output address other than the exodus marker.
pub fn extract_scheme_b(
    tx: &Transaction,
    inspector: &dyn ScriptInspector,
    exodus: &Address,
) -> Result<(SchemeBPayload, Address), DecodeError> {
    let keys = data_keys(tx, inspector);
    let first = keys.first().ok_or_else(|| {
        DecodeError::MalformedPayload("multisig outputs carry no data keys".to_string())
    })?;
    let payload = payload_from_key(first)?;

    let receiver = plain_outputs(tx, inspector)
        .into_iter()
        .map(|(address, _)| address)
        .find(|address| address != exodus)
        .ok_or_else(|| {
            DecodeError::MalformedPayload("no plain output names a receiver".to_string())
        })?;

    Ok((payload, receiver))
}
