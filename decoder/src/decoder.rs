//! The message decoder: a per-transaction state machine.
//!
//! 1. Classify the encoding scheme.
//! 2. Extract fields per scheme.
//! 3. Dispatch on the message-type tag into a typed [`ProtocolMessage`].
//! 4. Independently, at or below the fundraiser cutoff height, evaluate the
//!    transaction as a candidate fundraiser contribution.
//!
//! A single transaction therefore yields zero, one, or two messages. Decode
//! failures are local: the transaction is skipped and reported, never fatal.

use std::sync::Arc;

use crate::classify::{classify, EncodingClass};
use crate::error::DecodeError;
use crate::extract::{extract_scheme_a, extract_scheme_b};
use crate::message::{FundraiserContribution, ProtocolMessage, SimpleSend};
use crate::sender::find_sender;
use umbra_chain::{ScriptInspector, Transaction};
use umbra_store::pack::{OverlayTx, TxPack};
use umbra_types::params::{EXCHANGE_TYPE, FUNDRAISER_END_HEIGHT, SIMPLE_SEND_TYPE};
use umbra_types::{Address, HostAmount, Timestamp};

/// Everything a decode produced for one transaction or pack: the messages
/// to hand to the ledger, in application order, and the failures that were
/// skipped per policy.
#[derive(Debug, Default)]
pub struct DecodeReport {
    pub messages: Vec<ProtocolMessage>,
    pub skipped: Vec<DecodeError>,
}

impl DecodeReport {
    fn absorb(&mut self, other: DecodeReport) {
        self.messages.extend(other.messages);
        self.skipped.extend(other.skipped);
    }
}

/// Decodes overlay transactions into protocol messages.
pub struct MessageDecoder {
    inspector: Arc<dyn ScriptInspector>,
    exodus: Address,
}

impl MessageDecoder {
    pub fn new(inspector: Arc<dyn ScriptInspector>, exodus: Address) -> Self {
        Self { inspector, exodus }
    }

    pub fn exodus_address(&self) -> &Address {
        &self.exodus
    }

    pub fn inspector(&self) -> &Arc<dyn ScriptInspector> {
        &self.inspector
    }

    /// Decode every transaction of a pack, in block order. Message order in
    /// the report follows transaction order — the ledger applies them as-is.
    pub fn decode_pack(&self, pack: &TxPack) -> DecodeReport {
        let mut report = DecodeReport::default();
        for otx in &pack.txs {
            report.absorb(self.decode_transaction(otx, pack.height, pack.time));
        }
        report
    }

    /// Decode one transaction at the given block height and time.
    pub fn decode_transaction(
        &self,
        otx: &OverlayTx,
        height: u64,
        time: Timestamp,
    ) -> DecodeReport {
        let mut report = DecodeReport::default();

        let sender = match find_sender(&otx.origins) {
            Ok(sender) => sender,
            Err(err) => {
                tracing::warn!(txid = %otx.tx.txid, %err, "skipping transaction");
                report.skipped.push(err);
                return report;
            }
        };

        match self.decode_general(&otx.tx, &sender) {
            Ok(message) => {
                tracing::info!(
                    txid = %otx.tx.txid,
                    kind = message.kind(),
                    sender = %sender,
                    "decoded protocol message"
                );
                report.messages.push(message);
            }
            Err(err) => {
                tracing::warn!(txid = %otx.tx.txid, %err, "transaction skipped");
                report.skipped.push(err);
            }
        }

        // Fundraiser evaluation is independent of the general decode above.
        if height <= FUNDRAISER_END_HEIGHT {
            let contributed = self.exodus_output_sum(&otx.tx);
            if !contributed.is_zero() {
                tracing::info!(
                    txid = %otx.tx.txid,
                    contributor = %sender,
                    amount = %contributed,
                    "decoded fundraiser contribution"
                );
                report
                    .messages
                    .push(ProtocolMessage::FundraiserContribution(FundraiserContribution {
                        contributor: sender,
                        amount: contributed,
                        time,
                    }));
            }
        }

        report
    }

    /// Steps 1–3 of the state machine: classify, extract, dispatch.
    fn decode_general(
        &self,
        tx: &Transaction,
        sender: &Address,
    ) -> Result<ProtocolMessage, DecodeError> {
        let class = classify(tx, self.inspector.as_ref());
        tracing::debug!(txid = %tx.txid, ?class, "classified transaction");

        match class {
            EncodingClass::SchemeA => {
                let send = extract_scheme_a(tx, self.inspector.as_ref(), &self.exodus, sender)?;
                Ok(ProtocolMessage::SimpleSend(send))
            }
            EncodingClass::SchemeB => {
                let (payload, receiver) =
                    extract_scheme_b(tx, self.inspector.as_ref(), &self.exodus)?;
                match payload.msg_type {
                    SIMPLE_SEND_TYPE => Ok(ProtocolMessage::SimpleSend(SimpleSend {
                        sender: sender.clone(),
                        receiver,
                        currency: payload.currency,
                        amount: payload.amount,
                    })),
                    EXCHANGE_TYPE => Ok(ProtocolMessage::Exchange),
                    tag => Err(DecodeError::UnsupportedMessageType { tag }),
                }
            }
        }
    }

    /// Total host-chain value this transaction pays to the exodus address.
    fn exodus_output_sum(&self, tx: &Transaction) -> HostAmount {
        let mut total = HostAmount::ZERO;
        for output in &tx.outputs {
            let paid_to_exodus = self
                .inspector
                .addresses(&output.script_pubkey)
                .iter()
                .any(|address| *address == self.exodus);
            if paid_to_exodus {
                total = total.saturating_add(output.value);
            }
        }
        total
    }
}
