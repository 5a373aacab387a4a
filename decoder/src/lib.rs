//! Block-to-message decoding for the Umbra overlay protocol.
//!
//! Turns host-chain transactions into typed protocol messages through a
//! fixed pipeline: classify the encoding scheme, extract the hidden fields,
//! and dispatch on the message-type tag. The classification and
//! sender-resolution rules here are consensus-critical — any deviation
//! silently diverges the ledger from previously decoded history, so both
//! are pure functions pinned by golden-vector tests.

pub mod classify;
pub mod decoder;
pub mod error;
pub mod extract;
pub mod message;
pub mod sender;

pub use classify::{classify, EncodingClass};
pub use decoder::{DecodeReport, MessageDecoder};
pub use error::DecodeError;
pub use extract::{extract_scheme_a, extract_scheme_b, payload_from_key, SchemeBPayload};
pub use message::{FundraiserContribution, ProtocolMessage, SimpleSend};
pub use sender::find_sender;
