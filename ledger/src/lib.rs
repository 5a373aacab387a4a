//! The Umbra balance ledger.
//!
//! Applies decoded protocol messages to per-address balance records with
//! strict accounting invariants: amounts never go negative, a failed
//! sufficiency check changes nothing, and every mutation is durable before
//! it is acknowledged.

pub mod error;
pub mod fundraiser;
pub mod ledger;
pub mod simple_send;

pub use error::LedgerError;
pub use fundraiser::dev_allocation;
pub use ledger::{ApplyOutcome, Ledger};
