//! Fundamental types for the Umbra overlay protocol.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: host-chain addresses, currency identifiers, fixed-point token
//! amounts, transaction hashes, timestamps, and protocol constants.

pub mod address;
pub mod amount;
pub mod currency;
pub mod hash;
pub mod params;
pub mod time;

pub use address::Address;
pub use amount::{HostAmount, TokenAmount};
pub use currency::CurrencyId;
pub use hash::TxHash;
pub use time::Timestamp;
