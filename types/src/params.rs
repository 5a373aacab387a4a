//! Protocol constants.
//!
//! These values are consensus-critical: changing any of them silently
//! diverges the decoded ledger from history. They are deliberately plain
//! constants rather than configuration.

/// The fixed host-chain address that received fundraiser contributions
/// during the protocol's bootstrap period. Every overlay transaction marks
/// itself with an output paying this address.
pub const EXODUS_ADDRESS: &str = "1ExodusUAZYgGUtKFuDRBRmZbMR4WmsLW";

/// First host-chain height at which overlay data exists. Blocks below this
/// height are skipped before entering the decode path.
pub const ACTIVATION_HEIGHT: u64 = 249_499;

/// Last host-chain height at which fundraiser contributions are recognized
/// for token allocation.
pub const FUNDRAISER_END_HEIGHT: u64 = 255_365;

/// Raw overlay units per host-chain smallest unit (and per whole token):
/// the fixed-point scale factor for the fundraiser conversion.
pub const HOST_UNIT_SCALE: u64 = 100_000_000;

/// Wire message-type tag for a simple send.
pub const SIMPLE_SEND_TYPE: u16 = 0;

/// Wire message-type tag reserved for decentralized-exchange messages.
/// Recognized structurally but not implemented.
pub const EXCHANGE_TYPE: u16 = 20;

/// Epoch (`T0`) of the developer-allocation vesting curve: the protocol
/// bootstrap instant.
pub const DEV_VESTING_EPOCH: u64 = 1_377_993_600;

/// Decay scale (`S`) of the vesting curve, in seconds: one Julian year.
/// Half of the remaining allocation vests every `S` seconds.
pub const DEV_VESTING_DECAY_SECS: u64 = 31_556_926;

/// Maximum developer allocation (`C_max`), in raw overlay units.
pub const DEV_ALLOCATION_MAX: u128 = 56_316 * HOST_UNIT_SCALE as u128;

/// Default capacity of the block ingestion queue. The chain watcher blocks
/// when the queue is full.
pub const BLOCK_QUEUE_CAPACITY: usize = 50;
