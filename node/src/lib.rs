//! The Umbra node — wires the decoding pipeline to the ledger.
//!
//! The node is the single-consumer coordinator that:
//! - Accepts confirmed host-chain blocks from the external chain watcher
//!   through a bounded queue with backpressure
//! - Extracts and packages overlay-relevant transactions per block
//! - Persists raw packs and feeds them through the message decoder
//! - Rebuilds the ledger deterministically from persisted packs (replay)
//! - Compares ledger balances against a reference snapshot (verification)

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod replay;
pub mod shutdown;
pub mod verify;

pub use config::NodeConfig;
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use pipeline::{process_pack, BlockQueue, IngestPipeline, PackOutcome};
pub use replay::{ReplayEngine, ReplaySummary};
pub use shutdown::ShutdownController;
pub use verify::{verify_balances, Mismatch, VerifyReport};
