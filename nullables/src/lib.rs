//! Nullable infrastructure for deterministic testing.
//!
//! In-memory substitutes for the storage backend and the chain watcher,
//! with no I/O and no wall-clock dependence.

pub mod chain;
pub mod store;

pub use chain::NullChainView;
pub use store::NullStore;
