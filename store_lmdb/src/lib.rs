//! LMDB storage backend for the Umbra ledger.
//!
//! Implements the storage traits from `umbra-store` using the `heed` LMDB
//! bindings. Both logical stores live in named databases inside a single
//! environment: account records keyed by address bytes, raw overlay packs
//! keyed by big-endian height (so LMDB's key order is height order).

pub mod account;
pub mod environment;
pub mod error;
pub mod pack;

pub use account::LmdbAccountStore;
pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use pack::LmdbPackStore;
