//! Host-chain transaction primitives and watcher collaborator interfaces.
//!
//! The host chain's consensus, script interpreter, and networking are
//! external collaborators. This crate defines just enough of the host
//! transaction structure to carry overlay payloads, plus the two seams the
//! decoder and pipeline consume: [`ScriptInspector`] (output-script
//! classification and address recovery) and [`ChainView`] (previous-output
//! resolution).

pub mod error;
pub mod script;
pub mod transaction;
pub mod view;

pub use error::ChainError;
pub use script::{ScriptInspector, ScriptType, StandardInspector};
pub use transaction::{OutPoint, Transaction, TxIn, TxOut, WatchedBlock};
pub use view::{ChainView, PrevOutput};
