use thiserror::Error;

/// Per-transaction decode failures.
///
/// All of these are local and non-fatal: the transaction is skipped and
/// logged, and the pipeline continues with the next one.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// No input could be traced to a previous output (e.g. pruned history),
    /// so the transaction's author cannot be determined.
    #[error("no transaction input could be traced to a previous output")]
    SenderUnresolved,

    /// The message-type tag was recognized structurally but is not in the
    /// known set. The protocol evolves; unknown tags must never crash the
    /// node.
    #[error("unsupported message type {tag}")]
    UnsupportedMessageType { tag: u16 },

    /// The transaction matched an encoding scheme but its payload could not
    /// be recovered.
    #[error("malformed overlay payload: {0}")]
    MalformedPayload(String),
}
