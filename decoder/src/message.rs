//! Typed protocol messages.
//!
//! A closed set: the dispatch site pattern-matches exhaustively, so adding
//! a message kind is a compile-time-checked change. Each message is
//! immutable once constructed and consumed exactly once by its handler.

use umbra_types::{Address, CurrencyId, HostAmount, Timestamp, TokenAmount};

/// Transfer of `amount` raw units of `currency` from `sender` to `receiver`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleSend {
    pub sender: Address,
    pub receiver: Address,
    pub currency: CurrencyId,
    pub amount: TokenAmount,
}

/// A fundraiser contribution: host-chain value paid to the exodus address
/// during the bootstrap period.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FundraiserContribution {
    pub contributor: Address,
    /// Contributed amount in the host chain's smallest unit.
    pub amount: HostAmount,
    /// The contributing block's header timestamp.
    pub time: Timestamp,
}

/// The closed set of overlay protocol messages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProtocolMessage {
    SimpleSend(SimpleSend),
    FundraiserContribution(FundraiserContribution),
    /// Decentralized-exchange message. Reserved: decoded structurally but
    /// not applied.
    Exchange,
}

impl ProtocolMessage {
    /// Short label for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            ProtocolMessage::SimpleSend(_) => "simple_send",
            ProtocolMessage::FundraiserContribution(_) => "fundraiser_contribution",
            ProtocolMessage::Exchange => "exchange",
        }
    }
}
