//! The ledger application layer: one entry point per protocol message.

use std::sync::Arc;

use crate::error::LedgerError;
use crate::fundraiser::apply_fundraiser;
use crate::simple_send::apply_simple_send;
use umbra_decoder::ProtocolMessage;
use umbra_store::account::AccountStore;
use umbra_types::{Address, CurrencyId, TokenAmount};

/// What applying one message did to the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Balances were mutated and persisted.
    Applied,
    /// The simple send failed its sufficiency check: economically invalid,
    /// no state change. Reported, never fatal.
    InsufficientBalance {
        sender: Address,
        currency: CurrencyId,
        needed: TokenAmount,
        available: TokenAmount,
    },
    /// The message kind is reserved and not applied (exchange).
    SkippedReserved,
}

/// The balance ledger: the sole mutator of account state.
///
/// The store is shared (`Arc`) so the verification harness can read
/// concurrently; writes are serialized through the single pipeline
/// consumer.
#[derive(Clone)]
pub struct Ledger {
    accounts: Arc<dyn AccountStore>,
}

impl Ledger {
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }

    pub fn accounts(&self) -> &Arc<dyn AccountStore> {
        &self.accounts
    }

    /// Apply one decoded message. Dispatch is exhaustive over the closed
    /// message set.
    pub fn apply(&self, message: &ProtocolMessage) -> Result<ApplyOutcome, LedgerError> {
        match message {
            ProtocolMessage::SimpleSend(send) => apply_simple_send(self.accounts.as_ref(), send),
            ProtocolMessage::FundraiserContribution(contribution) => {
                apply_fundraiser(self.accounts.as_ref(), contribution)?;
                Ok(ApplyOutcome::Applied)
            }
            ProtocolMessage::Exchange => {
                tracing::info!("exchange messages are reserved; skipping");
                Ok(ApplyOutcome::SkippedReserved)
            }
        }
    }

    /// Current balance of `currency` for `address` (zero when unseen).
    pub fn balance(&self, address: &Address, currency: CurrencyId) -> Result<TokenAmount, LedgerError> {
        Ok(self.accounts.get_record(address)?.balance(currency))
    }

    /// Discard all working state. Used by replay before re-deriving the
    /// ledger from persisted packs.
    pub fn reset(&self) -> Result<(), LedgerError> {
        self.accounts.clear()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_decoder::{FundraiserContribution, SimpleSend};
    use umbra_nullables::NullStore;
    use umbra_types::{HostAmount, Timestamp};

    fn ledger() -> Ledger {
        Ledger::new(Arc::new(NullStore::new()))
    }

    fn fund(ledger: &Ledger, addr: &str, currency: CurrencyId, amount: u128) {
        let address = Address::new(addr);
        let mut record = ledger.accounts().get_record(&address).unwrap();
        record.credit(currency, TokenAmount::new(amount));
        ledger.accounts().put_record(&address, &record).unwrap();
    }

    #[test]
    fn exchange_is_skipped_reserved() {
        let outcome = ledger().apply(&ProtocolMessage::Exchange).unwrap();
        assert_eq!(outcome, ApplyOutcome::SkippedReserved);
    }

    #[test]
    fn reset_discards_all_balances() {
        let ledger = ledger();
        fund(&ledger, "alice", CurrencyId::UMBRA, 100);
        ledger.reset().unwrap();
        assert_eq!(
            ledger.balance(&Address::new("alice"), CurrencyId::UMBRA).unwrap(),
            TokenAmount::ZERO
        );
    }

    #[test]
    fn apply_dispatches_to_both_handlers() {
        let ledger = ledger();
        fund(&ledger, "alice", CurrencyId::UMBRA, 100);

        let send = ProtocolMessage::SimpleSend(SimpleSend {
            sender: Address::new("alice"),
            receiver: Address::new("bob"),
            currency: CurrencyId::UMBRA,
            amount: TokenAmount::new(60),
        });
        assert_eq!(ledger.apply(&send).unwrap(), ApplyOutcome::Applied);

        let contribution = ProtocolMessage::FundraiserContribution(FundraiserContribution {
            contributor: Address::new("carol"),
            amount: HostAmount::new(3),
            time: Timestamp::new(1),
        });
        assert_eq!(ledger.apply(&contribution).unwrap(), ApplyOutcome::Applied);

        assert_eq!(
            ledger.balance(&Address::new("bob"), CurrencyId::UMBRA).unwrap(),
            TokenAmount::new(60)
        );
        assert_eq!(
            ledger.balance(&Address::new("carol"), CurrencyId::PENUMBRA).unwrap(),
            TokenAmount::new(300_000_000)
        );
    }
}
