//! Account storage: per-address balance records.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use umbra_types::{Address, CurrencyId, TokenAmount};

/// Per-currency balances for one address.
///
/// Amounts are unsigned, so non-negativity is structural: a debit that
/// would underflow is refused rather than applied. The map is a `BTreeMap`
/// so the serialized form is canonical — replay determinism compares
/// serialized ledger state byte for byte.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRecord {
    balances: BTreeMap<CurrencyId, TokenAmount>,
}

impl BalanceRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// The balance for a currency; zero when the currency has never been
    /// credited.
    pub fn balance(&self, currency: CurrencyId) -> TokenAmount {
        self.balances.get(&currency).copied().unwrap_or(TokenAmount::ZERO)
    }

    /// Credit `amount` to `currency`.
    pub fn credit(&mut self, currency: CurrencyId, amount: TokenAmount) {
        let entry = self.balances.entry(currency).or_insert(TokenAmount::ZERO);
        *entry = entry.saturating_add(amount);
    }

    /// Debit `amount` from `currency`. Returns `false` (leaving the record
    /// untouched) when the balance is insufficient.
    pub fn debit(&mut self, currency: CurrencyId, amount: TokenAmount) -> bool {
        match self.balance(currency).checked_sub(amount) {
            Some(remaining) => {
                self.balances.insert(currency, remaining);
                true
            }
            None => false,
        }
    }

    /// Whether every balance in the record is zero.
    pub fn is_zero(&self) -> bool {
        self.balances.values().all(|a| a.is_zero())
    }

    /// Iterate over (currency, amount) pairs in currency order.
    pub fn iter(&self) -> impl Iterator<Item = (CurrencyId, TokenAmount)> + '_ {
        self.balances.iter().map(|(c, a)| (*c, *a))
    }
}

/// Trait for account storage operations.
///
/// `get_record` never errors for an unseen address: it returns a
/// zero-valued record, created lazily on first mutation. `put_record` must
/// be durable before it returns. Implementations must support concurrent
/// readers alongside a single writer.
pub trait AccountStore: Send + Sync {
    fn get_record(&self, address: &Address) -> Result<BalanceRecord, StoreError>;
    fn put_record(&self, address: &Address, record: &BalanceRecord) -> Result<(), StoreError>;
    fn record_count(&self) -> Result<u64, StoreError>;
    fn iter_records(&self) -> Result<Vec<(Address, BalanceRecord)>, StoreError>;

    /// Discard every record. Used by replay to rebuild the ledger from
    /// persisted packs.
    fn clear(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unseen_currency_is_zero() {
        let record = BalanceRecord::new();
        assert_eq!(record.balance(CurrencyId::UMBRA), TokenAmount::ZERO);
        assert!(record.is_zero());
    }

    #[test]
    fn credit_then_debit() {
        let mut record = BalanceRecord::new();
        record.credit(CurrencyId::UMBRA, TokenAmount::new(100));
        assert!(record.debit(CurrencyId::UMBRA, TokenAmount::new(40)));
        assert_eq!(record.balance(CurrencyId::UMBRA), TokenAmount::new(60));
    }

    #[test]
    fn insufficient_debit_refused_without_mutation() {
        let mut record = BalanceRecord::new();
        record.credit(CurrencyId::UMBRA, TokenAmount::new(50));
        assert!(!record.debit(CurrencyId::UMBRA, TokenAmount::new(100)));
        assert_eq!(record.balance(CurrencyId::UMBRA), TokenAmount::new(50));
    }

    #[test]
    fn currencies_are_independent() {
        let mut record = BalanceRecord::new();
        record.credit(CurrencyId::UMBRA, TokenAmount::new(10));
        record.credit(CurrencyId::PENUMBRA, TokenAmount::new(20));
        assert!(!record.debit(CurrencyId::UMBRA, TokenAmount::new(15)));
        assert!(record.debit(CurrencyId::PENUMBRA, TokenAmount::new(15)));
        assert_eq!(record.balance(CurrencyId::PENUMBRA), TokenAmount::new(5));
    }
}
