//! Nullable store — thread-safe in-memory storage for testing.

use std::collections::BTreeMap;
use std::sync::Mutex;

use umbra_store::account::{AccountStore, BalanceRecord};
use umbra_store::pack::{PackStore, TxPack};
use umbra_store::StoreError;
use umbra_types::Address;

/// An in-memory account + pack store for testing.
/// Thread-safe for use with tokio's multi-threaded runtime. BTreeMaps keep
/// iteration deterministic (addresses sorted, packs in height order).
#[derive(Default)]
pub struct NullStore {
    accounts: Mutex<BTreeMap<String, BalanceRecord>>,
    packs: Mutex<BTreeMap<u64, TxPack>>,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountStore for NullStore {
    fn get_record(&self, address: &Address) -> Result<BalanceRecord, StoreError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .get(address.as_str())
            .cloned()
            .unwrap_or_default())
    }

    fn put_record(&self, address: &Address, record: &BalanceRecord) -> Result<(), StoreError> {
        self.accounts
            .lock()
            .unwrap()
            .insert(address.as_str().to_string(), record.clone());
        Ok(())
    }

    fn record_count(&self) -> Result<u64, StoreError> {
        Ok(self.accounts.lock().unwrap().len() as u64)
    }

    fn iter_records(&self) -> Result<Vec<(Address, BalanceRecord)>, StoreError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .map(|(addr, record)| (Address::new(addr.clone()), record.clone()))
            .collect())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.accounts.lock().unwrap().clear();
        Ok(())
    }
}

impl PackStore for NullStore {
    fn persist_pack(&self, pack: &TxPack) -> Result<(), StoreError> {
        let mut packs = self.packs.lock().unwrap();
        if packs.contains_key(&pack.height) {
            return Err(StoreError::Duplicate(format!("pack at height {}", pack.height)));
        }
        packs.insert(pack.height, pack.clone());
        Ok(())
    }

    fn replace_pack(&self, pack: &TxPack) -> Result<(), StoreError> {
        self.packs.lock().unwrap().insert(pack.height, pack.clone());
        Ok(())
    }

    fn get_pack(&self, height: u64) -> Result<Option<TxPack>, StoreError> {
        Ok(self.packs.lock().unwrap().get(&height).cloned())
    }

    fn iter_packs(&self) -> Result<Vec<TxPack>, StoreError> {
        Ok(self.packs.lock().unwrap().values().cloned().collect())
    }

    fn pack_count(&self) -> Result<u64, StoreError> {
        Ok(self.packs.lock().unwrap().len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_types::{CurrencyId, TokenAmount, Timestamp};

    #[test]
    fn get_unseen_is_zero_record() {
        let store = NullStore::new();
        let record = store.get_record(&Address::new("nobody")).unwrap();
        assert!(record.is_zero());
    }

    #[test]
    fn put_get_round_trip() {
        let store = NullStore::new();
        let addr = Address::new("alice");
        let mut record = BalanceRecord::new();
        record.credit(CurrencyId::UMBRA, TokenAmount::new(5));
        store.put_record(&addr, &record).unwrap();
        assert_eq!(
            store.get_record(&addr).unwrap().balance(CurrencyId::UMBRA),
            TokenAmount::new(5)
        );
    }

    #[test]
    fn packs_iterate_in_height_order() {
        let store = NullStore::new();
        for height in [300u64, 100, 200] {
            store
                .persist_pack(&TxPack {
                    height,
                    time: Timestamp::EPOCH,
                    txs: Vec::new(),
                })
                .unwrap();
        }
        let heights: Vec<u64> = store.iter_packs().unwrap().iter().map(|p| p.height).collect();
        assert_eq!(heights, vec![100, 200, 300]);
    }

    #[test]
    fn duplicate_pack_refused() {
        let store = NullStore::new();
        let pack = TxPack {
            height: 1,
            time: Timestamp::EPOCH,
            txs: Vec::new(),
        };
        store.persist_pack(&pack).unwrap();
        assert!(matches!(
            store.persist_pack(&pack),
            Err(StoreError::Duplicate(_))
        ));
        store.replace_pack(&pack).unwrap();
    }
}
