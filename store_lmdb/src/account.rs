//! LMDB implementation of AccountStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use umbra_store::account::{AccountStore, BalanceRecord};
use umbra_store::StoreError;
use umbra_types::Address;

use crate::LmdbError;

pub struct LmdbAccountStore {
    pub(crate) env: Arc<Env>,
    pub(crate) accounts_db: Database<Bytes, Bytes>,
}

impl AccountStore for LmdbAccountStore {
    fn get_record(&self, address: &Address) -> Result<BalanceRecord, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .accounts_db
            .get(&rtxn, address.as_str().as_bytes())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => {
                let record: BalanceRecord =
                    bincode::deserialize(bytes).map_err(LmdbError::from)?;
                Ok(record)
            }
            // Unseen addresses hold a zero record; it is materialized on
            // first put.
            None => Ok(BalanceRecord::new()),
        }
    }

    fn put_record(&self, address: &Address, record: &BalanceRecord) -> Result<(), StoreError> {
        let bytes = bincode::serialize(record).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.accounts_db
            .put(&mut wtxn, address.as_str().as_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn record_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let count = self.accounts_db.len(&rtxn).map_err(LmdbError::from)?;
        Ok(count)
    }

    fn iter_records(&self) -> Result<Vec<(Address, BalanceRecord)>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.accounts_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut records = Vec::new();
        for entry in iter {
            let (key, val) = entry.map_err(LmdbError::from)?;
            let addr_str =
                std::str::from_utf8(key).map_err(|e| LmdbError::Serialization(e.to_string()))?;
            let record: BalanceRecord = bincode::deserialize(val).map_err(LmdbError::from)?;
            records.push((Address::new(addr_str), record));
        }
        Ok(records)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.accounts_db.clear(&mut wtxn).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
