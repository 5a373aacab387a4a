//! LMDB implementation of PackStore.
//!
//! Keys are big-endian block heights, so LMDB's lexicographic key order is
//! ascending height order and `iter_packs` needs no sort.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use umbra_store::pack::{PackStore, TxPack};
use umbra_store::StoreError;

use crate::LmdbError;

pub struct LmdbPackStore {
    pub(crate) env: Arc<Env>,
    pub(crate) packs_db: Database<Bytes, Bytes>,
}

impl LmdbPackStore {
    fn write_pack(&self, pack: &TxPack) -> Result<(), LmdbError> {
        let key = pack.height.to_be_bytes();
        let bytes = bincode::serialize(pack)?;
        let mut wtxn = self.env.write_txn()?;
        self.packs_db.put(&mut wtxn, &key, &bytes)?;
        wtxn.commit()?;
        Ok(())
    }
}

impl PackStore for LmdbPackStore {
    fn persist_pack(&self, pack: &TxPack) -> Result<(), StoreError> {
        let key = pack.height.to_be_bytes();
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let exists = self
            .packs_db
            .get(&rtxn, &key)
            .map_err(LmdbError::from)?
            .is_some();
        drop(rtxn);
        if exists {
            return Err(StoreError::Duplicate(format!("pack at height {}", pack.height)));
        }
        self.write_pack(pack).map_err(StoreError::from)
    }

    fn replace_pack(&self, pack: &TxPack) -> Result<(), StoreError> {
        self.write_pack(pack).map_err(StoreError::from)
    }

    fn get_pack(&self, height: u64) -> Result<Option<TxPack>, StoreError> {
        let key = height.to_be_bytes();
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self.packs_db.get(&rtxn, &key).map_err(LmdbError::from)? {
            Some(bytes) => {
                let pack: TxPack = bincode::deserialize(bytes).map_err(LmdbError::from)?;
                Ok(Some(pack))
            }
            None => Ok(None),
        }
    }

    fn iter_packs(&self) -> Result<Vec<TxPack>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.packs_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut packs = Vec::new();
        for entry in iter {
            let (_key, val) = entry.map_err(LmdbError::from)?;
            let pack: TxPack = bincode::deserialize(val).map_err(LmdbError::from)?;
            packs.push(pack);
        }
        Ok(packs)
    }

    fn pack_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let count = self.packs_db.len(&rtxn).map_err(LmdbError::from)?;
        Ok(count)
    }
}
