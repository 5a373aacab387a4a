//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::account::LmdbAccountStore;
use crate::pack::LmdbPackStore;
use crate::LmdbError;

/// Number of named LMDB databases.
const MAX_DBS: u32 = 2;

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    accounts_db: Database<Bytes, Bytes>,
    packs_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at `path` with the given map size.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path).map_err(|e| LmdbError::Heed(e.to_string()))?;
        let env = unsafe {
            EnvOpenOptions::new()
                .max_dbs(MAX_DBS)
                .map_size(map_size)
                .open(path)?
        };
        let mut wtxn = env.write_txn()?;
        let accounts_db = env.create_database(&mut wtxn, Some("accounts"))?;
        let packs_db = env.create_database(&mut wtxn, Some("packs"))?;
        wtxn.commit()?;
        Ok(Self {
            env: Arc::new(env),
            accounts_db,
            packs_db,
        })
    }

    pub fn account_store(&self) -> LmdbAccountStore {
        LmdbAccountStore {
            env: Arc::clone(&self.env),
            accounts_db: self.accounts_db,
        }
    }

    pub fn pack_store(&self) -> LmdbPackStore {
        LmdbPackStore {
            env: Arc::clone(&self.env),
            packs_db: self.packs_db,
        }
    }
}
