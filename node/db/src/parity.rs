// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{BatchOp, Error, KeyIter, Store};
use parity_db::{ColumnOptions, Db, Options};
use std::path::PathBuf;
use std::sync::Arc;

const COLUMN: u8 = 0;

/// LSM-backed store on `parity-db`. The single column is btree-indexed so
/// that `iter_keys` can enumerate the keyspace.
#[derive(Clone)]
pub struct ParityDb {
    db: Arc<Db>,
}

impl ParityDb {
    fn to_options(path: PathBuf) -> Options {
        Options {
            path,
            sync_wal: true,
            sync_data: true,
            stats: false,
            salt: None,
            columns: vec![ColumnOptions {
                btree_index: true,
                ..Default::default()
            }],
            compression_threshold: Default::default(),
        }
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        tracing::debug!(path = %path.display(), "opening parity-db store");
        let db = Db::open_or_create(&Self::to_options(path))?;
        Ok(Self { db: Arc::new(db) })
    }
}

impl Store for ParityDb {
    fn read<K>(&self, key: K) -> Result<Option<Vec<u8>>, Error>
    where
        K: AsRef<[u8]>,
    {
        self.db.get(COLUMN, key.as_ref()).map_err(Error::from)
    }

    fn write<K, V>(&self, key: K, value: V) -> Result<(), Error>
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        let tx = [(COLUMN, key.as_ref(), Some(value.as_ref().to_vec()))];
        self.db.commit(tx).map_err(Error::from)
    }

    fn delete<K>(&self, key: K) -> Result<(), Error>
    where
        K: AsRef<[u8]>,
    {
        let tx = [(COLUMN, key.as_ref(), None)];
        self.db.commit(tx).map_err(Error::from)
    }

    fn exists<K>(&self, key: K) -> Result<bool, Error>
    where
        K: AsRef<[u8]>,
    {
        self.db
            .get_size(COLUMN, key.as_ref())
            .map(|size| size.is_some())
            .map_err(Error::from)
    }

    fn size<K>(&self, key: K) -> Result<Option<u64>, Error>
    where
        K: AsRef<[u8]>,
    {
        self.db
            .get_size(COLUMN, key.as_ref())
            .map(|size| size.map(u64::from))
            .map_err(Error::from)
    }

    fn commit(&self, batch: Vec<BatchOp>) -> Result<(), Error> {
        // Maps directly onto the engine's atomic commit.
        let tx = batch.into_iter().map(|op| match op {
            BatchOp::Put { key, value } => (COLUMN, key, Some(value)),
            BatchOp::Delete { key } => (COLUMN, key, None),
        });
        self.db.commit(tx).map_err(Error::from)
    }

    fn iter_keys(&self) -> Result<KeyIter<'_>, Error> {
        let mut iter = self.db.iter(COLUMN)?;
        iter.seek_to_first()?;
        Ok(Box::new(std::iter::from_fn(move || {
            match iter.next() {
                Ok(Some((key, _value))) => Some(Ok(key)),
                Ok(None) => None,
                Err(e) => Some(Err(Error::from(e))),
            }
        })))
    }
}
