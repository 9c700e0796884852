// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{BatchOp, Error, KeyIter, Store};
use parking_lot::RwLock;
use std::collections::HashMap;

/// A thread-safe in-memory store. A batch commit takes the write lock once,
/// so readers never observe a partially applied batch.
#[derive(Default)]
pub struct MemoryDb {
    db: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.db.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.read().is_empty()
    }
}

impl Clone for MemoryDb {
    fn clone(&self) -> Self {
        Self {
            db: RwLock::new(self.db.read().clone()),
        }
    }
}

impl Store for MemoryDb {
    fn read<K>(&self, key: K) -> Result<Option<Vec<u8>>, Error>
    where
        K: AsRef<[u8]>,
    {
        Ok(self.db.read().get(key.as_ref()).cloned())
    }

    fn write<K, V>(&self, key: K, value: V) -> Result<(), Error>
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        self.db
            .write()
            .insert(key.as_ref().to_vec(), value.as_ref().to_vec());
        Ok(())
    }

    fn delete<K>(&self, key: K) -> Result<(), Error>
    where
        K: AsRef<[u8]>,
    {
        self.db.write().remove(key.as_ref());
        Ok(())
    }

    fn exists<K>(&self, key: K) -> Result<bool, Error>
    where
        K: AsRef<[u8]>,
    {
        Ok(self.db.read().contains_key(key.as_ref()))
    }

    fn size<K>(&self, key: K) -> Result<Option<u64>, Error>
    where
        K: AsRef<[u8]>,
    {
        Ok(self.db.read().get(key.as_ref()).map(|v| v.len() as u64))
    }

    fn commit(&self, batch: Vec<BatchOp>) -> Result<(), Error> {
        let mut db = self.db.write();
        for op in batch {
            match op {
                BatchOp::Put { key, value } => {
                    db.insert(key, value);
                }
                BatchOp::Delete { key } => {
                    db.remove(&key);
                }
            }
        }
        Ok(())
    }

    fn iter_keys(&self) -> Result<KeyIter<'_>, Error> {
        // Snapshot of the key set; weakly consistent by contract.
        let keys: Vec<Vec<u8>> = self.db.read().keys().cloned().collect();
        Ok(Box::new(keys.into_iter().map(Ok)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_is_atomic_to_readers() {
        let db = MemoryDb::new();
        db.commit(vec![
            BatchOp::put(&b"a"[..], &b"1"[..]),
            BatchOp::put(&b"b"[..], &b"2"[..]),
            BatchOp::delete(&b"a"[..]),
        ])
        .unwrap();
        assert!(!db.exists(b"a").unwrap());
        assert_eq!(db.read(b"b").unwrap(), Some(b"2".to_vec()));
    }
}
