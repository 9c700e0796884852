// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod db_engine;
mod errors;
mod file;
mod memory;
mod parity;

pub use db_engine::{Db, DbConfig};
pub use errors::Error;
pub use file::FileDb;
pub use memory::MemoryDb;
pub use parity::ParityDb;

/// A single operation inside an atomic batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

impl BatchOp {
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        Self::Delete { key: key.into() }
    }
}

/// Lazy, restartable key iterator. The view is weakly consistent: keys
/// written after the iterator was created may or may not appear.
pub type KeyIter<'a> = Box<dyn Iterator<Item = Result<Vec<u8>, Error>> + 'a>;

/// Store interface implemented by every KV backend.
///
/// All operations are individually atomic and safe to call from multiple
/// threads. `commit` applies a whole batch atomically: after an error the
/// caller observes none of the batched mutations.
pub trait Store {
    /// Read a single value, returning `None` if the key doesn't exist.
    fn read<K>(&self, key: K) -> Result<Option<Vec<u8>>, Error>
    where
        K: AsRef<[u8]>;

    /// Write a single value.
    fn write<K, V>(&self, key: K, value: V) -> Result<(), Error>
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>;

    /// Delete a key. Removing an absent key is not an error.
    fn delete<K>(&self, key: K) -> Result<(), Error>
    where
        K: AsRef<[u8]>;

    /// Returns `Ok(true)` if the key exists in the store.
    fn exists<K>(&self, key: K) -> Result<bool, Error>
    where
        K: AsRef<[u8]>,
    {
        Ok(self.read(key)?.is_some())
    }

    /// Size of the stored value in bytes, without reading the value when the
    /// backend supports size-only lookups.
    fn size<K>(&self, key: K) -> Result<Option<u64>, Error>
    where
        K: AsRef<[u8]>,
    {
        Ok(self.read(key)?.map(|v| v.len() as u64))
    }

    /// Apply a batch of puts and deletes atomically.
    fn commit(&self, batch: Vec<BatchOp>) -> Result<(), Error>;

    /// Iterate over all keys currently in the store.
    fn iter_keys(&self) -> Result<KeyIter<'_>, Error>;
}

impl<S: Store> Store for &S {
    fn read<K>(&self, key: K) -> Result<Option<Vec<u8>>, Error>
    where
        K: AsRef<[u8]>,
    {
        (*self).read(key)
    }

    fn write<K, V>(&self, key: K, value: V) -> Result<(), Error>
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        (*self).write(key, value)
    }

    fn delete<K>(&self, key: K) -> Result<(), Error>
    where
        K: AsRef<[u8]>,
    {
        (*self).delete(key)
    }

    fn exists<K>(&self, key: K) -> Result<bool, Error>
    where
        K: AsRef<[u8]>,
    {
        (*self).exists(key)
    }

    fn size<K>(&self, key: K) -> Result<Option<u64>, Error>
    where
        K: AsRef<[u8]>,
    {
        (*self).size(key)
    }

    fn commit(&self, batch: Vec<BatchOp>) -> Result<(), Error> {
        (*self).commit(batch)
    }

    fn iter_keys(&self) -> Result<KeyIter<'_>, Error> {
        (*self).iter_keys()
    }
}
