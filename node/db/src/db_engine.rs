// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{BatchOp, Error, FileDb, KeyIter, MemoryDb, ParityDb, Store};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Backend selection. Deserializes from config files as e.g.
/// `{ type = "parity", path = "/var/lib/cask/db" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DbConfig {
    Memory,
    File { path: PathBuf },
    Parity { path: PathBuf },
}

impl Default for DbConfig {
    fn default() -> Self {
        DbConfig::Memory
    }
}

/// A store handle polymorphic over the configured backend.
pub enum Db {
    Memory(MemoryDb),
    File(FileDb),
    Parity(ParityDb),
}

impl Db {
    pub fn open(config: &DbConfig) -> Result<Self, Error> {
        match config {
            DbConfig::Memory => Ok(Db::Memory(MemoryDb::new())),
            DbConfig::File { path } => Ok(Db::File(FileDb::open(path.clone())?)),
            DbConfig::Parity { path } => Ok(Db::Parity(ParityDb::open(path.clone())?)),
        }
    }
}

macro_rules! dispatch {
    ($self:ident, $db:ident => $e:expr) => {
        match $self {
            Db::Memory($db) => $e,
            Db::File($db) => $e,
            Db::Parity($db) => $e,
        }
    };
}

impl Store for Db {
    fn read<K>(&self, key: K) -> Result<Option<Vec<u8>>, Error>
    where
        K: AsRef<[u8]>,
    {
        dispatch!(self, db => db.read(key))
    }

    fn write<K, V>(&self, key: K, value: V) -> Result<(), Error>
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        dispatch!(self, db => db.write(key, value))
    }

    fn delete<K>(&self, key: K) -> Result<(), Error>
    where
        K: AsRef<[u8]>,
    {
        dispatch!(self, db => db.delete(key))
    }

    fn exists<K>(&self, key: K) -> Result<bool, Error>
    where
        K: AsRef<[u8]>,
    {
        dispatch!(self, db => db.exists(key))
    }

    fn size<K>(&self, key: K) -> Result<Option<u64>, Error>
    where
        K: AsRef<[u8]>,
    {
        dispatch!(self, db => db.size(key))
    }

    fn commit(&self, batch: Vec<BatchOp>) -> Result<(), Error> {
        dispatch!(self, db => db.commit(batch))
    }

    fn iter_keys(&self) -> Result<KeyIter<'_>, Error> {
        dispatch!(self, db => db.iter_keys())
    }
}
