// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{BatchOp, Error, KeyIter, Store};
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

/// One file per key, sharded by the first byte of the key so that no single
/// directory grows unbounded. File names are the hex encoding of the key.
///
/// Writes go through a temp file in the same directory tree and are moved
/// into place with `rename`, so a crash never leaves a half-written value.
pub struct FileDb {
    root: PathBuf,
}

impl FileDb {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, Error> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        tracing::debug!(path = %root.display(), "opened file store");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &[u8]) -> PathBuf {
        let name = hex::encode(key);
        let shard = if name.len() >= 2 { &name[..2] } else { "00" };
        self.root.join(shard).join(name)
    }

    fn stage(&self, value: &[u8]) -> Result<tempfile::NamedTempFile, Error> {
        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        tmp.write_all(value)?;
        tmp.flush()?;
        Ok(tmp)
    }

    fn install(&self, tmp: tempfile::NamedTempFile, path: &Path) -> Result<(), Error> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        tmp.persist(path)
            .map_err(|e| Error::Backend(e.to_string()))?;
        Ok(())
    }
}

impl Store for FileDb {
    fn read<K>(&self, key: K) -> Result<Option<Vec<u8>>, Error>
    where
        K: AsRef<[u8]>,
    {
        match fs::read(self.key_path(key.as_ref())) {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write<K, V>(&self, key: K, value: V) -> Result<(), Error>
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        let tmp = self.stage(value.as_ref())?;
        self.install(tmp, &self.key_path(key.as_ref()))
    }

    fn delete<K>(&self, key: K) -> Result<(), Error>
    where
        K: AsRef<[u8]>,
    {
        match fs::remove_file(self.key_path(key.as_ref())) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn exists<K>(&self, key: K) -> Result<bool, Error>
    where
        K: AsRef<[u8]>,
    {
        Ok(self.key_path(key.as_ref()).is_file())
    }

    fn size<K>(&self, key: K) -> Result<Option<u64>, Error>
    where
        K: AsRef<[u8]>,
    {
        match fs::metadata(self.key_path(key.as_ref())) {
            Ok(meta) => Ok(Some(meta.len())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn commit(&self, batch: Vec<BatchOp>) -> Result<(), Error> {
        // Stage every put before installing anything, so a failure while
        // staging leaves the store untouched.
        let mut staged = Vec::new();
        let mut deletes = Vec::new();
        for op in batch {
            match op {
                BatchOp::Put { key, value } => {
                    let tmp = self.stage(&value)?;
                    staged.push((self.key_path(&key), tmp));
                }
                BatchOp::Delete { key } => deletes.push(self.key_path(&key)),
            }
        }
        for (path, tmp) in staged {
            self.install(tmp, &path)?;
        }
        for path in deletes {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn iter_keys(&self) -> Result<KeyIter<'_>, Error> {
        let mut keys = Vec::new();
        for shard in fs::read_dir(&self.root)? {
            let shard = shard?;
            if !shard.file_type()?.is_dir() {
                continue;
            }
            for entry in fs::read_dir(shard.path())? {
                let entry = entry?;
                let name = entry.file_name();
                let name = name.to_string_lossy();
                let key = hex::decode(name.as_ref())
                    .map_err(|e| Error::InvalidKey(e.to_string()))?;
                keys.push(key);
            }
        }
        Ok(Box::new(keys.into_iter().map(Ok)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_read_delete_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let db = FileDb::open(dir.path()).unwrap();
        db.write(b"key", b"value").unwrap();
        assert_eq!(db.read(b"key").unwrap(), Some(b"value".to_vec()));
        assert_eq!(db.size(b"key").unwrap(), Some(5));
        db.delete(b"key").unwrap();
        db.delete(b"key").unwrap();
        assert_eq!(db.read(b"key").unwrap(), None);
    }

    #[test]
    fn shards_by_key_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let db = FileDb::open(dir.path()).unwrap();
        db.write([0xab, 0xcd], b"x").unwrap();
        assert!(dir.path().join("ab").join("abcd").is_file());
    }
}
