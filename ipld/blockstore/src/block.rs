// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::Error;
use cask_cid::{Cid, Prefix};

/// An immutable `(cid, bytes)` pair. The CID is always derived from the
/// bytes at construction, so a `Block` in hand is self-consistent; any
/// mutation of the bytes would produce a different block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    cid: Cid,
    data: Vec<u8>,
}

impl Block {
    /// Derive the CID for `data` under `prefix` and wrap both.
    pub fn new(prefix: &Prefix, data: impl Into<Vec<u8>>) -> Result<Block, Error> {
        let data = data.into();
        let cid = cask_cid::new_from_prefix(prefix, &data)?;
        Ok(Block { cid, data })
    }

    /// Wrap pre-derived parts without re-hashing. The pair is verified, so
    /// a stale or corrupted CID is rejected here rather than at read time.
    pub fn from_parts(cid: Cid, data: impl Into<Vec<u8>>) -> Result<Block, Error> {
        let data = data.into();
        crate::verify_keyed(&cid, &data)?;
        Ok(Block { cid, data })
    }

    pub fn cid(&self) -> &Cid {
        &self.cid
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_parts(self) -> (Cid, Vec<u8>) {
        (self.cid, self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cask_cid::{Code, Version, RAW};

    #[test]
    fn derived_cid_matches_manual_derivation() {
        let prefix = Prefix::new(Version::V1, RAW, Code::Sha2_256.into(), None).unwrap();
        let block = Block::new(&prefix, b"hello raw block".to_vec()).unwrap();
        let manual = cask_cid::new_from_prefix(&prefix, b"hello raw block").unwrap();
        assert_eq!(block.cid(), &manual);
    }

    #[test]
    fn mismatched_parts_rejected() {
        let prefix = Prefix::default();
        let block = Block::new(&prefix, b"one".to_vec()).unwrap();
        let err = Block::from_parts(*block.cid(), b"two".to_vec()).unwrap_err();
        assert!(matches!(err, Error::CidMismatch { .. }));
    }
}
