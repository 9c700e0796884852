// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod block;
mod config;
mod error;
mod provider;

pub use block::Block;
pub use config::{open_blockstore, BlockstoreConfig, PrefixConfig};
pub use error::Error;
pub use provider::{BlockProvider, FallbackBlockstore};

use cask_cid::{Cid, Code, Multihash, Prefix, RAW};
use cask_db::{BatchOp, Store};
use multihash_derive::MultihashDigest as _;

/// Lazy iterator over the CIDs in a store. The multihash is the key; the
/// codec is not recorded, so keys are surfaced as v1 `raw` CIDs.
pub type CidIter<'a> = Box<dyn Iterator<Item = Result<Cid, Error>> + 'a>;

fn key_of(cid: &Cid) -> Vec<u8> {
    cid.hash().to_bytes()
}

fn is_identity(cid: &Cid) -> bool {
    cid.hash().code() == u64::from(Code::Identity)
}

/// Verifies that `data` re-derives the multihash of `cid`.
fn verify_keyed(cid: &Cid, data: &[u8]) -> Result<(), Error> {
    let code = Code::from_code(cid.hash().code()).map_err(cask_cid::Error::from)?;
    let actual = if code == Code::Identity {
        Multihash::wrap(code.into(), data).map_err(|e| Error::Other(e.to_string()))?
    } else {
        code.digest(data)
    };
    if &actual != cid.hash() {
        let expected = *cid;
        let actual = Cid::new_v1(cid.codec(), actual);
        return Err(Error::CidMismatch { expected, actual });
    }
    Ok(())
}

/// Content-addressed view over any [`Store`].
///
/// Keys are the **multihash portion** of the CID, never the full CID: a
/// block stored under a v1+raw CID is retrievable under a v1+dag-cbor CID
/// with the same hash. Codec checks belong to higher layers.
///
/// Identity-hash CIDs carry their payload in the digest and never touch the
/// backend.
pub trait BlockStore: Store {
    /// Whether the block is present. Total; identity CIDs are always present.
    fn contains(&self, cid: &Cid) -> Result<bool, Error> {
        if is_identity(cid) {
            return Ok(true);
        }
        Ok(self.exists(key_of(cid))?)
    }

    /// Get the block bytes, failing `NotFound` when absent.
    fn get_block(&self, cid: &Cid) -> Result<Vec<u8>, Error> {
        if is_identity(cid) {
            return Ok(cid.hash().digest().to_vec());
        }
        self.read(key_of(cid))?.ok_or(Error::NotFound(*cid))
    }

    /// Size of the block in bytes without reading it when the backend
    /// supports size-only lookups.
    fn block_size(&self, cid: &Cid) -> Result<u64, Error> {
        if is_identity(cid) {
            return Ok(cid.hash().digest().len() as u64);
        }
        self.size(key_of(cid))?.ok_or(Error::NotFound(*cid))
    }

    /// Store a block whose CID was already derived from its bytes.
    fn put_block(&self, block: &Block) -> Result<(), Error> {
        self.put_keyed(block.cid(), block.data())
    }

    /// Store bytes under a caller-supplied CID, verifying the derivation.
    fn put_keyed(&self, cid: &Cid, data: &[u8]) -> Result<(), Error> {
        verify_keyed(cid, data)?;
        if is_identity(cid) {
            return Ok(());
        }
        Ok(self.write(key_of(cid), data)?)
    }

    /// Hash and store bytes, returning the derived CID.
    fn put_with_prefix(&self, prefix: &Prefix, data: &[u8]) -> Result<Cid, Error> {
        let cid = cask_cid::new_from_prefix(prefix, data)?;
        if !is_identity(&cid) {
            self.write(key_of(&cid), data)?;
        }
        Ok(cid)
    }

    /// Remove a block. Removing an absent block is not an error.
    fn delete_block(&self, cid: &Cid) -> Result<(), Error> {
        if is_identity(cid) {
            return Ok(());
        }
        Ok(self.delete(key_of(cid))?)
    }

    /// Enumerate all stored blocks.
    fn list_cids(&self) -> Result<CidIter<'_>, Error> {
        let keys = self.iter_keys()?;
        Ok(Box::new(keys.map(|key| {
            let key = key?;
            let mh = Multihash::from_bytes(&key).map_err(|e| Error::Other(e.to_string()))?;
            Ok(Cid::new_v1(RAW, mh))
        })))
    }

    /// Open a batching scope. Operations are buffered and applied in one
    /// atomic backend commit; dropping the scope without `commit` discards
    /// every buffered operation.
    fn batch(&self) -> BlockBatch<'_, Self>
    where
        Self: Sized,
    {
        BlockBatch {
            store: self,
            ops: Vec::new(),
        }
    }
}

impl<S: Store> BlockStore for S {}

/// A transaction scope over a block store.
pub struct BlockBatch<'a, S> {
    store: &'a S,
    ops: Vec<BatchOp>,
}

impl<S: Store> BlockBatch<'_, S> {
    pub fn put(&mut self, block: &Block) -> Result<(), Error> {
        self.put_keyed(block.cid(), block.data())
    }

    pub fn put_keyed(&mut self, cid: &Cid, data: &[u8]) -> Result<(), Error> {
        verify_keyed(cid, data)?;
        if !is_identity(cid) {
            self.ops.push(BatchOp::put(key_of(cid), data.to_vec()));
        }
        Ok(())
    }

    pub fn delete(&mut self, cid: &Cid) {
        if !is_identity(cid) {
            self.ops.push(BatchOp::delete(key_of(cid)));
        }
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Apply the whole scope atomically.
    pub fn commit(self) -> Result<(), Error> {
        if self.ops.is_empty() {
            return Ok(());
        }
        Ok(self.store.commit(self.ops)?)
    }
}
