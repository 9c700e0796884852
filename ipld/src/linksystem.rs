// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::codec::CodecRegistry;
use crate::selector::LinkResolver;
use crate::{from_ipld, to_ipld, Error, Ipld};
use async_trait::async_trait;
use cask_blockstore::BlockStore;
use cask_cid::{Cid, Prefix};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Ties a block store to a codec registry: the one place where nodes become
/// blocks and blocks become nodes.
///
/// Loading decodes with the codec named by the CID; storing encodes with
/// the codec named by the prefix and derives the CID from the bytes. Typed
/// variants go through serde so callers can work with their own structs
/// instead of raw [`Ipld`] trees.
pub struct LinkSystem<S> {
    store: Arc<S>,
    codecs: Arc<CodecRegistry>,
}

impl<S> Clone for LinkSystem<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            codecs: Arc::clone(&self.codecs),
        }
    }
}

impl<S: BlockStore> LinkSystem<S> {
    /// Link system with the default codec registry.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_registry(store, Arc::new(CodecRegistry::default()))
    }

    pub fn with_registry(store: Arc<S>, codecs: Arc<CodecRegistry>) -> Self {
        Self { store, codecs }
    }

    pub fn store_ref(&self) -> &Arc<S> {
        &self.store
    }

    pub fn codecs(&self) -> &CodecRegistry {
        &self.codecs
    }

    /// Encode `node` with the prefix's codec, store the block and return
    /// its CID.
    pub fn store_node(&self, node: &Ipld, prefix: &Prefix) -> Result<Cid, Error> {
        let bytes = self.codecs.encode(prefix.codec, node)?;
        Ok(self.store.put_with_prefix(prefix, &bytes)?)
    }

    /// Derive the CID `store_node` would produce without touching the store.
    pub fn compute_cid(&self, node: &Ipld, prefix: &Prefix) -> Result<Cid, Error> {
        let bytes = self.codecs.encode(prefix.codec, node)?;
        Ok(cask_cid::new_from_prefix(prefix, &bytes)?)
    }

    /// Load the block and decode it with the codec the CID names.
    pub fn load(&self, cid: &Cid) -> Result<Ipld, Error> {
        let bytes = self.store.get_block(cid)?;
        self.codecs.decode(cid.codec(), &bytes)
    }

    /// As [`load`](Self::load), also reporting the encoded block size.
    pub fn load_with_size(&self, cid: &Cid) -> Result<(Ipld, u64), Error> {
        let bytes = self.store.get_block(cid)?;
        let node = self.codecs.decode(cid.codec(), &bytes)?;
        Ok((node, bytes.len() as u64))
    }

    /// Load a node and reify it into a typed value.
    pub fn load_typed<T: DeserializeOwned>(&self, cid: &Cid) -> Result<T, Error> {
        from_ipld(&self.load(cid)?)
    }

    /// Store a typed value as a node.
    pub fn store_typed<T: Serialize>(&self, value: &T, prefix: &Prefix) -> Result<Cid, Error> {
        self.store_node(&to_ipld(value)?, prefix)
    }
}

#[async_trait]
impl<S: BlockStore + Send + Sync> LinkResolver for LinkSystem<S> {
    async fn load_link(&self, cid: &Cid) -> Result<Option<(Ipld, u64)>, Error> {
        match self.load_with_size(cid) {
            Ok(loaded) => Ok(Some(loaded)),
            Err(Error::Blockstore(cask_blockstore::Error::NotFound(_))) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
