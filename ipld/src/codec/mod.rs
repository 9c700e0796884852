// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Codecs turn IPLD nodes into block bytes and back.
//!
//! Every codec is deterministic: encoding the same node always yields the
//! same bytes, so the same CID. The registry maps multicodec codes to codec
//! implementations and is what the link system consults when loading or
//! storing nodes.

mod dag_cbor;
mod dag_json;
pub mod dag_pb;
mod raw;
pub mod wire;

pub use self::dag_cbor::DagCborCodec;
pub use self::dag_json::DagJsonCodec;
pub use self::dag_pb::DagPbCodec;
pub use self::raw::RawCodec;

use crate::{Error, Ipld};
use cask_cid::{DAG_CBOR, DAG_JSON, DAG_PB, IDENTITY, RAW};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A content codec keyed by its multicodec code.
pub trait Codec: Send + Sync {
    fn code(&self) -> u64;
    fn name(&self) -> &'static str;
    /// Encode a node to bytes. Fails `UnsupportedValue` for values the
    /// codec cannot represent rather than silently altering them.
    fn encode(&self, node: &Ipld) -> Result<Vec<u8>, Error>;
    /// Decode bytes to a node. Trailing garbage and malformed input fail
    /// `Decoding`.
    fn decode(&self, data: &[u8]) -> Result<Ipld, Error>;
}

/// Maps multicodec codes to codec implementations.
#[derive(Clone)]
pub struct CodecRegistry {
    codecs: BTreeMap<u64, Arc<dyn Codec>>,
}

impl Default for CodecRegistry {
    /// Registry with raw, dag-pb, dag-cbor, dag-json and identity.
    fn default() -> Self {
        let mut r = Self {
            codecs: BTreeMap::new(),
        };
        r.register(Arc::new(RawCodec::new(RAW)));
        r.register(Arc::new(RawCodec::new(IDENTITY)));
        r.register(Arc::new(DagCborCodec));
        r.register(Arc::new(DagJsonCodec));
        r.register(Arc::new(DagPbCodec));
        r
    }
}

impl CodecRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a codec, replacing any previous entry for the same code.
    pub fn register(&mut self, codec: Arc<dyn Codec>) {
        self.codecs.insert(codec.code(), codec);
    }

    pub fn get(&self, code: u64) -> Result<&Arc<dyn Codec>, Error> {
        self.codecs.get(&code).ok_or(Error::UnknownCodec(code))
    }

    pub fn contains(&self, code: u64) -> bool {
        self.codecs.contains_key(&code)
    }

    pub fn encode(&self, code: u64, node: &Ipld) -> Result<Vec<u8>, Error> {
        self.get(code)?.encode(node)
    }

    pub fn decode(&self, code: u64, data: &[u8]) -> Result<Ipld, Error> {
        self.get(code)?.decode(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipld;

    #[test]
    fn default_registry_codes() {
        let reg = CodecRegistry::default();
        for code in [RAW, DAG_PB, DAG_CBOR, DAG_JSON, IDENTITY] {
            assert!(reg.contains(code), "missing codec {code:#x}");
        }
        assert!(matches!(reg.get(0x9999), Err(Error::UnknownCodec(0x9999))));
    }

    #[test]
    fn dispatch_through_registry() {
        let reg = CodecRegistry::default();
        let bytes = reg.encode(DAG_CBOR, &ipld!({"a": 1})).unwrap();
        assert_eq!(reg.decode(DAG_CBOR, &bytes).unwrap(), ipld!({"a": 1}));
    }
}
