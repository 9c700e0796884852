// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use cask_cid::Cid;
use std::collections::HashSet;

/// Set of visited CIDs, keyed on the multihash alone so the same content
/// reached through different versions or codecs counts as seen once.
#[derive(Debug, Default, Clone)]
pub struct CidHashSet {
    inner: HashSet<Vec<u8>>,
}

impl CidHashSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the CID, returning `true` if it was not yet present.
    pub fn insert(&mut self, cid: &Cid) -> bool {
        self.inner.insert(cid.hash().to_bytes())
    }

    pub fn contains(&self, cid: &Cid) -> bool {
        self.inner.contains(&cid.hash().to_bytes())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cask_cid::{Code, Prefix, Version, DAG_CBOR, RAW};

    #[test]
    fn dedup_across_codecs() {
        let data = b"same payload";
        let raw_prefix = Prefix::new(Version::V1, RAW, Code::Sha2_256.into(), None).unwrap();
        let cbor_prefix = Prefix::new(Version::V1, DAG_CBOR, Code::Sha2_256.into(), None).unwrap();
        let raw = cask_cid::new_from_prefix(&raw_prefix, data).unwrap();
        let cbor = cask_cid::new_from_prefix(&cbor_prefix, data).unwrap();

        let mut seen = CidHashSet::new();
        assert!(seen.insert(&raw));
        assert!(!seen.insert(&cbor));
        assert!(seen.contains(&cbor));
        assert_eq!(seen.len(), 1);
    }
}
