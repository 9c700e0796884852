// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod code;
mod error;
mod prefix;

pub use self::code::{Code, DEFAULT_MAX_IDENTITY_BYTES};
pub use self::error::Error;
pub use self::prefix::Prefix;
pub use cid::{Cid, Version};

use multihash_derive::MultihashDigest;

/// The multihash width used throughout cask; matches `cid::Cid`'s 64-byte
/// digest allocation.
pub type Multihash = cid::multihash::Multihash<64>;

/// Raw binary codec.
pub const RAW: u64 = 0x55;
/// Legacy Merkle-DAG protobuf codec.
pub const DAG_PB: u64 = 0x70;
/// Canonical CBOR codec.
pub const DAG_CBOR: u64 = 0x71;
/// JSON codec with tagged links.
pub const DAG_JSON: u64 = 0x0129;
/// Identity codec: the block bytes are the value.
pub const IDENTITY: u64 = 0x00;

/// Constructs a v1 cid from bytes using the dag-cbor codec.
pub fn new_from_cbor(bz: &[u8], code: Code) -> Cid {
    let hash = code.digest(bz);
    Cid::new_v1(DAG_CBOR, hash)
}

/// Create a new CID by hashing `data` as described by `prefix`.
///
/// Identity "hashes" embed the data itself and are bounded by
/// [`DEFAULT_MAX_IDENTITY_BYTES`]; use [`new_from_prefix_with_limit`] to
/// change the bound.
pub fn new_from_prefix(prefix: &Prefix, data: &[u8]) -> Result<Cid, Error> {
    new_from_prefix_with_limit(prefix, data, DEFAULT_MAX_IDENTITY_BYTES)
}

/// As [`new_from_prefix`], with an explicit identity payload limit.
pub fn new_from_prefix_with_limit(
    prefix: &Prefix,
    data: &[u8],
    max_identity_bytes: usize,
) -> Result<Cid, Error> {
    prefix.validate()?;
    let code = Code::from_code(prefix.mh_type)?;
    if code == Code::Identity && data.len() > max_identity_bytes {
        return Err(Error::IdentityTooLong {
            len: data.len(),
            max: max_identity_bytes,
        });
    }
    let hash = code.digest(data);
    match prefix.version {
        Version::V0 => Cid::new_v0(hash).map_err(Error::from),
        Version::V1 => Ok(Cid::new_v1(prefix.codec, hash)),
    }
}

/// Parse a CID from its string form. Accepts both the v0 base58 form
/// (`Qm...`) and any multibase-tagged v1 form.
pub fn parse(s: &str) -> Result<Cid, Error> {
    use std::str::FromStr;
    Cid::from_str(s).map_err(Error::from)
}

/// Two CIDs are content-equivalent when their multihash portions are equal,
/// regardless of version or codec. A multihash-keyed block store serves the
/// same bytes for both.
pub fn content_equivalent(a: &Cid, b: &Cid) -> bool {
    a.hash() == b.hash()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_cid() {
        let prefix = Prefix::new(Version::V1, RAW, Code::Sha2_256.into(), None).unwrap();
        let a = new_from_prefix(&prefix, b"hello raw block").unwrap();
        let b = new_from_prefix(&prefix, b"hello raw block").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.codec(), RAW);
        assert_eq!(a.hash().code(), 0x12);
        assert_eq!(a.hash().digest().len(), 32);
    }

    #[test]
    fn empty_bytes_are_legal() {
        let prefix = Prefix::new(Version::V1, RAW, Code::Sha2_256.into(), None).unwrap();
        let a = new_from_prefix(&prefix, b"").unwrap();
        let b = new_from_prefix(&prefix, b"").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn v0_round_trips_through_base58() {
        let prefix = Prefix::new(Version::V0, DAG_PB, Code::Sha2_256.into(), None).unwrap();
        let cid = new_from_prefix(&prefix, b"same content").unwrap();
        let s = cid.to_string();
        assert!(s.starts_with("Qm"));
        assert_eq!(parse(&s).unwrap(), cid);
    }

    #[test]
    fn v0_rejects_non_default_codec() {
        assert!(matches!(
            Prefix::new(Version::V0, RAW, Code::Sha2_256.into(), None),
            Err(Error::BadCidV0)
        ));
        assert!(matches!(
            Prefix::new(Version::V0, DAG_PB, Code::Blake3_256.into(), None),
            Err(Error::BadCidV0)
        ));
    }

    #[test]
    fn content_equivalence_across_codecs() {
        let raw = Prefix::new(Version::V1, RAW, Code::Sha2_256.into(), None).unwrap();
        let cbor = Prefix::new(Version::V1, DAG_CBOR, Code::Sha2_256.into(), None).unwrap();
        let a = new_from_prefix(&raw, b"same content").unwrap();
        let b = new_from_prefix(&cbor, b"same content").unwrap();
        assert_ne!(a, b);
        assert!(content_equivalent(&a, &b));
    }

    #[test]
    fn identity_embeds_bytes() {
        let prefix = Prefix::new(Version::V1, RAW, Code::Identity.into(), None).unwrap();
        let cid = new_from_prefix(&prefix, b"tiny").unwrap();
        assert_eq!(cid.hash().digest(), b"tiny");

        let big = vec![0u8; DEFAULT_MAX_IDENTITY_BYTES + 1];
        assert!(matches!(
            new_from_prefix(&prefix, &big),
            Err(Error::IdentityTooLong { .. })
        ));
    }

    #[test]
    fn unknown_hash_code() {
        let prefix = Prefix {
            version: Version::V1,
            codec: RAW,
            mh_type: 0xdead,
            mh_len: 32,
        };
        assert!(matches!(
            new_from_prefix(&prefix, b"x"),
            Err(Error::UnknownHash(0xdead))
        ));
    }

    #[test]
    fn invalid_string_fails() {
        assert!(matches!(parse("not a cid"), Err(Error::InvalidCid(_))));
    }
}
