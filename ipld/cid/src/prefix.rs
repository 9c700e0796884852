// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::{Cid, Code, Error, Version, DAG_PB};
use integer_encoding::{VarIntReader, VarIntWriter};
use std::io::Cursor;

/// Prefix represents all metadata of a CID, without the actual content:
/// version, codec, multihash type and digest length.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Prefix {
    pub version: Version,
    pub codec: u64,
    pub mh_type: u64,
    pub mh_len: usize,
}

impl Prefix {
    /// Build a validated prefix. `mh_len` of `None` selects the default
    /// digest length for the hash code.
    pub fn new(
        version: Version,
        codec: u64,
        mh_type: u64,
        mh_len: Option<usize>,
    ) -> Result<Prefix, Error> {
        let code = Code::from_code(mh_type)?;
        let prefix = Prefix {
            version,
            codec,
            mh_type,
            mh_len: mh_len.unwrap_or_else(|| code.default_length()),
        };
        prefix.validate()?;
        Ok(prefix)
    }

    /// Version 0 is only legal as dag-pb + sha2-256 with a 32-byte digest.
    pub fn validate(&self) -> Result<(), Error> {
        Code::from_code(self.mh_type)?;
        if self.version == Version::V0
            && (self.codec != DAG_PB || self.mh_type != u64::from(Code::Sha2_256) || self.mh_len != 32)
        {
            return Err(Error::BadCidV0);
        }
        Ok(())
    }

    /// Generate a prefix from encoded bytes.
    pub fn new_from_bytes(data: &[u8]) -> Result<Prefix, Error> {
        let mut cur = Cursor::new(data);

        let raw_version: u64 = cur.read_varint()?;
        let codec: u64 = cur.read_varint()?;
        let mh_type: u64 = cur.read_varint()?;
        let mh_len: usize = cur.read_varint()?;

        let version = Version::try_from(raw_version)?;

        Ok(Prefix {
            version,
            codec,
            mh_type,
            mh_len,
        })
    }

    /// Encode the prefix to bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut res = Vec::with_capacity(4);

        // io can't fail on Vec
        res.write_varint(u64::from(self.version)).unwrap();
        res.write_varint(self.codec).unwrap();
        res.write_varint(self.mh_type).unwrap();
        res.write_varint(self.mh_len).unwrap();

        res
    }
}

impl From<&Cid> for Prefix {
    fn from(cid: &Cid) -> Self {
        Self {
            version: cid.version(),
            codec: cid.codec(),
            mh_type: cid.hash().code(),
            mh_len: cid.hash().digest().len(),
        }
    }
}

impl Default for Prefix {
    /// v1, raw codec, sha2-256.
    fn default() -> Self {
        Prefix {
            version: Version::V1,
            codec: crate::RAW,
            mh_type: Code::Sha2_256.into(),
            mh_len: 32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{new_from_prefix, RAW};

    #[test]
    fn prefix_bytes_round_trip() {
        let prefix = Prefix::new(Version::V1, RAW, Code::Blake3_256.into(), None).unwrap();
        let back = Prefix::new_from_bytes(&prefix.to_bytes()).unwrap();
        assert_eq!(prefix, back);
    }

    #[test]
    fn prefix_recovered_from_cid() {
        let prefix = Prefix::default();
        let cid = new_from_prefix(&prefix, b"data").unwrap();
        assert_eq!(Prefix::from(&cid), prefix);
    }
}
