// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::Codec;
use crate::{Error, Ipld};
use cask_cid::{IDENTITY, RAW};

/// Byte passthrough. Serves both the `raw` and `identity` codes: the block
/// bytes are the value, the value is a bytes node.
pub struct RawCodec {
    code: u64,
}

impl RawCodec {
    pub fn new(code: u64) -> Self {
        debug_assert!(code == RAW || code == IDENTITY);
        Self { code }
    }
}

impl Codec for RawCodec {
    fn code(&self) -> u64 {
        self.code
    }

    fn name(&self) -> &'static str {
        if self.code == IDENTITY {
            "identity"
        } else {
            "raw"
        }
    }

    fn encode(&self, node: &Ipld) -> Result<Vec<u8>, Error> {
        match node {
            Ipld::Bytes(b) => Ok(b.clone()),
            other => Err(Error::UnsupportedValue(format!(
                "{} codec only encodes bytes, got {}",
                self.name(),
                other.kind().name()
            ))),
        }
    }

    fn decode(&self, data: &[u8]) -> Result<Ipld, Error> {
        Ok(Ipld::Bytes(data.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipld;

    #[test]
    fn bytes_pass_through() {
        let codec = RawCodec::new(RAW);
        let node = ipld!(Bytes(vec![1, 2, 3]));
        let bytes = codec.encode(&node).unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
        assert_eq!(codec.decode(&bytes).unwrap(), node);
    }

    #[test]
    fn non_bytes_rejected() {
        let codec = RawCodec::new(RAW);
        assert!(matches!(
            codec.encode(&ipld!("text")),
            Err(Error::UnsupportedValue(_))
        ));
    }

    #[test]
    fn empty_is_legal() {
        let codec = RawCodec::new(IDENTITY);
        assert_eq!(codec.encode(&ipld!(Bytes(vec![]))).unwrap(), Vec::<u8>::new());
        assert_eq!(codec.decode(&[]).unwrap(), ipld!(Bytes(vec![])));
    }
}
