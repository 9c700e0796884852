// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use thiserror::Error;

/// CID construction and parsing errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid cid: {0}")]
    InvalidCid(String),
    #[error("cid v0 requires the dag-pb codec and a 32-byte sha2-256 multihash")]
    BadCidV0,
    #[error("unknown multihash code {0:#x}")]
    UnknownHash(u64),
    #[error("identity payload of {len} bytes exceeds the {max} byte limit")]
    IdentityTooLong { len: usize, max: usize },
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<cid::Error> for Error {
    fn from(e: cid::Error) -> Self {
        Error::InvalidCid(e.to_string())
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        use Error::*;
        match (self, other) {
            (InvalidCid(a), InvalidCid(b)) => a == b,
            (BadCidV0, BadCidV0) => true,
            (UnknownHash(a), UnknownHash(b)) => a == b,
            (
                IdentityTooLong { len: a, max: b },
                IdentityTooLong { len: c, max: d },
            ) => a == c && b == d,
            _ => false,
        }
    }
}
