// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Multihash code table. The `multihash` crate dropped the identity hasher,
//! so it is back-filled here the same way the upstream PR implemented it.

use crate::Error;
use multihash_derive::MultihashDigest;

/// Payload bound for identity "hashes". The digest has to fit in the 64-byte
/// multihash allocation shared with every other code.
pub const DEFAULT_MAX_IDENTITY_BYTES: usize = 64;

/// Recognized multihash generation codes.
#[derive(Clone, Copy, Debug, Eq, MultihashDigest, PartialEq)]
#[mh(alloc_size = 64)]
pub enum Code {
    /// Identity multihash: the digest is the payload itself.
    #[mh(code = 0x0, hasher = IdentityHasher::<64>)]
    Identity,
    /// SHA-256 (32-byte hash size). The default code.
    #[mh(code = 0x12, hasher = multihash_codetable::Sha2_256)]
    Sha2_256,
    /// SHA-512 (64-byte hash size)
    #[mh(code = 0x13, hasher = multihash_codetable::Sha2_512)]
    Sha2_512,
    /// SHA3-256 (32-byte hash size)
    #[mh(code = 0x16, hasher = multihash_codetable::Sha3_256)]
    Sha3_256,
    /// BLAKE3-256 (32-byte hash size)
    #[mh(code = 0x1e, hasher = multihash_codetable::Blake3_256)]
    Blake3_256,
}

impl Default for Code {
    fn default() -> Self {
        Code::Sha2_256
    }
}

impl Code {
    /// Look up a code by its numeric multihash type.
    pub fn from_code(code: u64) -> Result<Code, Error> {
        Code::try_from(code).map_err(|_| Error::UnknownHash(code))
    }

    /// The digest length this code produces. Identity digests have no fixed
    /// length; zero is returned as the conventional placeholder.
    pub fn default_length(&self) -> usize {
        match self {
            Code::Identity => 0,
            Code::Sha2_256 | Code::Sha3_256 | Code::Blake3_256 => 32,
            Code::Sha2_512 => 64,
        }
    }
}

/// Identity hasher with a maximum size.
///
/// # Panics
///
/// Panics if the input is bigger than the maximum size; callers bound the
/// payload before digesting.
#[derive(Debug)]
pub struct IdentityHasher<const S: usize> {
    i: usize,
    bytes: [u8; S],
}

impl<const S: usize> Default for IdentityHasher<S> {
    fn default() -> Self {
        Self {
            i: 0,
            bytes: [0u8; S],
        }
    }
}

impl<const S: usize> multihash_derive::Hasher for IdentityHasher<S> {
    fn update(&mut self, input: &[u8]) {
        let start = self.i.min(self.bytes.len());
        let end = (self.i + input.len()).min(self.bytes.len());
        self.bytes[start..end].copy_from_slice(input);
        self.i = end;
    }

    fn finalize(&mut self) -> &[u8] {
        &self.bytes[..self.i]
    }

    fn reset(&mut self) {
        self.i = 0
    }
}
