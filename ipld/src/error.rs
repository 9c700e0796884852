// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use thiserror::Error;

/// IPLD error
#[derive(Debug, Error)]
pub enum Error {
    #[error("wrong node kind: expected {expected}, found {found}")]
    WrongKind {
        expected: &'static str,
        found: &'static str,
    },
    #[error("duplicate map key: {0}")]
    DuplicateKey(String),
    #[error("unsupported value: {0}")]
    UnsupportedValue(String),
    #[error("unsupported type: {0}")]
    UnsupportedType(String),
    #[error("unknown codec {0:#x}")]
    UnknownCodec(u64),
    #[error("encoding failed: {0}")]
    Encoding(String),
    #[error("decoding failed: {0}")]
    Decoding(String),
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("path not found at segment '{segment}' (resolved '{resolved}')")]
    PathNotFound { resolved: String, segment: String },
    #[error("failed to traverse link: {0}")]
    InvalidLink(String),
    #[error("traversal budget exceeded: {0}")]
    BudgetExceeded(&'static str),
    #[error("traversal cancelled")]
    Cancelled,
    /// Returned by a walk callback to stop the traversal early. Surfaced
    /// by `walk_all`, absorbed by the visitors built on top of it.
    #[error("traversal interrupted by caller")]
    Interrupted,
    #[error(transparent)]
    Blockstore(#[from] cask_blockstore::Error),
    #[error(transparent)]
    Cid(#[from] cask_cid::Error),
    #[error("{0}")]
    Custom(String),
}
