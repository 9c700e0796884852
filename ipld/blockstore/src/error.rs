// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use cask_cid::Cid;
use thiserror::Error;

/// Block store error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("block not found: {0}")]
    NotFound(Cid),
    #[error("cid mismatch: expected {expected}, bytes derive {actual}")]
    CidMismatch { expected: Cid, actual: Cid },
    #[error("fetched bytes for {0} failed hash verification")]
    HashMismatch(Cid),
    #[error("operation cancelled")]
    Cancelled,
    #[error(transparent)]
    Cid(#[from] cask_cid::Error),
    #[error(transparent)]
    Db(#[from] cask_db::Error),
    #[error("{0}")]
    Other(String),
}
