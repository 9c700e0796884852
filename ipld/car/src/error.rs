// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use thiserror::Error;

/// Car utility error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid CAR file: {0}")]
    InvalidFile(String),
    #[error("corrupt CAR record: {0}")]
    Corrupt(String),
    #[error("archive ended mid-record")]
    UnexpectedEof,
    #[error("writer in illegal state: {0}")]
    IllegalState(&'static str),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cbor encoding error: {0}")]
    Cbor(String),
    #[error(transparent)]
    Blockstore(#[from] cask_blockstore::Error),
    #[error(transparent)]
    Ipld(#[from] cask_ipld::Error),
    #[error(transparent)]
    Cid(#[from] cask_cid::Error),
}
