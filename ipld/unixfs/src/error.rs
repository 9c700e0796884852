// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use cask_cid::Cid;
use std::path::PathBuf;
use thiserror::Error;

/// File-DAG error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} is not a directory")]
    NotADirectory(Cid),
    #[error("{0} is not a file")]
    NotAFile(Cid),
    #[error("no entry named {name:?} in directory {dir}")]
    NameNotFound { dir: Cid, name: String },
    #[error("duplicate entry name {0:?}")]
    DuplicateName(String),
    #[error("symlink {0:?} not followed (enable follow_symlinks to allow)")]
    Symlink(PathBuf),
    #[error("malformed file node: {0}")]
    Corrupt(String),
    #[error("read cancelled")]
    Cancelled,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Ipld(#[from] cask_ipld::Error),
    #[error(transparent)]
    Blockstore(#[from] cask_blockstore::Error),
    #[error(transparent)]
    Cid(#[from] cask_cid::Error),
}
