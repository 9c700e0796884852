// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! File and directory trees over the block layer.
//!
//! Files are chunked into raw leaf blocks and stitched into balanced
//! dag-pb trees; directories are dag-pb nodes whose links are named,
//! sorted entries. Everything content-addresses the usual way, so equal
//! trees have equal CIDs no matter how they were assembled.

mod builder;
mod chunker;
mod dir;
mod error;
mod io;
pub mod pb;
mod reader;

pub use self::builder::{add, add_sized, put_bytes};
pub use self::chunker::{adaptive_chunk_size, Chunker};
pub use self::dir::{list, resolve_path, DirBuilder, DirEntry};
pub use self::error::Error;
pub use self::io::{get_path, put_path, HostOptions};
pub use self::reader::{file_size, get_bytes, FileReader, ReadState};

use cask_cid::{Code, Prefix, Version, DAG_PB, RAW};

/// Knobs for building file DAGs.
#[derive(Debug, Clone)]
pub struct UnixfsConfig {
    /// Leaf chunk size in bytes.
    pub chunk_size: usize,
    /// Maximum links per internal node.
    pub fanout: usize,
    /// Prefix for leaf blocks; internal nodes reuse its version and hash
    /// with the dag-pb codec.
    pub prefix: Prefix,
}

impl Default for UnixfsConfig {
    fn default() -> Self {
        Self {
            chunk_size: 256 * 1024,
            fanout: 174,
            prefix: Prefix {
                version: Version::V1,
                codec: RAW,
                mh_type: Code::Sha2_256.into(),
                mh_len: Code::Sha2_256.default_length(),
            },
        }
    }
}

impl UnixfsConfig {
    pub fn internal_prefix(&self) -> Prefix {
        Prefix {
            codec: DAG_PB,
            ..self.prefix.clone()
        }
    }
}
