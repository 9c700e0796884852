// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! The metadata message carried in the `Data` field of file-DAG dag-pb
//! nodes: node type, inline payload, file size, per-child block sizes and
//! optional mode/mtime.

use crate::Error;
use cask_ipld::codec::wire::{self, Reader};

const TYPE_TAG: u64 = 1 << 3; // varint
const DATA_TAG: u64 = (2 << 3) | 2;
const FILESIZE_TAG: u64 = 3 << 3; // varint
const BLOCKSIZE_TAG: u64 = 4 << 3; // repeated varint
const MODE_TAG: u64 = 7 << 3; // varint
const MTIME_TAG: u64 = (8 << 3) | 2; // nested message
const MTIME_SECONDS_TAG: u64 = 1 << 3; // varint, inside mtime

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Raw,
    Directory,
    File,
    Metadata,
    Symlink,
    HamtShard,
}

impl NodeType {
    fn code(self) -> u64 {
        match self {
            NodeType::Raw => 0,
            NodeType::Directory => 1,
            NodeType::File => 2,
            NodeType::Metadata => 3,
            NodeType::Symlink => 4,
            NodeType::HamtShard => 5,
        }
    }

    fn from_code(code: u64) -> Result<Self, Error> {
        Ok(match code {
            0 => NodeType::Raw,
            1 => NodeType::Directory,
            2 => NodeType::File,
            3 => NodeType::Metadata,
            4 => NodeType::Symlink,
            5 => NodeType::HamtShard,
            other => return Err(Error::Corrupt(format!("unknown node type {other}"))),
        })
    }
}

/// Decoded `Data` message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnixFsData {
    pub node_type: NodeType,
    pub data: Option<Vec<u8>>,
    pub filesize: Option<u64>,
    pub blocksizes: Vec<u64>,
    pub mode: Option<u32>,
    pub mtime_seconds: Option<u64>,
}

impl UnixFsData {
    pub fn new(node_type: NodeType) -> Self {
        Self {
            node_type,
            data: None,
            filesize: None,
            blocksizes: Vec::new(),
            mode: None,
            mtime_seconds: None,
        }
    }

    /// Metadata for a file stitched from `blocksizes`-sized children.
    pub fn file(blocksizes: Vec<u64>) -> Self {
        let filesize = blocksizes.iter().sum();
        Self {
            filesize: Some(filesize),
            blocksizes,
            ..Self::new(NodeType::File)
        }
    }

    pub fn directory() -> Self {
        Self::new(NodeType::Directory)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        wire::write_varint(&mut out, TYPE_TAG);
        wire::write_varint(&mut out, self.node_type.code());
        if let Some(data) = &self.data {
            wire::write_field(&mut out, DATA_TAG, data);
        }
        if let Some(filesize) = self.filesize {
            wire::write_varint(&mut out, FILESIZE_TAG);
            wire::write_varint(&mut out, filesize);
        }
        for bs in &self.blocksizes {
            wire::write_varint(&mut out, BLOCKSIZE_TAG);
            wire::write_varint(&mut out, *bs);
        }
        if let Some(mode) = self.mode {
            wire::write_varint(&mut out, MODE_TAG);
            wire::write_varint(&mut out, mode as u64);
        }
        if let Some(seconds) = self.mtime_seconds {
            let mut mtime = Vec::new();
            wire::write_varint(&mut mtime, MTIME_SECONDS_TAG);
            wire::write_varint(&mut mtime, seconds);
            wire::write_field(&mut out, MTIME_TAG, &mtime);
        }
        out
    }

    pub fn from_bytes(buf: &[u8]) -> Result<Self, Error> {
        let mut r = Reader::new(buf);
        let mut node_type = None;
        let mut msg = Self::new(NodeType::Raw);
        while !r.done() {
            match r.varint().map_err(corrupt)? {
                TYPE_TAG => node_type = Some(NodeType::from_code(r.varint().map_err(corrupt)?)?),
                DATA_TAG => msg.data = Some(r.bytes().map_err(corrupt)?.to_vec()),
                FILESIZE_TAG => msg.filesize = Some(r.varint().map_err(corrupt)?),
                BLOCKSIZE_TAG => msg.blocksizes.push(r.varint().map_err(corrupt)?),
                MODE_TAG => msg.mode = Some(r.varint().map_err(corrupt)? as u32),
                MTIME_TAG => {
                    let mut inner = Reader::new(r.bytes().map_err(corrupt)?);
                    while !inner.done() {
                        match inner.varint().map_err(corrupt)? {
                            MTIME_SECONDS_TAG => {
                                msg.mtime_seconds = Some(inner.varint().map_err(corrupt)?)
                            }
                            tag => {
                                return Err(Error::Corrupt(format!("unexpected mtime tag {tag}")))
                            }
                        }
                    }
                }
                tag => return Err(Error::Corrupt(format!("unexpected metadata tag {tag}"))),
            }
        }
        msg.node_type =
            node_type.ok_or_else(|| Error::Corrupt("metadata missing node type".to_owned()))?;
        Ok(msg)
    }
}

fn corrupt(e: cask_ipld::Error) -> Error {
    Error::Corrupt(e.to_string())
}
