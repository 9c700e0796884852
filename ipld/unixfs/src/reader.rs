// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::pb::{NodeType, UnixFsData};
use crate::Error;
use cask_blockstore::BlockStore;
use cask_cid::{Cid, DAG_PB, IDENTITY, RAW};
use cask_ipld::codec::dag_pb::PbNode;
use cask_ipld::LinkSystem;
use tokio_util::sync::CancellationToken;

/// Where the reader is in its lifecycle. `Loading`/`Reading` carry the
/// index of the top-level child being served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadState {
    Init,
    Loading(usize),
    Reading(usize),
    Done,
}

/// Streaming reader over a file DAG. Loads one leaf at a time; `seek`
/// descends the cumulative block sizes to the covering leaf instead of
/// scanning. Cancellation mid-read parks the reader in `Done`.
pub struct FileReader<S> {
    ls: LinkSystem<S>,
    root: Cid,
    size: u64,
    pos: u64,
    state: ReadState,
    /// Currently loaded leaf: start offset within the file plus its bytes.
    leaf: Option<(u64, Vec<u8>)>,
    token: CancellationToken,
}

impl<S: BlockStore + Send + Sync> FileReader<S> {
    pub fn new(ls: LinkSystem<S>, root: Cid, token: CancellationToken) -> Result<Self, Error> {
        let size = file_size(&ls, &root)?;
        Ok(Self {
            ls,
            root,
            size,
            pos: 0,
            state: ReadState::Init,
            leaf: None,
            token,
        })
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn position(&self) -> u64 {
        self.pos
    }

    pub fn state(&self) -> ReadState {
        self.state
    }

    /// Reposition the reader. Seeking past the end clamps to the end; a
    /// finished reader becomes usable again.
    pub fn seek(&mut self, offset: u64) {
        self.pos = offset.min(self.size);
        let covered = matches!(&self.leaf, Some((start, bytes))
            if self.pos >= *start && self.pos < *start + bytes.len() as u64);
        if !covered {
            self.leaf = None;
            self.state = ReadState::Init;
        }
    }

    /// Read up to `buf.len()` bytes at the current position. `Ok(0)` means
    /// end of file.
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        if self.token.is_cancelled() {
            self.state = ReadState::Done;
            return Err(Error::Cancelled);
        }
        if self.pos >= self.size || buf.is_empty() {
            if self.pos >= self.size {
                self.state = ReadState::Done;
            }
            return Ok(0);
        }

        let covered = matches!(&self.leaf, Some((start, bytes))
            if self.pos >= *start && self.pos < *start + bytes.len() as u64);
        if !covered {
            self.load_covering_leaf().await?;
        }
        let (start, bytes) = self
            .leaf
            .as_ref()
            .ok_or_else(|| Error::Corrupt("no leaf covers the read position".to_owned()))?;

        let offset_in_leaf = (self.pos - start) as usize;
        let n = buf.len().min(bytes.len() - offset_in_leaf);
        buf[..n].copy_from_slice(&bytes[offset_in_leaf..offset_in_leaf + n]);
        self.pos += n as u64;
        Ok(n)
    }

    /// Read exactly `len` bytes starting at `offset`; fails with an
    /// `UnexpectedEof` I/O error when the file ends first.
    pub async fn read_exact_at(&mut self, offset: u64, len: usize) -> Result<Vec<u8>, Error> {
        self.seek(offset);
        let mut out = vec![0u8; len];
        let mut filled = 0;
        while filled < len {
            let n = self.read(&mut out[filled..]).await?;
            if n == 0 {
                return Err(Error::Io(std::io::ErrorKind::UnexpectedEof.into()));
            }
            filled += n;
        }
        Ok(out)
    }

    /// Read the remainder of the file from the current position.
    pub async fn read_to_end(&mut self) -> Result<Vec<u8>, Error> {
        let mut out = Vec::with_capacity((self.size - self.pos) as usize);
        let mut buf = vec![0u8; 64 * 1024];
        loop {
            let n = self.read(&mut buf).await?;
            if n == 0 {
                return Ok(out);
            }
            out.extend_from_slice(&buf[..n]);
        }
    }

    /// Descend from the root along cumulative block sizes until the leaf
    /// containing `self.pos` is in hand.
    async fn load_covering_leaf(&mut self) -> Result<(), Error> {
        let mut cid = self.root;
        let mut start = 0u64;
        let mut depth = 0usize;
        loop {
            if self.token.is_cancelled() {
                self.state = ReadState::Done;
                return Err(Error::Cancelled);
            }
            if cid.codec() == RAW || cid.codec() == IDENTITY {
                let bytes = self.ls.store_ref().get_block(&cid)?;
                self.leaf = Some((start, bytes));
                self.state = ReadState::Reading(self.top_index());
                return Ok(());
            }
            if cid.codec() != DAG_PB {
                return Err(Error::Corrupt(format!(
                    "unexpected codec {:#x} inside file DAG",
                    cid.codec()
                )));
            }
            let bytes = self.ls.store_ref().get_block(&cid)?;
            let node = PbNode::from_bytes(&bytes)?;
            let meta = UnixFsData::from_bytes(node.data.as_deref().unwrap_or_default())?;
            if node.links.is_empty() {
                // Inline content node.
                self.leaf = Some((start, meta.data.unwrap_or_default()));
                self.state = ReadState::Reading(self.top_index());
                return Ok(());
            }
            if meta.blocksizes.len() != node.links.len() {
                return Err(Error::Corrupt(format!(
                    "{} links but {} blocksizes",
                    node.links.len(),
                    meta.blocksizes.len()
                )));
            }
            let mut next = None;
            for (index, (link, bs)) in node.links.iter().zip(&meta.blocksizes).enumerate() {
                if self.pos < start + bs {
                    if depth == 0 {
                        self.state = ReadState::Loading(index);
                    }
                    next = Some(link.cid);
                    break;
                }
                start += bs;
            }
            cid = next.ok_or_else(|| {
                Error::Corrupt("position beyond the node's block sizes".to_owned())
            })?;
            depth += 1;
        }
    }

    fn top_index(&self) -> usize {
        match self.state {
            ReadState::Loading(i) | ReadState::Reading(i) => i,
            _ => 0,
        }
    }
}

/// Read back the whole content of a file DAG.
pub async fn get_bytes<S: BlockStore + Send + Sync>(
    ls: &LinkSystem<S>,
    root: &Cid,
) -> Result<Vec<u8>, Error> {
    let mut reader = FileReader::new(ls.clone(), *root, CancellationToken::new())?;
    reader.read_to_end().await
}

/// Total content size of the file DAG rooted at `cid`.
pub fn file_size<S: BlockStore + Send + Sync>(ls: &LinkSystem<S>, cid: &Cid) -> Result<u64, Error> {
    if cid.codec() == RAW || cid.codec() == IDENTITY {
        return Ok(ls.store_ref().block_size(cid)?);
    }
    if cid.codec() != DAG_PB {
        return Err(Error::NotAFile(*cid));
    }
    let bytes = ls.store_ref().get_block(cid)?;
    let node = PbNode::from_bytes(&bytes)?;
    let meta = UnixFsData::from_bytes(node.data.as_deref().unwrap_or_default())?;
    match meta.node_type {
        NodeType::File | NodeType::Raw => {}
        _ => return Err(Error::NotAFile(*cid)),
    }
    if let Some(filesize) = meta.filesize {
        let sum: u64 = meta.blocksizes.iter().sum();
        if !meta.blocksizes.is_empty() && sum != filesize {
            return Err(Error::Corrupt(format!(
                "filesize {filesize} disagrees with blocksizes sum {sum}"
            )));
        }
        return Ok(filesize);
    }
    Ok(meta.data.map(|d| d.len() as u64).unwrap_or(0))
}
