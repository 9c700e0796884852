// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::pb::{NodeType, UnixFsData};
use crate::{Error, UnixfsConfig};
use cask_blockstore::BlockStore;
use cask_cid::{Cid, DAG_PB};
use cask_ipld::codec::dag_pb::{PbLink, PbNode};
use cask_ipld::LinkSystem;

/// A named directory entry with the total encoded size of its subtree.
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: String,
    pub cid: Cid,
    pub tsize: u64,
}

/// Assembles a directory node. Entries are stored sorted by name so the
/// same membership always yields the same CID, regardless of insertion
/// order.
#[derive(Default)]
pub struct DirBuilder {
    entries: Vec<DirEntry>,
    mode: Option<u32>,
    mtime_seconds: Option<u64>,
}

impl DirBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. Names are unique within a directory.
    pub fn add(&mut self, name: impl Into<String>, cid: Cid, tsize: u64) -> Result<&mut Self, Error> {
        let name = name.into();
        if self.entries.iter().any(|e| e.name == name) {
            return Err(Error::DuplicateName(name));
        }
        self.entries.push(DirEntry { name, cid, tsize });
        Ok(self)
    }

    pub fn mode(&mut self, mode: u32) -> &mut Self {
        self.mode = Some(mode);
        self
    }

    pub fn mtime_seconds(&mut self, seconds: u64) -> &mut Self {
        self.mtime_seconds = Some(seconds);
        self
    }

    /// Encode and store the directory, returning its CID and encoded size.
    pub fn build<S>(mut self, ls: &LinkSystem<S>, config: &UnixfsConfig) -> Result<(Cid, u64), Error>
    where
        S: BlockStore + Send + Sync,
    {
        self.entries.sort_by(|a, b| a.name.cmp(&b.name));
        let meta = UnixFsData {
            mode: self.mode,
            mtime_seconds: self.mtime_seconds,
            ..UnixFsData::directory()
        };
        let node = PbNode {
            links: self
                .entries
                .iter()
                .map(|e| PbLink {
                    cid: e.cid,
                    name: Some(e.name.clone()),
                    tsize: Some(e.tsize),
                })
                .collect(),
            data: Some(meta.to_bytes()),
        };
        let bytes = node.to_bytes();
        let cid = ls.store_ref().put_with_prefix(&config.internal_prefix(), &bytes)?;
        let tsize = bytes.len() as u64 + self.entries.iter().map(|e| e.tsize).sum::<u64>();
        Ok((cid, tsize))
    }
}

fn load_dir<S>(ls: &LinkSystem<S>, cid: &Cid) -> Result<PbNode, Error>
where
    S: BlockStore + Send + Sync,
{
    if cid.codec() != DAG_PB {
        return Err(Error::NotADirectory(*cid));
    }
    let bytes = ls.store_ref().get_block(cid)?;
    let node = PbNode::from_bytes(&bytes)?;
    let meta = UnixFsData::from_bytes(node.data.as_deref().unwrap_or_default())?;
    if meta.node_type != NodeType::Directory {
        return Err(Error::NotADirectory(*cid));
    }
    Ok(node)
}

/// List a directory's entries as `(name, cid, tsize)`, in stored order.
pub fn list<S>(ls: &LinkSystem<S>, dir: &Cid) -> Result<Vec<(String, Cid, u64)>, Error>
where
    S: BlockStore + Send + Sync,
{
    let node = load_dir(ls, dir)?;
    Ok(node
        .links
        .into_iter()
        .map(|l| (l.name.unwrap_or_default(), l.cid, l.tsize.unwrap_or(0)))
        .collect())
}

/// Follow a `/`-separated name path through directory nodes, returning the
/// CID of the addressed entry. A non-directory met mid-path fails
/// `NotADirectory`; a missing name fails `NameNotFound`.
pub fn resolve_path<S>(ls: &LinkSystem<S>, root: &Cid, path: &str) -> Result<Cid, Error>
where
    S: BlockStore + Send + Sync,
{
    let mut current = *root;
    for name in path.split('/').filter(|s| !s.is_empty()) {
        let node = load_dir(ls, &current)?;
        current = node
            .links
            .iter()
            .find(|l| l.name.as_deref() == Some(name))
            .map(|l| l.cid)
            .ok_or_else(|| Error::NameNotFound {
                dir: current,
                name: name.to_owned(),
            })?;
    }
    Ok(current)
}
