// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::chunker::Chunker;
use crate::pb::UnixFsData;
use crate::{Error, UnixfsConfig};
use cask_blockstore::BlockStore;
use cask_cid::Cid;
use cask_ipld::codec::dag_pb::{PbLink, PbNode};
use cask_ipld::LinkSystem;
use tokio::io::AsyncRead;

/// A stored child of an internal node: content size versus total encoded
/// size of the subtree (the dag-pb `Tsize`).
#[derive(Debug, Clone, Copy)]
struct ChildRef {
    cid: Cid,
    blocksize: u64,
    tsize: u64,
}

/// Chunk `reader` and assemble a balanced file DAG: raw leaves, dag-pb
/// internal nodes of up to `fanout` children. A file that fits in one
/// chunk collapses to a bare raw leaf; an empty file is an empty leaf.
pub async fn add<R, S>(ls: &LinkSystem<S>, reader: R, config: &UnixfsConfig) -> Result<Cid, Error>
where
    R: AsyncRead + Unpin,
    S: BlockStore + Send + Sync,
{
    Ok(add_sized(ls, reader, config).await?.0)
}

/// As [`add`], also reporting the total encoded size of the stored DAG
/// (the value a parent directory records as `Tsize`).
pub async fn add_sized<R, S>(
    ls: &LinkSystem<S>,
    reader: R,
    config: &UnixfsConfig,
) -> Result<(Cid, u64), Error>
where
    R: AsyncRead + Unpin,
    S: BlockStore + Send + Sync,
{
    let mut chunker = Chunker::new(reader, config.chunk_size);
    let mut children = Vec::new();
    while let Some(chunk) = chunker.next_chunk().await? {
        let cid = ls.store_ref().put_with_prefix(&config.prefix, &chunk)?;
        children.push(ChildRef {
            cid,
            blocksize: chunk.len() as u64,
            tsize: chunk.len() as u64,
        });
    }

    if children.is_empty() {
        let cid = ls.store_ref().put_with_prefix(&config.prefix, &[])?;
        return Ok((cid, 0));
    }

    let pb_prefix = config.internal_prefix();
    while children.len() > 1 {
        let mut next = Vec::with_capacity(children.len().div_ceil(config.fanout));
        for group in children.chunks(config.fanout) {
            next.push(stitch(ls, group, &pb_prefix)?);
        }
        children = next;
    }
    Ok((children[0].cid, children[0].tsize))
}

/// Store all of `data` as a file DAG.
pub async fn put_bytes<S>(
    ls: &LinkSystem<S>,
    data: &[u8],
    config: &UnixfsConfig,
) -> Result<Cid, Error>
where
    S: BlockStore + Send + Sync,
{
    add(ls, data, config).await
}

fn stitch<S>(
    ls: &LinkSystem<S>,
    group: &[ChildRef],
    pb_prefix: &cask_cid::Prefix,
) -> Result<ChildRef, Error>
where
    S: BlockStore + Send + Sync,
{
    let meta = UnixFsData::file(group.iter().map(|c| c.blocksize).collect());
    let node = PbNode {
        links: group
            .iter()
            .map(|c| PbLink {
                cid: c.cid,
                name: Some(String::new()),
                tsize: Some(c.tsize),
            })
            .collect(),
        data: Some(meta.to_bytes()),
    };
    let bytes = node.to_bytes();
    let cid = ls.store_ref().put_with_prefix(pb_prefix, &bytes)?;
    Ok(ChildRef {
        cid,
        blocksize: group.iter().map(|c| c.blocksize).sum(),
        tsize: bytes.len() as u64 + group.iter().map(|c| c.tsize).sum::<u64>(),
    })
}
