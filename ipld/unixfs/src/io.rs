// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Moving host files and directory trees in and out of the block store.

use crate::builder::add_sized;
use crate::chunker::adaptive_chunk_size;
use crate::dir::DirBuilder;
use crate::pb::{NodeType, UnixFsData};
use crate::reader::FileReader;
use crate::{Error, UnixfsConfig};
use async_recursion::async_recursion;
use cask_blockstore::BlockStore;
use cask_cid::{Cid, DAG_PB, IDENTITY, RAW};
use cask_ipld::codec::dag_pb::PbNode;
use cask_ipld::LinkSystem;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;

/// Host-side import options.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostOptions {
    /// Follow symlinks instead of failing on them.
    pub follow_symlinks: bool,
    /// Let each file's size pick its effective chunk size (see
    /// [`adaptive_chunk_size`](crate::adaptive_chunk_size)). Off by
    /// default: the chunk size feeds the leaf layout, so turning this on
    /// changes root CIDs.
    pub adaptive_chunking: bool,
}

/// Import a host file or directory tree, returning the root CID. Relative
/// layout and names are preserved; entries within each directory are
/// stored sorted by name.
pub async fn put_path<S>(
    ls: &LinkSystem<S>,
    config: &UnixfsConfig,
    opts: &HostOptions,
    path: impl AsRef<Path>,
) -> Result<Cid, Error>
where
    S: BlockStore + Send + Sync,
{
    let (cid, tsize) = put_path_inner(ls, config, opts, path.as_ref()).await?;
    tracing::debug!(%cid, size = tsize, path = %path.as_ref().display(), "imported host path");
    Ok(cid)
}

#[async_recursion]
async fn put_path_inner<S>(
    ls: &LinkSystem<S>,
    config: &UnixfsConfig,
    opts: &HostOptions,
    path: &Path,
) -> Result<(Cid, u64), Error>
where
    S: BlockStore + Send + Sync,
{
    let meta = tokio::fs::symlink_metadata(path).await?;
    if meta.is_symlink() {
        if !opts.follow_symlinks {
            return Err(Error::Symlink(path.to_path_buf()));
        }
        // Re-stat through the link and continue with the target's kind.
        let target = tokio::fs::metadata(path).await?;
        if target.is_dir() {
            return put_dir(ls, config, opts, path).await;
        }
        return put_file(ls, config, opts, path).await;
    }
    if meta.is_dir() {
        return put_dir(ls, config, opts, path).await;
    }
    put_file(ls, config, opts, path).await
}

async fn put_file<S>(
    ls: &LinkSystem<S>,
    config: &UnixfsConfig,
    opts: &HostOptions,
    path: &Path,
) -> Result<(Cid, u64), Error>
where
    S: BlockStore + Send + Sync,
{
    let file = tokio::fs::File::open(path).await?;
    if opts.adaptive_chunking {
        let size = file.metadata().await?.len();
        let config = UnixfsConfig {
            chunk_size: adaptive_chunk_size(size, config.chunk_size),
            ..config.clone()
        };
        return add_sized(ls, file, &config).await;
    }
    add_sized(ls, file, config).await
}

async fn put_dir<S>(
    ls: &LinkSystem<S>,
    config: &UnixfsConfig,
    opts: &HostOptions,
    path: &Path,
) -> Result<(Cid, u64), Error>
where
    S: BlockStore + Send + Sync,
{
    let mut builder = DirBuilder::new();
    let mut entries = tokio::fs::read_dir(path).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let (cid, tsize) = put_path_inner(ls, config, opts, &entry.path()).await?;
        builder.add(name, cid, tsize)?;
    }
    builder.build(ls, config)
}

/// Export the DAG at `root` to a host path: files become files,
/// directories become directories with their entries.
#[async_recursion]
pub async fn get_path<S>(ls: &LinkSystem<S>, root: &Cid, dest: &Path) -> Result<(), Error>
where
    S: BlockStore + Send + Sync,
{
    if root.codec() == RAW || root.codec() == IDENTITY {
        return write_file(ls, root, dest).await;
    }
    if root.codec() != DAG_PB {
        return Err(Error::Corrupt(format!(
            "unexpected codec {:#x} in exported DAG",
            root.codec()
        )));
    }
    let bytes = ls.store_ref().get_block(root)?;
    let node = PbNode::from_bytes(&bytes)?;
    let meta = UnixFsData::from_bytes(node.data.as_deref().unwrap_or_default())?;
    match meta.node_type {
        NodeType::Directory => {
            tokio::fs::create_dir_all(dest).await?;
            for link in &node.links {
                let name = link.name.clone().unwrap_or_default();
                if name.is_empty() {
                    return Err(Error::Corrupt("directory entry without a name".to_owned()));
                }
                get_path(ls, &link.cid, &dest.join(name)).await?;
            }
            Ok(())
        }
        NodeType::File | NodeType::Raw => write_file(ls, root, dest).await,
        other => Err(Error::Corrupt(format!(
            "cannot export node type {other:?} to a host path"
        ))),
    }
}

async fn write_file<S>(ls: &LinkSystem<S>, root: &Cid, dest: &Path) -> Result<(), Error>
where
    S: BlockStore + Send + Sync,
{
    let mut reader = FileReader::new(ls.clone(), *root, CancellationToken::new())?;
    let mut out = tokio::fs::File::create(dest).await?;
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        out.write_all(&buf[..n]).await?;
    }
    out.flush().await?;
    tracing::debug!(cid = %root, path = %dest.display(), "exported file");
    Ok(())
}
