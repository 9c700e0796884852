// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::{CarWriter, Error};
use cask_blockstore::BlockStore;
use cask_cid::{Cid, Code};
use cask_ipld::selector::{LinkResolver, Selector, WalkParams};
use cask_ipld::{CidHashSet, Ipld, LinkSystem};
use futures::future::BoxFuture;
use tokio::io::AsyncWrite;
use tokio::sync::Mutex;

/// Resolver that serves the traversal from the local store while teeing
/// every block it loads into the archive, deduplicated on multihash.
struct TeeResolver<'a, S, W> {
    ls: &'a LinkSystem<S>,
    writer: Mutex<&'a mut CarWriter<W>>,
    seen: Mutex<CidHashSet>,
}

#[async_trait::async_trait]
impl<S, W> LinkResolver for TeeResolver<'_, S, W>
where
    S: BlockStore + Send + Sync,
    W: AsyncWrite + Send + Unpin,
{
    async fn load_link(&self, link: &Cid) -> Result<Option<(Ipld, u64)>, cask_ipld::Error> {
        let bytes = match self.ls.store_ref().get_block(link) {
            Ok(bytes) => bytes,
            Err(cask_blockstore::Error::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let is_identity = link.hash().code() == u64::from(Code::Identity);
        if !is_identity && self.seen.lock().await.insert(link) {
            self.writer
                .lock()
                .await
                .write_block(link, &bytes)
                .await
                .map_err(|e| cask_ipld::Error::Custom(e.to_string()))?;
        }
        let node = self.ls.codecs().decode(link.codec(), &bytes)?;
        Ok(Some((node, bytes.len() as u64)))
    }
}

/// Export the subgraphs reachable from `roots` into a CAR archive, in
/// depth-first pre-order from each root in input order. A selector narrows
/// what is walked; without one the whole reachable graph goes. Shared
/// blocks are written once. A root whose walk reaches nothing extra is not
/// an error.
pub async fn export<S, W>(
    ls: &LinkSystem<S>,
    roots: &[Cid],
    selector: Option<Selector>,
    writer: W,
    params: WalkParams,
) -> Result<(), Error>
where
    S: BlockStore + Send + Sync,
    W: AsyncWrite + Send + Unpin,
{
    let mut car = CarWriter::new(writer, roots.to_vec());
    let tee = TeeResolver {
        ls,
        writer: Mutex::new(&mut car),
        seen: Mutex::new(CidHashSet::new()),
    };

    for root in roots {
        let sel = selector
            .clone()
            .unwrap_or_else(Selector::explore_all_recursively);
        sel.walk_all(
            &Ipld::Link(*root),
            Some(&tee),
            params.clone(),
            &|_, _, _| {
                let done: BoxFuture<'static, Result<(), cask_ipld::Error>> =
                    Box::pin(async { Ok(()) });
                done
            },
        )
        .await?;
    }

    drop(tee);
    car.finalize().await?;
    Ok(())
}
