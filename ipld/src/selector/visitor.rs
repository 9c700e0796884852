// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Ready-made consumers for selector walks: collect into a vec, stream
//! through a bounded channel, or stop at the first node matching a
//! predicate.

use super::{Selector, WalkParams};
use crate::{Error, Ipld, LinkSystem};
use cask_blockstore::BlockStore;
use cask_cid::Cid;
use futures::future::BoxFuture;
use parking_lot::Mutex;

/// Walk from `root` and collect every matched node, in visitation order,
/// paired with the CID of the block it was decoded from.
pub async fn collect<S>(
    ls: &LinkSystem<S>,
    root: &Cid,
    selector: Selector,
    params: WalkParams,
) -> Result<Vec<(Cid, Ipld)>, Error>
where
    S: BlockStore + Send + Sync,
{
    let results = Mutex::new(Vec::new());
    let root_cid = *root;
    selector
        .walk_matching(
            &Ipld::Link(root_cid),
            Some(ls.clone()),
            params,
            &|prog, node, _| {
                let cid = prog.last_block().map(|b| b.link).unwrap_or(root_cid);
                results.lock().push((cid, node.clone()));
                let done: BoxFuture<'static, Result<(), Error>> = Box::pin(async { Ok(()) });
                done
            },
        )
        .await?;
    Ok(results.into_inner())
}

/// Walk from `root` on a spawned task, sending every matched node through a
/// channel bounded at `cap`. A full channel blocks the walker until the
/// consumer catches up; dropping the receiver stops the walk.
pub fn walk_stream<S>(
    ls: &LinkSystem<S>,
    root: Cid,
    selector: Selector,
    params: WalkParams,
    cap: usize,
) -> flume::Receiver<(Cid, Ipld)>
where
    S: BlockStore + Send + Sync + 'static,
{
    let (tx, rx) = flume::bounded(cap);
    let ls = ls.clone();
    tokio::spawn(async move {
        let result = selector
            .walk_matching(
                &Ipld::Link(root),
                Some(ls),
                params,
                &|prog, node, _| {
                    let cid = prog.last_block().map(|b| b.link).unwrap_or(root);
                    let item = (cid, node.clone());
                    let tx = tx.clone();
                    let send: BoxFuture<'static, Result<(), Error>> = Box::pin(async move {
                        tx.send_async(item).await.map_err(|_| Error::Interrupted)
                    });
                    send
                },
            )
            .await;
        match result {
            Ok(()) | Err(Error::Interrupted) => {}
            Err(e) => tracing::warn!("selector stream aborted: {e}"),
        }
    });
    rx
}

/// Walk from `root` until a matched node satisfies `pred`, then stop.
pub async fn find_one<S, P>(
    ls: &LinkSystem<S>,
    root: &Cid,
    selector: Selector,
    params: WalkParams,
    pred: P,
) -> Result<Option<(Cid, Ipld)>, Error>
where
    S: BlockStore + Send + Sync,
    P: Fn(&Ipld) -> bool + Sync,
{
    let found = Mutex::new(None);
    let root_cid = *root;
    let result = selector
        .walk_matching(
            &Ipld::Link(root_cid),
            Some(ls.clone()),
            params,
            &|prog, node, _| {
                if pred(node) {
                    let cid = prog.last_block().map(|b| b.link).unwrap_or(root_cid);
                    *found.lock() = Some((cid, node.clone()));
                    let halt: BoxFuture<'static, Result<(), Error>> =
                        Box::pin(async { Err(Error::Interrupted) });
                    return halt;
                }
                let done: BoxFuture<'static, Result<(), Error>> = Box::pin(async { Ok(()) });
                done
            },
        )
        .await;
    match result {
        Ok(()) | Err(Error::Interrupted) => Ok(found.into_inner()),
        Err(e) => Err(e),
    }
}
