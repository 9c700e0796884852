// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::Selector;
use crate::{CidHashSet, Error, Ipld, Path, PathSegment};
use async_recursion::async_recursion;
use async_trait::async_trait;
use cask_cid::Cid;
use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

/// Provides reason for callback in traversal for `walk_all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitReason {
    /// Ipld node visited was a specific match.
    SelectionMatch,
    /// Ipld node was visited while searching for matches.
    SelectionCandidate,
}

#[async_trait]
pub trait LinkResolver {
    /// Resolves a Cid link into its respective Ipld node together with the
    /// encoded block size, or `None` if the block is absent.
    async fn load_link(&self, link: &Cid) -> Result<Option<(Ipld, u64)>, Error>;
}

#[async_trait]
impl<T: LinkResolver + Sync> LinkResolver for &T {
    async fn load_link(&self, link: &Cid) -> Result<Option<(Ipld, u64)>, Error> {
        (**self).load_link(link).await
    }
}

#[async_trait]
impl LinkResolver for () {
    async fn load_link(&self, _link: &Cid) -> Result<Option<(Ipld, u64)>, Error> {
        Err(Error::InvalidLink(
            "no link resolver configured for this traversal".into(),
        ))
    }
}

/// Remaining allowances for one traversal. Every visited node, crossed link
/// and loaded byte draws the corresponding counter down; hitting zero fails
/// the walk with `BudgetExceeded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    pub nodes: u64,
    pub links: u64,
    pub bytes: u64,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            nodes: u64::MAX,
            links: u64::MAX,
            bytes: u64::MAX,
        }
    }
}

impl Budget {
    fn charge(counter: &mut u64, amount: u64, what: &'static str) -> Result<(), Error> {
        *counter = counter
            .checked_sub(amount)
            .ok_or(Error::BudgetExceeded(what))?;
        Ok(())
    }

    fn charge_node(&mut self) -> Result<(), Error> {
        Self::charge(&mut self.nodes, 1, "nodes")
    }

    fn charge_link(&mut self) -> Result<(), Error> {
        Self::charge(&mut self.links, 1, "links")
    }

    fn charge_bytes(&mut self, n: u64) -> Result<(), Error> {
        Self::charge(&mut self.bytes, n, "bytes")
    }
}

/// Bounds and cancellation for one traversal.
#[derive(Debug, Clone, Default)]
pub struct WalkParams {
    pub budget: Option<Budget>,
    pub token: CancellationToken,
}

/// Contains information about the last block that was traversed in walking
/// of the ipld graph.
#[derive(Debug, PartialEq, Clone)]
pub struct LastBlockInfo {
    pub path: Path,
    pub link: Cid,
}

/// Contains progress of traversal and last block information from link
/// traversals.
pub struct Progress<L = ()> {
    resolver: Option<L>,
    path: Path,
    last_block: Option<LastBlockInfo>,
    seen: CidHashSet,
    budget: Option<Budget>,
    token: CancellationToken,
}

/// A walk callback. Runs once per visited node; the returned future is
/// awaited before the traversal continues, so a slow consumer backpressures
/// the walker. Returning `Error::Interrupted` stops the walk early.
pub type WalkCallback<'a, L> =
    &'a (dyn Fn(&Progress<L>, &Ipld, VisitReason) -> BoxFuture<'static, Result<(), Error>> + Sync);

impl Selector {
    /// Walks all nodes visited (not just matched nodes) and executes the
    /// callback with progress and Ipld node. An optional link resolver is
    /// passed in to be able to traverse links.
    pub async fn walk_all<L>(
        self,
        ipld: &Ipld,
        resolver: Option<L>,
        params: WalkParams,
        callback: WalkCallback<'_, L>,
    ) -> Result<(), Error>
    where
        L: LinkResolver + Sync + Send,
    {
        Progress {
            resolver,
            path: Path::default(),
            last_block: None,
            seen: CidHashSet::new(),
            budget: params.budget,
            token: params.token,
        }
        .walk_all(ipld, self, callback)
        .await
    }

    /// Walks a graph of Ipld nodes, executing the callback only on the
    /// nodes "matched" by the selector.
    pub async fn walk_matching<L>(
        self,
        ipld: &Ipld,
        resolver: Option<L>,
        params: WalkParams,
        callback: WalkCallback<'_, L>,
    ) -> Result<(), Error>
    where
        L: LinkResolver + Sync + Send,
    {
        self.walk_all(ipld, resolver, params, &|prog, ipld, reason| match reason {
            VisitReason::SelectionMatch => callback(prog, ipld, reason),
            VisitReason::SelectionCandidate => {
                let done: BoxFuture<'static, Result<(), Error>> = Box::pin(async { Ok(()) });
                done
            }
        })
        .await
    }
}

impl<L> Progress<L>
where
    L: LinkResolver + Sync + Send,
{
    /// Returns the path of the current progress.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the last block information from a link traversal.
    pub fn last_block(&self) -> Option<&LastBlockInfo> {
        self.last_block.as_ref()
    }

    fn charge<F>(&mut self, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Budget) -> Result<(), Error>,
    {
        match &mut self.budget {
            Some(budget) => f(budget),
            None => Ok(()),
        }
    }

    #[async_recursion]
    async fn walk_all(
        &mut self,
        ipld: &Ipld,
        selector: Selector,
        callback: WalkCallback<'async_recursion, L>,
    ) -> Result<(), Error> {
        if self.token.is_cancelled() {
            return Err(Error::Cancelled);
        }

        // Resolve any links transparently before traversing.
        if let Ipld::Link(cid) = ipld {
            // Content already walked through another link is skipped; the
            // seen set keys on the multihash, so codec variants dedup too.
            if !self.seen.insert(cid) {
                return Ok(());
            }
            if self.resolver.is_none() {
                return Ok(());
            }
            self.charge(Budget::charge_link)?;
            self.last_block = Some(LastBlockInfo {
                path: self.path.clone(),
                link: *cid,
            });

            let mut node = self.load_link(cid).await?;
            while let Some((Ipld::Link(c), _)) = node {
                if !self.seen.insert(&c) {
                    return Ok(());
                }
                self.charge(Budget::charge_link)?;
                self.last_block = Some(LastBlockInfo {
                    path: self.path.clone(),
                    link: c,
                });
                node = self.load_link(&c).await?;
            }

            if let Some((n, _)) = node {
                return self.walk_all(&n, selector, callback).await;
            }

            // Link did not resolve to anything, stop traversal.
            return Ok(());
        }

        self.charge(Budget::charge_node)?;
        let reason = if selector.decide() {
            VisitReason::SelectionMatch
        } else {
            VisitReason::SelectionCandidate
        };
        callback(self, ipld, reason).await?;

        // If Ipld is list or map, continue traversal, otherwise return.
        match ipld {
            Ipld::Map(_) | Ipld::List(_) => (),
            _ => return Ok(()),
        }

        match selector.interests() {
            Some(interests) => {
                for ps in interests {
                    let v = match ipld.lookup_segment(&ps) {
                        Some(ipld) => ipld,
                        None => continue,
                    };
                    self.traverse_node(ipld, selector.clone(), callback, ps, v)
                        .await?;
                }
                Ok(())
            }
            None => {
                match ipld {
                    Ipld::Map(m) => {
                        for (k, v) in m.iter() {
                            let ps = PathSegment::from(k.as_ref());
                            self.traverse_node(ipld, selector.clone(), callback, ps, v)
                                .await?;
                        }
                    }
                    Ipld::List(list) => {
                        for (i, v) in list.iter().enumerate() {
                            let ps = PathSegment::from(i);
                            self.traverse_node(ipld, selector.clone(), callback, ps, v)
                                .await?;
                        }
                    }
                    _ => unreachable!("kind checked above"),
                }

                Ok(())
            }
        }
    }

    async fn load_link(&mut self, cid: &Cid) -> Result<Option<(Ipld, u64)>, Error> {
        let resolver = self
            .resolver
            .as_ref()
            .ok_or_else(|| Error::InvalidLink("resolver disappeared mid-walk".into()))?;
        let loaded = resolver.load_link(cid).await?;
        if let Some((_, size)) = &loaded {
            let size = *size;
            self.charge(|b| b.charge_bytes(size))?;
        }
        Ok(loaded)
    }

    /// Utility function just to reduce duplicate logic. Can't do with a
    /// closure because async closures are currently unstable.
    async fn traverse_node(
        &mut self,
        ipld: &Ipld,
        selector: Selector,
        callback: WalkCallback<'_, L>,
        ps: PathSegment,
        v: &Ipld,
    ) -> Result<(), Error> {
        if let Some(next_selector) = selector.explore(ipld, &ps) {
            self.path.push(ps);
            self.walk_all(v, next_selector, callback).await?;
            self.path.pop();
        }
        Ok(())
    }
}
