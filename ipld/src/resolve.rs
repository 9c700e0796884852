// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::{Error, Ipld, LinkSystem, Path};
use cask_blockstore::BlockStore;
use cask_cid::Cid;

/// Walk `path` downwards from the node behind `root`, crossing links
/// transparently, and return the addressed node together with the CID of
/// the block it lives in.
///
/// Links are followed both mid-path and at the tail, so resolving `a/b`
/// lands on the same node as resolving `a` and then `b` from its result.
/// A segment that does not address a child fails `PathNotFound` naming the
/// prefix that did resolve.
pub fn resolve_path<S: BlockStore + Send + Sync>(
    ls: &LinkSystem<S>,
    root: &Cid,
    path: &Path,
) -> Result<(Ipld, Cid), Error> {
    let mut current_cid = *root;
    let mut current = ls.load(root)?;
    let mut resolved = Path::default();

    for segment in path.segments() {
        // Cross any chain of links before indexing.
        while let Ipld::Link(cid) = current {
            current = ls.load(&cid)?;
            current_cid = cid;
        }
        match current.lookup_segment(segment) {
            Some(child) => current = child.clone(),
            None => {
                return Err(Error::PathNotFound {
                    resolved: resolved.to_string(),
                    segment: segment.to_string(),
                })
            }
        }
        resolved.push(segment.clone());
    }

    // Land on the linked node itself, not the link value.
    while let Ipld::Link(cid) = current {
        current = ls.load(&cid)?;
        current_cid = cid;
    }

    Ok((current, current_cid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipld;
    use cask_cid::{Code, Prefix, Version, DAG_CBOR};
    use cask_db::MemoryDb;
    use std::sync::Arc;

    fn cbor_prefix() -> Prefix {
        Prefix::new(Version::V1, DAG_CBOR, Code::Sha2_256.into(), None).unwrap()
    }

    fn setup() -> (LinkSystem<MemoryDb>, Cid, Cid) {
        let ls = LinkSystem::new(Arc::new(MemoryDb::default()));
        let leaf = ls
            .store_node(&ipld!({"value": 42}), &cbor_prefix())
            .unwrap();
        let root = ls
            .store_node(
                &ipld!({"child": Link(leaf), "items": ["x", {"deep": Link(leaf)}]}),
                &cbor_prefix(),
            )
            .unwrap();
        (ls, root, leaf)
    }

    #[test]
    fn resolve_within_one_block() {
        let (ls, root, _) = setup();
        let (node, block) = resolve_path(&ls, &root, &"items/0".into()).unwrap();
        assert_eq!(node, ipld!("x"));
        assert_eq!(block, root);
    }

    #[test]
    fn resolve_across_links() {
        let (ls, root, leaf) = setup();
        let (node, block) = resolve_path(&ls, &root, &"child/value".into()).unwrap();
        assert_eq!(node, ipld!(42));
        assert_eq!(block, leaf);

        let (node, block) = resolve_path(&ls, &root, &"items/1/deep/value".into()).unwrap();
        assert_eq!(node, ipld!(42));
        assert_eq!(block, leaf);
    }

    #[test]
    fn trailing_link_is_followed() {
        let (ls, root, leaf) = setup();
        let (node, block) = resolve_path(&ls, &root, &"child".into()).unwrap();
        assert_eq!(node, ipld!({"value": 42}));
        assert_eq!(block, leaf);
    }

    #[test]
    fn composition_holds() {
        let (ls, root, _) = setup();
        let (direct, direct_block) = resolve_path(&ls, &root, &"child/value".into()).unwrap();
        let (_, mid_block) = resolve_path(&ls, &root, &"child".into()).unwrap();
        let (composed, composed_block) = resolve_path(&ls, &mid_block, &"value".into()).unwrap();
        assert_eq!(direct, composed);
        assert_eq!(direct_block, composed_block);
    }

    #[test]
    fn missing_segment_reports_resolved_prefix() {
        let (ls, root, _) = setup();
        let err = resolve_path(&ls, &root, &"child/nope".into()).unwrap_err();
        match err {
            Error::PathNotFound { resolved, segment } => {
                assert_eq!(resolved, "child");
                assert_eq!(segment, "nope");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn indexing_a_scalar_fails() {
        let (ls, root, _) = setup();
        assert!(matches!(
            resolve_path(&ls, &root, &"items/0/anything".into()),
            Err(Error::PathNotFound { .. })
        ));
    }

    #[test]
    fn empty_path_returns_root_node() {
        let (ls, root, _) = setup();
        let (node, block) = resolve_path(&ls, &root, &Path::default()).unwrap();
        assert_eq!(block, root);
        assert!(node.as_map().is_ok());
    }
}
