// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use cask_db::MemoryDb;
use cask_ipld::LinkSystem;
use cask_unixfs::{
    get_bytes, get_path, list, put_bytes, put_path, resolve_path, DirBuilder, Error, HostOptions,
    UnixfsConfig,
};
use std::sync::Arc;

fn linksystem() -> LinkSystem<MemoryDb> {
    LinkSystem::new(Arc::new(MemoryDb::default()))
}

async fn store_file(ls: &LinkSystem<MemoryDb>, data: &[u8]) -> (cask_cid::Cid, u64) {
    let cid = put_bytes(ls, data, &UnixfsConfig::default()).await.unwrap();
    (cid, data.len() as u64)
}

#[tokio::test]
async fn entry_order_does_not_change_the_cid() {
    let ls = linksystem();
    let config = UnixfsConfig::default();
    let (fa, sa) = store_file(&ls, b"alpha").await;
    let (fb, sb) = store_file(&ls, b"beta").await;

    let mut one = DirBuilder::new();
    one.add("a.txt", fa, sa).unwrap();
    one.add("b.txt", fb, sb).unwrap();
    let (cid_one, _) = one.build(&ls, &config).unwrap();

    let mut two = DirBuilder::new();
    two.add("b.txt", fb, sb).unwrap();
    two.add("a.txt", fa, sa).unwrap();
    let (cid_two, _) = two.build(&ls, &config).unwrap();

    assert_eq!(cid_one, cid_two);
}

#[tokio::test]
async fn duplicate_names_rejected() {
    let ls = linksystem();
    let (f, s) = store_file(&ls, b"x").await;
    let mut b = DirBuilder::new();
    b.add("name", f, s).unwrap();
    assert!(matches!(
        b.add("name", f, s),
        Err(Error::DuplicateName(n)) if n == "name"
    ));
}

#[tokio::test]
async fn nested_path_resolution() {
    let ls = linksystem();
    let config = UnixfsConfig::default();
    let (file, fsize) = store_file(&ls, b"file body").await;

    let mut inner = DirBuilder::new();
    inner.add("f", file, fsize).unwrap();
    let (inner_cid, inner_size) = inner.build(&ls, &config).unwrap();

    let mut outer = DirBuilder::new();
    outer.add("a", inner_cid, inner_size).unwrap();
    let (root, _) = outer.build(&ls, &config).unwrap();

    let resolved = resolve_path(&ls, &root, "a/f").unwrap();
    assert_eq!(resolved, file);
    assert_eq!(get_bytes(&ls, &resolved).await.unwrap(), b"file body");

    assert!(matches!(
        resolve_path(&ls, &root, "a/missing"),
        Err(Error::NameNotFound { name, .. }) if name == "missing"
    ));
    // Stepping through a file mid-path.
    assert!(matches!(
        resolve_path(&ls, &root, "a/f/deeper"),
        Err(Error::NotADirectory(_))
    ));

    let entries = list(&ls, &root).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, "a");
    assert_eq!(entries[0].1, inner_cid);
}

#[tokio::test]
async fn host_tree_round_trips() {
    let ls = linksystem();
    let src = tempfile::tempdir().unwrap();
    tokio::fs::write(src.path().join("top.txt"), b"top level")
        .await
        .unwrap();
    tokio::fs::create_dir(src.path().join("sub")).await.unwrap();
    tokio::fs::write(src.path().join("sub/leaf.bin"), vec![9u8; 4096])
        .await
        .unwrap();

    let root = put_path(
        &ls,
        &UnixfsConfig::default(),
        &HostOptions::default(),
        src.path(),
    )
    .await
    .unwrap();

    let dest = tempfile::tempdir().unwrap();
    let out = dest.path().join("copy");
    get_path(&ls, &root, &out).await.unwrap();

    assert_eq!(
        tokio::fs::read(out.join("top.txt")).await.unwrap(),
        b"top level"
    );
    assert_eq!(
        tokio::fs::read(out.join("sub/leaf.bin")).await.unwrap(),
        vec![9u8; 4096]
    );
}

#[tokio::test]
async fn adaptive_chunking_follows_file_size() {
    use cask_unixfs::adaptive_chunk_size;

    let ls = linksystem();
    let src = tempfile::tempdir().unwrap();
    let data: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
    tokio::fs::write(src.path().join("data.bin"), &data)
        .await
        .unwrap();

    // A tiny requested chunk size gets lifted to the 32 KiB floor.
    let config = UnixfsConfig {
        chunk_size: 1024,
        ..UnixfsConfig::default()
    };
    let root = put_path(
        &ls,
        &config,
        &HostOptions {
            adaptive_chunking: true,
            ..HostOptions::default()
        },
        src.path().join("data.bin"),
    )
    .await
    .unwrap();

    let effective = adaptive_chunk_size(data.len() as u64, config.chunk_size);
    assert_eq!(effective, 32 * 1024);
    let expected = put_bytes(
        &ls,
        &data,
        &UnixfsConfig {
            chunk_size: effective,
            ..UnixfsConfig::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(root, expected);

    // Without the flag the requested size is used as given.
    let verbatim = put_path(
        &ls,
        &config,
        &HostOptions::default(),
        src.path().join("data.bin"),
    )
    .await
    .unwrap();
    assert_ne!(verbatim, expected);
    assert_eq!(get_bytes(&ls, &verbatim).await.unwrap(), data);
}

#[cfg(unix)]
#[tokio::test]
async fn symlinks_rejected_by_default() {
    let ls = linksystem();
    let src = tempfile::tempdir().unwrap();
    tokio::fs::write(src.path().join("real.txt"), b"real")
        .await
        .unwrap();
    std::os::unix::fs::symlink(src.path().join("real.txt"), src.path().join("link.txt")).unwrap();

    let err = put_path(
        &ls,
        &UnixfsConfig::default(),
        &HostOptions::default(),
        src.path(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::Symlink(_)));

    // Following resolves the link like its target.
    let root = put_path(
        &ls,
        &UnixfsConfig::default(),
        &HostOptions {
            follow_symlinks: true,
            ..HostOptions::default()
        },
        src.path(),
    )
    .await
    .unwrap();
    let linked = resolve_path(&ls, &root, "link.txt").unwrap();
    assert_eq!(get_bytes(&ls, &linked).await.unwrap(), b"real");
}
