// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Store contract exercised against every backend.

use cask_db::{BatchOp, Db, DbConfig, Store};

fn contract(db: &impl Store) {
    // Absent key behavior
    assert_eq!(db.read(b"missing").unwrap(), None);
    assert!(!db.exists(b"missing").unwrap());
    assert_eq!(db.size(b"missing").unwrap(), None);
    db.delete(b"missing").unwrap();

    // Write / read / overwrite
    db.write(b"k1", b"hello").unwrap();
    assert_eq!(db.read(b"k1").unwrap(), Some(b"hello".to_vec()));
    assert_eq!(db.size(b"k1").unwrap(), Some(5));
    db.write(b"k1", b"hello world").unwrap();
    assert_eq!(db.size(b"k1").unwrap(), Some(11));

    // Empty values are legal
    db.write(b"empty", b"").unwrap();
    assert_eq!(db.read(b"empty").unwrap(), Some(vec![]));
    assert_eq!(db.size(b"empty").unwrap(), Some(0));

    // Batch commit
    db.commit(vec![
        BatchOp::put(&b"k2"[..], &b"a"[..]),
        BatchOp::put(&b"k3"[..], &b"b"[..]),
        BatchOp::delete(&b"k1"[..]),
    ])
    .unwrap();
    assert!(!db.exists(b"k1").unwrap());
    assert!(db.exists(b"k2").unwrap());
    assert!(db.exists(b"k3").unwrap());

    // Key iteration sees all live keys
    let mut keys: Vec<Vec<u8>> = db
        .iter_keys()
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    keys.sort();
    assert_eq!(
        keys,
        vec![b"empty".to_vec(), b"k2".to_vec(), b"k3".to_vec()]
    );
}

#[test]
fn memory_store_contract() {
    let db = Db::open(&DbConfig::Memory).unwrap();
    contract(&db);
}

#[test]
fn file_store_contract() {
    let dir = tempfile::tempdir().unwrap();
    let db = Db::open(&DbConfig::File {
        path: dir.path().to_path_buf(),
    })
    .unwrap();
    contract(&db);
}

#[test]
fn parity_store_contract() {
    let dir = tempfile::tempdir().unwrap();
    let db = Db::open(&DbConfig::Parity {
        path: dir.path().to_path_buf(),
    })
    .unwrap();
    contract(&db);
}
