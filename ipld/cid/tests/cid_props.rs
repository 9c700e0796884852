// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use cask_cid::{content_equivalent, new_from_prefix, parse, Code, Prefix, Version, DAG_CBOR, RAW};
use quickcheck_macros::quickcheck;

#[quickcheck]
fn compute_is_deterministic(data: Vec<u8>) -> bool {
    let prefix = Prefix::default();
    new_from_prefix(&prefix, &data).unwrap() == new_from_prefix(&prefix, &data).unwrap()
}

#[quickcheck]
fn string_form_round_trips(data: Vec<u8>) -> bool {
    let prefix = Prefix::new(Version::V1, DAG_CBOR, Code::Sha2_256.into(), None).unwrap();
    let cid = new_from_prefix(&prefix, &data).unwrap();
    parse(&cid.to_string()).unwrap() == cid
}

#[quickcheck]
fn codec_never_affects_multihash(data: Vec<u8>) -> bool {
    let raw = Prefix::new(Version::V1, RAW, Code::Sha2_256.into(), None).unwrap();
    let cbor = Prefix::new(Version::V1, DAG_CBOR, Code::Sha2_256.into(), None).unwrap();
    content_equivalent(
        &new_from_prefix(&raw, &data).unwrap(),
        &new_from_prefix(&cbor, &data).unwrap(),
    )
}

#[quickcheck]
fn distinct_hash_codes_yield_distinct_cids(data: Vec<u8>) -> bool {
    let sha = Prefix::new(Version::V1, RAW, Code::Sha2_256.into(), None).unwrap();
    let blake = Prefix::new(Version::V1, RAW, Code::Blake3_256.into(), None).unwrap();
    new_from_prefix(&sha, &data).unwrap() != new_from_prefix(&blake, &data).unwrap()
}
