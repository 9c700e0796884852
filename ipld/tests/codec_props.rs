// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use cask_cid::{new_from_cbor, Code};
use cask_ipld::codec::{Codec, DagCborCodec, DagJsonCodec};
use cask_ipld::Ipld;
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use std::collections::BTreeMap;

/// Node generator bounded in depth and width, staying inside what every
/// codec can represent: finite floats, alphanumeric map keys.
#[derive(Debug, Clone)]
struct ArbNode(Ipld);

fn arb_key(g: &mut Gen) -> String {
    let len = usize::arbitrary(g) % 8 + 1;
    (0..len)
        .map(|_| *g.choose(b"abcdefghijklmnopqrstuvwxyz0123456789").unwrap() as char)
        .collect()
}

fn arb_ipld(g: &mut Gen, depth: usize) -> Ipld {
    let max = if depth == 0 { 7 } else { 9 };
    match u8::arbitrary(g) % max {
        0 => Ipld::Null,
        1 => Ipld::Bool(bool::arbitrary(g)),
        2 => Ipld::Integer(i64::arbitrary(g)),
        3 => {
            let mut f = f64::arbitrary(g);
            if !f.is_finite() {
                f = 0.5;
            }
            Ipld::Float(f)
        }
        4 => Ipld::String(arb_key(g)),
        5 => Ipld::Bytes(Vec::<u8>::arbitrary(g)),
        6 => Ipld::Link(new_from_cbor(&Vec::<u8>::arbitrary(g), Code::Sha2_256)),
        7 => {
            let len = usize::arbitrary(g) % 4;
            Ipld::List((0..len).map(|_| arb_ipld(g, depth - 1)).collect())
        }
        _ => {
            let len = usize::arbitrary(g) % 4;
            let mut map = BTreeMap::new();
            for _ in 0..len {
                map.insert(arb_key(g), arb_ipld(g, depth - 1));
            }
            Ipld::Map(map)
        }
    }
}

impl Arbitrary for ArbNode {
    fn arbitrary(g: &mut Gen) -> Self {
        ArbNode(arb_ipld(g, 3))
    }
}

#[quickcheck]
fn dag_cbor_round_trip(node: ArbNode) -> bool {
    let codec = DagCborCodec;
    let bytes = codec.encode(&node.0).unwrap();
    codec.decode(&bytes).unwrap() == node.0
}

#[quickcheck]
fn dag_json_round_trip(node: ArbNode) -> bool {
    let codec = DagJsonCodec;
    let bytes = codec.encode(&node.0).unwrap();
    codec.decode(&bytes).unwrap() == node.0
}

#[quickcheck]
fn dag_cbor_deterministic(node: ArbNode) -> bool {
    let codec = DagCborCodec;
    codec.encode(&node.0).unwrap() == codec.encode(&node.0).unwrap()
}
