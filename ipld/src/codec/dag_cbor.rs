// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::Codec;
use crate::{Error, Ipld};
use cask_cid::DAG_CBOR;

/// Canonical CBOR: definite lengths, map keys sorted, links as tag 42.
///
/// The serializer underneath already emits the canonical form; this type
/// adds the data-model checks the wire format cannot express, rejecting
/// NaN and infinite floats before they reach the encoder.
pub struct DagCborCodec;

fn check_floats(node: &Ipld) -> Result<(), Error> {
    match node {
        Ipld::Float(f) if !f.is_finite() => Err(Error::UnsupportedValue(format!(
            "dag-cbor cannot encode non-finite float {f}"
        ))),
        Ipld::List(list) => list.iter().try_for_each(check_floats),
        Ipld::Map(map) => map.values().try_for_each(check_floats),
        _ => Ok(()),
    }
}

impl Codec for DagCborCodec {
    fn code(&self) -> u64 {
        DAG_CBOR
    }

    fn name(&self) -> &'static str {
        "dag-cbor"
    }

    fn encode(&self, node: &Ipld) -> Result<Vec<u8>, Error> {
        check_floats(node)?;
        serde_ipld_dagcbor::to_vec(node).map_err(|e| Error::Encoding(e.to_string()))
    }

    fn decode(&self, data: &[u8]) -> Result<Ipld, Error> {
        serde_ipld_dagcbor::from_slice(data).map_err(|e| Error::Decoding(e.to_string()))
    }
}
