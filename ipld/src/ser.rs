// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::Ipld;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

impl Serialize for Ipld {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Ipld::Null => serializer.serialize_none(),
            Ipld::Bool(b) => serializer.serialize_bool(*b),
            Ipld::Integer(i) => serializer.serialize_i64(*i),
            Ipld::Float(f) => serializer.serialize_f64(*f),
            Ipld::String(s) => serializer.serialize_str(s),
            Ipld::Bytes(b) => serializer.serialize_bytes(b),
            Ipld::List(list) => serializer.collect_seq(list),
            Ipld::Map(map) => {
                let mut m = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    m.serialize_entry(k, v)?;
                }
                m.end()
            }
            // The cid crate's serde impl uses a private newtype marker that
            // codec serializers recognize and turn into a tagged link.
            Ipld::Link(cid) => cid.serialize(serializer),
        }
    }
}
