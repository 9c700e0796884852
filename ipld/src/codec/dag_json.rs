// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::Codec;
use crate::{Error, Ipld};
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine as _;
use cask_cid::DAG_JSON;
use serde_json::{Map as JsonMap, Number, Value};
use std::collections::BTreeMap;

/// JSON with tagged extensions for the two kinds JSON lacks:
/// links encode as `{"/": "<cid>"}` and bytes as
/// `{"/": {"bytes": "<base64>"}}` (standard alphabet, no padding).
///
/// The `/` key is reserved; encoding a map that uses it fails rather than
/// producing bytes that would decode to a different node.
pub struct DagJsonCodec;

fn to_json(node: &Ipld) -> Result<Value, Error> {
    Ok(match node {
        Ipld::Null => Value::Null,
        Ipld::Bool(b) => Value::Bool(*b),
        Ipld::Integer(i) => Value::Number((*i).into()),
        Ipld::Float(f) => Value::Number(Number::from_f64(*f).ok_or_else(|| {
            Error::UnsupportedValue(format!("dag-json cannot encode non-finite float {f}"))
        })?),
        Ipld::String(s) => Value::String(s.clone()),
        Ipld::Bytes(b) => {
            let mut inner = JsonMap::new();
            inner.insert("bytes".to_owned(), Value::String(STANDARD_NO_PAD.encode(b)));
            let mut outer = JsonMap::new();
            outer.insert("/".to_owned(), Value::Object(inner));
            Value::Object(outer)
        }
        Ipld::Link(cid) => {
            let mut outer = JsonMap::new();
            outer.insert("/".to_owned(), Value::String(cid.to_string()));
            Value::Object(outer)
        }
        Ipld::List(list) => Value::Array(list.iter().map(to_json).collect::<Result<_, _>>()?),
        Ipld::Map(map) => {
            let mut obj = JsonMap::new();
            for (k, v) in map {
                if k == "/" {
                    return Err(Error::UnsupportedValue(
                        "dag-json reserves the \"/\" map key".to_owned(),
                    ));
                }
                obj.insert(k.clone(), to_json(v)?);
            }
            Value::Object(obj)
        }
    })
}

fn from_json(value: Value) -> Result<Ipld, Error> {
    Ok(match value {
        Value::Null => Ipld::Null,
        Value::Bool(b) => Ipld::Bool(b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ipld::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Ipld::Float(f)
            } else {
                return Err(Error::Decoding(format!("number out of range: {n}")));
            }
        }
        Value::String(s) => Ipld::String(s),
        Value::Array(arr) => Ipld::List(arr.into_iter().map(from_json).collect::<Result<_, _>>()?),
        Value::Object(obj) => {
            if obj.len() == 1 && obj.contains_key("/") {
                return decode_tagged(obj);
            }
            let mut map = BTreeMap::new();
            for (k, v) in obj {
                if k == "/" {
                    return Err(Error::Decoding(
                        "\"/\" key mixed with other map entries".to_owned(),
                    ));
                }
                map.insert(k, from_json(v)?);
            }
            Ipld::Map(map)
        }
    })
}

fn decode_tagged(mut obj: JsonMap<String, Value>) -> Result<Ipld, Error> {
    let Some(tagged) = obj.remove("/") else {
        return Err(Error::Decoding("malformed \"/\" tag".to_owned()));
    };
    match tagged {
        Value::String(s) => {
            let cid = cask_cid::parse(&s).map_err(|e| Error::Decoding(format!("bad link: {e}")))?;
            Ok(Ipld::Link(cid))
        }
        Value::Object(inner) => {
            if inner.len() != 1 {
                return Err(Error::Decoding("malformed bytes tag".to_owned()));
            }
            match inner.get("bytes") {
                Some(Value::String(b64)) => {
                    let bytes = STANDARD_NO_PAD
                        .decode(b64)
                        .map_err(|e| Error::Decoding(format!("bad base64: {e}")))?;
                    Ok(Ipld::Bytes(bytes))
                }
                _ => Err(Error::Decoding("malformed bytes tag".to_owned())),
            }
        }
        _ => Err(Error::Decoding("malformed \"/\" tag".to_owned())),
    }
}

impl Codec for DagJsonCodec {
    fn code(&self) -> u64 {
        DAG_JSON
    }

    fn name(&self) -> &'static str {
        "dag-json"
    }

    fn encode(&self, node: &Ipld) -> Result<Vec<u8>, Error> {
        let value = to_json(node)?;
        serde_json::to_vec(&value).map_err(|e| Error::Encoding(e.to_string()))
    }

    fn decode(&self, data: &[u8]) -> Result<Ipld, Error> {
        let value: Value =
            serde_json::from_slice(data).map_err(|e| Error::Decoding(e.to_string()))?;
        from_json(value)
    }
}
