// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod builder;
mod de;
mod error;
mod hashset;
mod linksystem;
mod path;
mod path_segment;
mod resolve;
mod ser;

pub mod codec;
pub mod selector;

#[macro_use]
mod macros;

pub use self::builder::{ListBuilder, MapBuilder};
pub use self::error::Error;
pub use self::hashset::CidHashSet;
pub use self::linksystem::LinkSystem;
pub use self::path::Path;
pub use self::path_segment::PathSegment;
pub use self::resolve::resolve_path;

use cask_cid::Cid;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;

/// The kind of an [`Ipld`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Null,
    Bool,
    Integer,
    Float,
    String,
    Bytes,
    List,
    Map,
    Link,
}

impl Kind {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Integer => "integer",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Bytes => "bytes",
            Kind::List => "list",
            Kind::Map => "map",
            Kind::Link => "link",
        }
    }
}

/// A value in the IPLD data model.
///
/// Nodes are ephemeral materializations of blocks: a codec turns bytes into
/// an `Ipld` tree and back, and a `Link` carries the CID of another node's
/// block. Integers are signed 64-bit; map keys are unique UTF-8 strings.
#[derive(Debug, Clone, PartialEq)]
pub enum Ipld {
    /// Represents a null value.
    Null,
    /// Represents a boolean value.
    Bool(bool),
    /// Represents a signed 64-bit integer.
    Integer(i64),
    /// Represents an IEEE-754 double. NaN and infinities are representable
    /// in memory but rejected by the dag-cbor and dag-json encoders.
    Float(f64),
    /// Represents a UTF-8 string.
    String(String),
    /// Represents a byte sequence.
    Bytes(Vec<u8>),
    /// Represents a list of IPLD nodes.
    List(Vec<Ipld>),
    /// Represents a map of strings to IPLD nodes. Key order is the map's
    /// natural (lexicographic) order; codecs define the wire order.
    Map(BTreeMap<String, Ipld>),
    /// Represents a link to another node through a content identifier.
    Link(Cid),
}

impl Ipld {
    pub fn kind(&self) -> Kind {
        match self {
            Ipld::Null => Kind::Null,
            Ipld::Bool(_) => Kind::Bool,
            Ipld::Integer(_) => Kind::Integer,
            Ipld::Float(_) => Kind::Float,
            Ipld::String(_) => Kind::String,
            Ipld::Bytes(_) => Kind::Bytes,
            Ipld::List(_) => Kind::List,
            Ipld::Map(_) => Kind::Map,
            Ipld::Link(_) => Kind::Link,
        }
    }

    fn wrong_kind(&self, expected: &'static str) -> Error {
        Error::WrongKind {
            expected,
            found: self.kind().name(),
        }
    }

    pub fn as_bool(&self) -> Result<bool, Error> {
        match self {
            Ipld::Bool(b) => Ok(*b),
            other => Err(other.wrong_kind("bool")),
        }
    }

    pub fn as_int(&self) -> Result<i64, Error> {
        match self {
            Ipld::Integer(i) => Ok(*i),
            other => Err(other.wrong_kind("integer")),
        }
    }

    pub fn as_float(&self) -> Result<f64, Error> {
        match self {
            Ipld::Float(f) => Ok(*f),
            other => Err(other.wrong_kind("float")),
        }
    }

    pub fn as_string(&self) -> Result<&str, Error> {
        match self {
            Ipld::String(s) => Ok(s),
            other => Err(other.wrong_kind("string")),
        }
    }

    pub fn as_bytes(&self) -> Result<&[u8], Error> {
        match self {
            Ipld::Bytes(b) => Ok(b),
            other => Err(other.wrong_kind("bytes")),
        }
    }

    pub fn as_link(&self) -> Result<Cid, Error> {
        match self {
            Ipld::Link(cid) => Ok(*cid),
            other => Err(other.wrong_kind("link")),
        }
    }

    pub fn as_list(&self) -> Result<&[Ipld], Error> {
        match self {
            Ipld::List(l) => Ok(l),
            other => Err(other.wrong_kind("list")),
        }
    }

    pub fn as_map(&self) -> Result<&BTreeMap<String, Ipld>, Error> {
        match self {
            Ipld::Map(m) => Ok(m),
            other => Err(other.wrong_kind("map")),
        }
    }

    /// Number of entries for lists and maps, `None` for scalars.
    pub fn len(&self) -> Option<usize> {
        match self {
            Ipld::List(l) => Some(l.len()),
            Ipld::Map(m) => Some(m.len()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> Option<bool> {
        self.len().map(|l| l == 0)
    }

    pub fn lookup_by_string(&self, key: &str) -> Result<&Ipld, Error> {
        let map = self.as_map()?;
        map.get(key).ok_or_else(|| Error::PathNotFound {
            resolved: String::new(),
            segment: key.to_owned(),
        })
    }

    pub fn lookup_by_index(&self, index: usize) -> Result<&Ipld, Error> {
        let list = self.as_list()?;
        list.get(index).ok_or_else(|| Error::PathNotFound {
            resolved: String::new(),
            segment: index.to_string(),
        })
    }

    /// Index a node by a path segment, returning `None` when the segment
    /// does not address a child.
    pub fn lookup_segment(&self, segment: &PathSegment) -> Option<&Ipld> {
        match self {
            Ipld::Map(map) => match segment {
                PathSegment::String(s) => map.get(s),
                PathSegment::Int(i) => map.get(&i.to_string()),
            },
            Ipld::List(list) => list.get(segment.to_index()?),
            _ => None,
        }
    }

    /// Iterate over all links directly held by this node, in codec order.
    pub fn links(&self) -> Vec<Cid> {
        let mut out = Vec::new();
        self.collect_links(&mut out);
        out
    }

    fn collect_links(&self, out: &mut Vec<Cid>) {
        match self {
            Ipld::Link(cid) => out.push(*cid),
            Ipld::List(list) => {
                for v in list {
                    v.collect_links(out);
                }
            }
            Ipld::Map(map) => {
                for v in map.values() {
                    v.collect_links(out);
                }
            }
            _ => {}
        }
    }
}

/// Convert any serializable value into an IPLD node.
///
/// The mapping is deterministic: serde data-model values map one-to-one
/// onto node kinds, and `Cid` fields become links. Values outside the data
/// model (for example u64 above `i64::MAX`) fail `UnsupportedType`.
pub fn to_ipld<T>(value: T) -> Result<Ipld, Error>
where
    T: Serialize,
{
    // Round-trips through the canonical codec; deterministic by
    // construction and keeps the link tagging in one place.
    let buf = serde_ipld_dagcbor::to_vec(&value).map_err(|e| Error::UnsupportedType(e.to_string()))?;
    serde_ipld_dagcbor::from_slice(&buf).map_err(|e| Error::UnsupportedType(e.to_string()))
}

/// Convert an IPLD node back into a typed value.
pub fn from_ipld<T>(value: &Ipld) -> Result<T, Error>
where
    T: DeserializeOwned,
{
    let buf = serde_ipld_dagcbor::to_vec(value).map_err(|e| Error::Encoding(e.to_string()))?;
    serde_ipld_dagcbor::from_slice(&buf).map_err(|e| Error::Decoding(e.to_string()))
}
