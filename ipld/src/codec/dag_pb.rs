// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! The legacy Merkle-DAG protobuf codec.
//!
//! The schema is fixed, so the wire handling is hand-rolled rather than
//! generated: a node is an optional `Data` bytes field plus a list of
//! links, each carrying a CID, an optional name and an optional size.
//! Canonical encoding writes the links before the data field.
//!
//! [`PbNode`] and [`PbLink`] are exposed for file-DAG code that works with
//! the schema directly instead of through the data-model view.

use super::wire::{self, Reader};
use super::Codec;
use crate::{Error, Ipld};
use cask_cid::{Cid, DAG_PB};
use std::collections::BTreeMap;

// Field tags: (field number << 3) | wire type.
const NODE_DATA_TAG: u64 = (1 << 3) | 2;
const NODE_LINKS_TAG: u64 = (2 << 3) | 2;
const LINK_HASH_TAG: u64 = (1 << 3) | 2;
const LINK_NAME_TAG: u64 = (2 << 3) | 2;
const LINK_TSIZE_TAG: u64 = 3 << 3; // wire type 0, varint

/// A link entry in a dag-pb node.
#[derive(Debug, Clone, PartialEq)]
pub struct PbLink {
    pub cid: Cid,
    pub name: Option<String>,
    pub tsize: Option<u64>,
}

/// A dag-pb node in schema form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PbNode {
    pub links: Vec<PbLink>,
    pub data: Option<Vec<u8>>,
}

impl PbLink {
    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        wire::write_field(&mut out, LINK_HASH_TAG, &self.cid.to_bytes());
        if let Some(name) = &self.name {
            wire::write_field(&mut out, LINK_NAME_TAG, name.as_bytes());
        }
        if let Some(tsize) = self.tsize {
            wire::write_varint(&mut out, LINK_TSIZE_TAG);
            wire::write_varint(&mut out, tsize);
        }
        out
    }

    fn from_bytes(buf: &[u8]) -> Result<Self, Error> {
        let mut r = Reader::new(buf);
        let mut cid = None;
        let mut name = None;
        let mut tsize = None;
        while !r.done() {
            match r.varint()? {
                LINK_HASH_TAG => {
                    let bz = r.bytes()?;
                    cid = Some(
                        Cid::try_from(bz).map_err(|e| Error::Decoding(format!("bad link CID: {e}")))?,
                    );
                }
                LINK_NAME_TAG => {
                    let bz = r.bytes()?;
                    name = Some(
                        std::str::from_utf8(bz)
                            .map_err(|_| Error::Decoding("link name is not UTF-8".to_owned()))?
                            .to_owned(),
                    );
                }
                LINK_TSIZE_TAG => tsize = Some(r.varint()?),
                tag => return Err(Error::Decoding(format!("unexpected link field tag {tag}"))),
            }
        }
        let cid = cid.ok_or_else(|| Error::Decoding("link missing Hash field".to_owned()))?;
        Ok(Self { cid, name, tsize })
    }
}

impl PbNode {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for link in &self.links {
            wire::write_field(&mut out, NODE_LINKS_TAG, &link.to_bytes());
        }
        if let Some(data) = &self.data {
            wire::write_field(&mut out, NODE_DATA_TAG, data);
        }
        out
    }

    pub fn from_bytes(buf: &[u8]) -> Result<Self, Error> {
        let mut r = Reader::new(buf);
        let mut node = PbNode::default();
        while !r.done() {
            match r.varint()? {
                NODE_LINKS_TAG => node.links.push(PbLink::from_bytes(r.bytes()?)?),
                NODE_DATA_TAG => {
                    if node.data.is_some() {
                        return Err(Error::Decoding("duplicate Data field".to_owned()));
                    }
                    node.data = Some(r.bytes()?.to_vec());
                }
                tag => return Err(Error::Decoding(format!("unexpected node field tag {tag}"))),
            }
        }
        Ok(node)
    }

    /// The fixed data-model view: `{"Data": bytes?, "Links": [{"Hash",
    /// "Name"?, "Tsize"?}]}`.
    pub fn to_ipld(&self) -> Ipld {
        let links = self
            .links
            .iter()
            .map(|l| {
                let mut entry = BTreeMap::new();
                entry.insert("Hash".to_owned(), Ipld::Link(l.cid));
                if let Some(name) = &l.name {
                    entry.insert("Name".to_owned(), Ipld::String(name.clone()));
                }
                if let Some(tsize) = l.tsize {
                    entry.insert("Tsize".to_owned(), Ipld::Integer(tsize as i64));
                }
                Ipld::Map(entry)
            })
            .collect();
        let mut map = BTreeMap::new();
        map.insert("Links".to_owned(), Ipld::List(links));
        if let Some(data) = &self.data {
            map.insert("Data".to_owned(), Ipld::Bytes(data.clone()));
        }
        Ipld::Map(map)
    }

    pub fn from_ipld(node: &Ipld) -> Result<Self, Error> {
        let map = node.as_map().map_err(|_| {
            Error::UnsupportedValue("dag-pb encodes only the node map shape".to_owned())
        })?;
        for key in map.keys() {
            if key != "Data" && key != "Links" {
                return Err(Error::UnsupportedValue(format!(
                    "unexpected key {key:?} in dag-pb node"
                )));
            }
        }
        let data = match map.get("Data") {
            Some(Ipld::Bytes(b)) => Some(b.clone()),
            Some(other) => {
                return Err(Error::UnsupportedValue(format!(
                    "Data must be bytes, got {}",
                    other.kind().name()
                )))
            }
            None => None,
        };
        let mut links = Vec::new();
        if let Some(raw_links) = map.get("Links") {
            for entry in raw_links.as_list().map_err(|_| {
                Error::UnsupportedValue("Links must be a list".to_owned())
            })? {
                links.push(link_from_ipld(entry)?);
            }
        }
        Ok(Self { links, data })
    }
}

fn link_from_ipld(entry: &Ipld) -> Result<PbLink, Error> {
    let map = entry
        .as_map()
        .map_err(|_| Error::UnsupportedValue("link entry must be a map".to_owned()))?;
    for key in map.keys() {
        if key != "Hash" && key != "Name" && key != "Tsize" {
            return Err(Error::UnsupportedValue(format!(
                "unexpected key {key:?} in dag-pb link"
            )));
        }
    }
    let cid = match map.get("Hash") {
        Some(Ipld::Link(cid)) => *cid,
        _ => return Err(Error::UnsupportedValue("link entry missing Hash".to_owned())),
    };
    let name = match map.get("Name") {
        Some(Ipld::String(s)) => Some(s.clone()),
        Some(_) => return Err(Error::UnsupportedValue("Name must be a string".to_owned())),
        None => None,
    };
    let tsize = match map.get("Tsize") {
        Some(Ipld::Integer(i)) if *i >= 0 => Some(*i as u64),
        Some(_) => return Err(Error::UnsupportedValue("Tsize must be a non-negative integer".to_owned())),
        None => None,
    };
    Ok(PbLink { cid, name, tsize })
}

pub struct DagPbCodec;

impl Codec for DagPbCodec {
    fn code(&self) -> u64 {
        DAG_PB
    }

    fn name(&self) -> &'static str {
        "dag-pb"
    }

    fn encode(&self, node: &Ipld) -> Result<Vec<u8>, Error> {
        Ok(PbNode::from_ipld(node)?.to_bytes())
    }

    fn decode(&self, data: &[u8]) -> Result<Ipld, Error> {
        Ok(PbNode::from_bytes(data)?.to_ipld())
    }
}
