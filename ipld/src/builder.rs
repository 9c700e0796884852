// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::{Error, Ipld};
use std::collections::BTreeMap;

/// Builds a map node. Builders are single-use: `finish` consumes the
/// builder, so reuse after finishing is ruled out at compile time.
#[derive(Debug, Default)]
pub struct MapBuilder {
    entries: BTreeMap<String, Ipld>,
}

impl MapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry. Map keys are unique; inserting a key twice fails
    /// `DuplicateKey` and leaves the first value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Ipld>) -> Result<&mut Self, Error> {
        let key = key.into();
        if self.entries.contains_key(&key) {
            return Err(Error::DuplicateKey(key));
        }
        self.entries.insert(key, value.into());
        Ok(self)
    }

    pub fn finish(self) -> Ipld {
        Ipld::Map(self.entries)
    }
}

/// Builds a list node; single-use like [`MapBuilder`].
#[derive(Default)]
pub struct ListBuilder {
    items: Vec<Ipld>,
}

impl ListBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: impl Into<Ipld>) -> &mut Self {
        self.items.push(value.into());
        self
    }

    pub fn finish(self) -> Ipld {
        Ipld::List(self.items)
    }
}
