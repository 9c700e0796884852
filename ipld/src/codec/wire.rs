// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Minimal protobuf wire primitives shared by the dag-pb codec and the
//! file-DAG metadata message: varints and length-delimited fields.

use crate::Error;
use integer_encoding::VarInt;

pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn done(&self) -> bool {
        self.pos >= self.buf.len()
    }

    pub fn varint(&mut self) -> Result<u64, Error> {
        let (v, read) = u64::decode_var(&self.buf[self.pos..])
            .ok_or_else(|| Error::Decoding("truncated varint".to_owned()))?;
        self.pos += read;
        Ok(v)
    }

    /// A length-prefixed byte field.
    pub fn bytes(&mut self) -> Result<&'a [u8], Error> {
        let len = self.varint()? as usize;
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.buf.len())
            .ok_or_else(|| Error::Decoding("length prefix past end of input".to_owned()))?;
        let out = &self.buf[self.pos..end];
        self.pos = end;
        Ok(out)
    }
}

pub fn write_varint(out: &mut Vec<u8>, value: u64) {
    out.extend_from_slice(&value.encode_var_vec());
}

/// A tagged length-delimited field.
pub fn write_field(out: &mut Vec<u8>, tag: u64, payload: &[u8]) {
    write_varint(out, tag);
    write_varint(out, payload.len() as u64);
    out.extend_from_slice(payload);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_round_trip() {
        let mut buf = Vec::new();
        write_field(&mut buf, (1 << 3) | 2, b"payload");
        write_varint(&mut buf, 3 << 3);
        write_varint(&mut buf, 300);

        let mut r = Reader::new(&buf);
        assert_eq!(r.varint().unwrap(), (1 << 3) | 2);
        assert_eq!(r.bytes().unwrap(), b"payload");
        assert_eq!(r.varint().unwrap(), 3 << 3);
        assert_eq!(r.varint().unwrap(), 300);
        assert!(r.done());
    }

    #[test]
    fn truncated_length_fails() {
        let mut buf = Vec::new();
        write_varint(&mut buf, 100);
        let mut r = Reader::new(&buf);
        assert!(r.bytes().is_err());
    }
}
