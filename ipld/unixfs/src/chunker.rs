// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;
const GIB: u64 = 1024 * 1024 * 1024;

/// Splits a byte stream into fixed-size chunks. Every chunk is exactly
/// `chunk_size` bytes except the last, which carries the remainder. An
/// empty stream yields no chunks at all.
pub struct Chunker<R> {
    reader: R,
    chunk_size: usize,
    done: bool,
}

impl<R: AsyncRead + Unpin> Chunker<R> {
    pub fn new(reader: R, chunk_size: usize) -> Self {
        debug_assert!(chunk_size > 0);
        Self {
            reader,
            chunk_size,
            done: false,
        }
    }

    pub async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, Error> {
        if self.done {
            return Ok(None);
        }
        let mut buf = vec![0u8; self.chunk_size];
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.reader.read(&mut buf[filled..]).await?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        if filled < buf.len() {
            self.done = true;
        }
        if filled == 0 {
            return Ok(None);
        }
        buf.truncate(filled);
        Ok(Some(buf))
    }
}

/// Pick an effective chunk size for a file of known size: tiny files chunk
/// finer (but never below 32 KiB), huge files chunk coarser so the DAG
/// stays shallow.
pub fn adaptive_chunk_size(file_size: u64, requested: usize) -> usize {
    let requested = requested as u64;
    let chosen = if file_size <= MIB {
        (32 * KIB).max(requested.min(file_size.max(1)))
    } else if file_size <= 64 * MIB {
        requested
    } else if file_size <= GIB {
        requested.max(MIB)
    } else {
        4 * MIB
    };
    chosen as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn exact_multiple_has_no_tail() {
        let data = vec![7u8; 64];
        let mut chunker = Chunker::new(data.as_slice(), 32);
        assert_eq!(chunker.next_chunk().await.unwrap().unwrap().len(), 32);
        assert_eq!(chunker.next_chunk().await.unwrap().unwrap().len(), 32);
        assert!(chunker.next_chunk().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn remainder_goes_last() {
        let data: Vec<u8> = (0..70u8).collect();
        let mut chunker = Chunker::new(data.as_slice(), 32);
        let a = chunker.next_chunk().await.unwrap().unwrap();
        let b = chunker.next_chunk().await.unwrap().unwrap();
        let c = chunker.next_chunk().await.unwrap().unwrap();
        assert_eq!((a.len(), b.len(), c.len()), (32, 32, 6));
        assert_eq!([a, b, c].concat(), data);
        assert!(chunker.next_chunk().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_stream_yields_nothing() {
        let mut chunker = Chunker::new(&[][..], 32);
        assert!(chunker.next_chunk().await.unwrap().is_none());
    }

    #[test]
    fn adaptive_sizing() {
        let s = 256 * 1024;
        assert_eq!(adaptive_chunk_size(10 * 1024, s), 32 * 1024);
        assert_eq!(adaptive_chunk_size(1024 * 1024, s), s);
        assert_eq!(adaptive_chunk_size(32 * 1024 * 1024, s), s);
        assert_eq!(adaptive_chunk_size(512 * 1024 * 1024, s), 1024 * 1024);
        assert_eq!(adaptive_chunk_size(8u64 * 1024 * 1024 * 1024, s), 4 * 1024 * 1024);
    }
}
