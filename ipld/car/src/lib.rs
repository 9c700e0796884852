// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! CAR v1: a varint-framed archive of a dag-cbor header followed by
//! `cid || body` block records. Reading verifies every record against its
//! own CID; writing is append-only behind an explicit lifecycle.

mod error;
mod export;
mod util;

pub use error::Error;
pub use export::export;

use cask_blockstore::{Block, BlockStore};
use cask_cid::Cid;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use util::{ld_read, ld_write, read_node};

/// CAR file header.
#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CarHeader {
    pub roots: Vec<Cid>,
    pub version: u64,
}

impl CarHeader {
    pub fn new(roots: Vec<Cid>, version: u64) -> Self {
        Self { roots, version }
    }
}

impl From<Vec<Cid>> for CarHeader {
    fn from(roots: Vec<Cid>) -> Self {
        Self { roots, version: 1 }
    }
}

/// Reads and verifies a CAR stream.
pub struct CarReader<R> {
    reader: R,
    pub header: CarHeader,
}

impl<R> CarReader<R>
where
    R: AsyncRead + Send + Unpin,
{
    /// Parse the header. Only version 1 archives with at least one root
    /// are accepted.
    pub async fn new(mut reader: R) -> Result<Self, Error> {
        let buf = ld_read(&mut reader)
            .await?
            .ok_or_else(|| Error::InvalidFile("missing header".to_owned()))?;
        let header: CarHeader =
            serde_ipld_dagcbor::from_slice(&buf).map_err(|e| Error::Cbor(e.to_string()))?;
        if header.roots.is_empty() {
            return Err(Error::InvalidFile("no roots".to_owned()));
        }
        if header.version != 1 {
            return Err(Error::InvalidFile(format!(
                "version must be 1, got {}",
                header.version
            )));
        }
        Ok(CarReader { reader, header })
    }

    /// The next block record, re-deriving the multihash from the body so a
    /// corrupted record cannot slip through.
    pub async fn next_block(&mut self) -> Result<Option<Block>, Error> {
        match read_node(&mut self.reader).await? {
            Some((cid, data)) => {
                let block = Block::from_parts(cid, data)
                    .map_err(|e| Error::Corrupt(format!("record does not match its CID: {e}")))?;
                Ok(Some(block))
            }
            None => Ok(None),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Open,
    HeaderWritten,
    Writing,
    Finalized,
}

/// Writes a CAR stream: header first, then any number of block records,
/// then a `finalize`. The header is emitted lazily on the first write so
/// an empty archive still carries its roots.
pub struct CarWriter<W> {
    writer: W,
    header: CarHeader,
    state: WriterState,
}

impl<W> CarWriter<W>
where
    W: AsyncWrite + Send + Unpin,
{
    pub fn new(writer: W, roots: Vec<Cid>) -> Self {
        Self {
            writer,
            header: CarHeader::from(roots),
            state: WriterState::Open,
        }
    }

    async fn ensure_header(&mut self) -> Result<(), Error> {
        if self.state == WriterState::Open {
            let bytes =
                serde_ipld_dagcbor::to_vec(&self.header).map_err(|e| Error::Cbor(e.to_string()))?;
            ld_write(&mut self.writer, &[&bytes]).await?;
            self.state = WriterState::HeaderWritten;
        }
        Ok(())
    }

    /// Append one block record.
    pub async fn write_block(&mut self, cid: &Cid, data: &[u8]) -> Result<(), Error> {
        if self.state == WriterState::Finalized {
            return Err(Error::IllegalState("write after finalize"));
        }
        self.ensure_header().await?;
        ld_write(&mut self.writer, &[&cid.to_bytes(), data]).await?;
        self.state = WriterState::Writing;
        Ok(())
    }

    /// Flush and seal the archive. Any later write fails `IllegalState`.
    pub async fn finalize(&mut self) -> Result<(), Error> {
        if self.state == WriterState::Finalized {
            return Err(Error::IllegalState("finalize after finalize"));
        }
        self.ensure_header().await?;
        self.writer.flush().await?;
        self.state = WriterState::Finalized;
        Ok(())
    }
}

/// Import every record of a CAR stream into `store`, returning the
/// declared roots. Writes land in batches; a corrupt record aborts the
/// import but batches already committed stay.
pub async fn import<R, S>(store: &S, reader: R) -> Result<Vec<Cid>, Error>
where
    R: AsyncRead + Send + Unpin,
    S: BlockStore,
{
    const BATCH_SIZE: usize = 1000;

    let mut car_reader = CarReader::new(reader).await?;
    let mut batch = store.batch();
    let mut total = 0usize;
    while let Some(block) = car_reader.next_block().await? {
        batch.put(&block)?;
        total += 1;
        if batch.len() >= BATCH_SIZE {
            batch.commit()?;
            batch = store.batch();
        }
    }
    batch.commit()?;
    tracing::debug!(blocks = total, roots = car_reader.header.roots.len(), "imported archive");
    Ok(car_reader.header.roots)
}
