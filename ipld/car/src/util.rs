// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::Error;
use cask_cid::Cid;
use integer_encoding::{VarIntAsyncReader, VarIntAsyncWriter};
use std::io::Cursor;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Read one varint length-delimited section. `Ok(None)` at a clean end of
/// stream; a record cut off mid-way fails `UnexpectedEof`.
pub(crate) async fn ld_read<R>(reader: &mut R) -> Result<Option<Vec<u8>>, Error>
where
    R: AsyncRead + Send + Unpin,
{
    let len: u64 = match reader.read_varint_async().await {
        Ok(len) => len,
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(Error::Io(e)),
    };
    let mut buf = vec![0u8; len as usize];
    reader
        .read_exact(&mut buf)
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => Error::UnexpectedEof,
            _ => Error::Io(e),
        })?;
    Ok(Some(buf))
}

/// Write sections as one varint length-delimited record.
pub(crate) async fn ld_write<W>(writer: &mut W, sections: &[&[u8]]) -> Result<(), Error>
where
    W: AsyncWrite + Send + Unpin,
{
    let len: usize = sections.iter().map(|s| s.len()).sum();
    writer.write_varint_async(len as u64).await?;
    for section in sections {
        writer.write_all(section).await?;
    }
    Ok(())
}

/// Read one block record: a CID followed by the block body.
pub(crate) async fn read_node<R>(reader: &mut R) -> Result<Option<(Cid, Vec<u8>)>, Error>
where
    R: AsyncRead + Send + Unpin,
{
    let Some(buf) = ld_read(reader).await? else {
        return Ok(None);
    };
    let mut cursor = Cursor::new(&buf);
    let cid = Cid::read_bytes(&mut cursor).map_err(|e| Error::Corrupt(format!("bad CID: {e}")))?;
    let body = buf[cursor.position() as usize..].to_vec();
    Ok(Some((cid, body)))
}
