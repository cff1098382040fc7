/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::io;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use tg_io_ext::{LimitedBufReadExt, StreamCopy, StreamCopyConfig, StreamCopyError};

use super::HttpBodyType;
use crate::{HttpChunkedLine, HttpLineParseError};

#[derive(Debug, Error)]
pub enum HttpBodyTransferError {
    #[error("read failed: {0:?}")]
    ReadFailed(io::Error),
    #[error("write failed: {0:?}")]
    WriteFailed(io::Error),
    #[error("reader closed before the end of body")]
    ReaderClosed,
    #[error("too long chunk line")]
    ChunkLineTooLong,
    #[error("invalid chunk line: {0}")]
    InvalidChunkLine(HttpLineParseError),
}

impl From<StreamCopyError> for HttpBodyTransferError {
    fn from(e: StreamCopyError) -> Self {
        match e {
            StreamCopyError::ReadFailed(e) => HttpBodyTransferError::ReadFailed(e),
            StreamCopyError::WriteFailed(e) => HttpBodyTransferError::WriteFailed(e),
        }
    }
}

async fn transfer_fixed<R, W>(
    reader: &mut R,
    writer: &mut W,
    size: u64,
    copy_config: &StreamCopyConfig,
) -> Result<u64, HttpBodyTransferError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut limited = (&mut *reader).take(size);
    let nw = StreamCopy::new(&mut limited, writer, copy_config).await?;
    if nw < size {
        return Err(HttpBodyTransferError::ReaderClosed);
    }
    Ok(nw)
}

async fn transfer_line<R, W>(
    reader: &mut R,
    writer: &mut W,
    line_buf: &mut Vec<u8>,
    max_line_size: usize,
) -> Result<(), HttpBodyTransferError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    line_buf.clear();
    let (found, nr) = reader
        .limited_read_until(b'\n', max_line_size, line_buf)
        .await
        .map_err(HttpBodyTransferError::ReadFailed)?;
    if !found {
        return if nr < max_line_size {
            Err(HttpBodyTransferError::ReaderClosed)
        } else {
            Err(HttpBodyTransferError::ChunkLineTooLong)
        };
    }
    writer
        .write_all(line_buf)
        .await
        .map_err(HttpBodyTransferError::WriteFailed)
}

async fn transfer_chunked<R, W>(
    reader: &mut R,
    writer: &mut W,
    max_line_size: usize,
    copy_config: &StreamCopyConfig,
) -> Result<u64, HttpBodyTransferError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line_buf = Vec::<u8>::with_capacity(64);
    let mut total: u64 = 0;
    loop {
        transfer_line(reader, writer, &mut line_buf, max_line_size).await?;
        total += line_buf.len() as u64;
        let chunk = HttpChunkedLine::parse(&line_buf)
            .map_err(HttpBodyTransferError::InvalidChunkLine)?;
        if chunk.chunk_size == 0 {
            break;
        }

        total += transfer_fixed(reader, writer, chunk.chunk_size, copy_config).await?;
        // the CRLF after chunk data
        transfer_line(reader, writer, &mut line_buf, max_line_size).await?;
        total += line_buf.len() as u64;
        if line_buf != b"\r\n" && line_buf != b"\n" {
            return Err(HttpBodyTransferError::InvalidChunkLine(
                HttpLineParseError::InvalidChunkSize,
            ));
        }
    }

    // trailer fields, ended by an empty line
    loop {
        transfer_line(reader, writer, &mut line_buf, max_line_size).await?;
        total += line_buf.len() as u64;
        if line_buf == b"\r\n" || line_buf == b"\n" {
            break;
        }
    }
    Ok(total)
}

/// Relay a message body byte for byte, returning the size written.
///
/// The framing bytes of chunked bodies are passed through unmodified.
pub async fn transfer_body<R, W>(
    reader: &mut R,
    writer: &mut W,
    body_type: HttpBodyType,
    max_line_size: usize,
) -> Result<u64, HttpBodyTransferError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let copy_config = StreamCopyConfig::default();
    let nw = match body_type {
        HttpBodyType::ContentLength(size) => {
            transfer_fixed(reader, writer, size, &copy_config).await?
        }
        HttpBodyType::Chunked => {
            transfer_chunked(reader, writer, max_line_size, &copy_config).await?
        }
        HttpBodyType::ReadUntilEnd => StreamCopy::new(reader, writer, &copy_config).await?,
    };
    writer
        .flush()
        .await
        .map_err(HttpBodyTransferError::WriteFailed)?;
    Ok(nw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    async fn run(
        input: &[u8],
        body_type: HttpBodyType,
    ) -> (Result<u64, HttpBodyTransferError>, Vec<u8>, Vec<u8>) {
        let mut reader = BufReader::new(input);
        let mut output = Vec::new();
        let r = transfer_body(&mut reader, &mut output, body_type, 1024).await;
        let mut left = Vec::new();
        reader.read_to_end(&mut left).await.unwrap();
        (r, output, left)
    }

    #[tokio::test]
    async fn content_length() {
        let (r, output, left) = run(b"hello worldGET", HttpBodyType::ContentLength(11)).await;
        assert_eq!(r.unwrap(), 11);
        assert_eq!(output, b"hello world");
        assert_eq!(left, b"GET");
    }

    #[tokio::test]
    async fn content_length_short() {
        let (r, output, _) = run(b"hello", HttpBodyType::ContentLength(11)).await;
        assert!(matches!(r, Err(HttpBodyTransferError::ReaderClosed)));
        assert_eq!(output, b"hello");
    }

    #[tokio::test]
    async fn chunked() {
        let body: &[u8] = b"5\r\nhello\r\n6; ext=1\r\n world\r\n0\r\nX-Trailer: 1\r\n\r\n";
        let mut input = body.to_vec();
        input.extend_from_slice(b"NEXT");
        let (r, output, left) = run(&input, HttpBodyType::Chunked).await;
        assert_eq!(r.unwrap(), body.len() as u64);
        assert_eq!(output, body);
        assert_eq!(left, b"NEXT");
    }

    #[tokio::test]
    async fn chunked_invalid() {
        let (r, _, _) = run(b"5\r\nhelloXX0\r\n\r\n", HttpBodyType::Chunked).await;
        assert!(matches!(r, Err(HttpBodyTransferError::InvalidChunkLine(_))));

        let (r, _, _) = run(b"zz\r\n", HttpBodyType::Chunked).await;
        assert!(matches!(r, Err(HttpBodyTransferError::InvalidChunkLine(_))));

        let (r, _, _) = run(b"5\r\nhel", HttpBodyType::Chunked).await;
        assert!(matches!(r, Err(HttpBodyTransferError::ReaderClosed)));
    }

    #[tokio::test]
    async fn read_until_end() {
        let (r, output, _) = run(b"all the rest", HttpBodyType::ReadUntilEnd).await;
        assert_eq!(r.unwrap(), 12);
        assert_eq!(output, b"all the rest");
    }

    #[tokio::test]
    async fn chunked_split_reads() {
        let stream = tokio_test::io::Builder::new()
            .read(b"5\r")
            .read(b"\nhel")
            .read(b"lo\r\n0\r")
            .read(b"\n\r\n")
            .build();
        let mut reader = BufReader::new(stream);
        let mut output = Vec::new();
        let nw = transfer_body(&mut reader, &mut output, HttpBodyType::Chunked, 1024)
            .await
            .unwrap();
        assert_eq!(output, b"5\r\nhello\r\n0\r\n\r\n");
        assert_eq!(nw, output.len() as u64);
    }

    #[tokio::test]
    async fn read_failed() {
        let stream = tokio_test::io::Builder::new()
            .read(b"hel")
            .read_error(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            .build();
        let mut reader = BufReader::new(stream);
        let mut output = Vec::new();
        let r = transfer_body(&mut reader, &mut output, HttpBodyType::ContentLength(11), 1024)
            .await;
        assert!(matches!(r, Err(HttpBodyTransferError::ReadFailed(_))));
        assert_eq!(output, b"hel");
    }

    #[tokio::test]
    async fn write_failed() {
        let mut reader = BufReader::new(&b"hello"[..]);
        let mut writer = tokio_test::io::Builder::new()
            .write_error(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            .build();
        let r = transfer_body(&mut reader, &mut writer, HttpBodyType::ContentLength(5), 1024)
            .await;
        assert!(matches!(r, Err(HttpBodyTransferError::WriteFailed(_))));
    }
}
