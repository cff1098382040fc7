/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, ReadBuf};

const MIN_BUFFER_SIZE: usize = 1024;

/// Buffer and fairness settings of a [`StreamCopy`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StreamCopyConfig {
    pub buffer_size: usize,
    /// bytes relayed in one poll before giving other tasks a chance to run
    pub yield_size: usize,
}

impl Default for StreamCopyConfig {
    fn default() -> Self {
        StreamCopyConfig {
            buffer_size: 16 * 1024,
            yield_size: 1024 * 1024,
        }
    }
}

#[derive(Error, Debug)]
pub enum StreamCopyError {
    #[error("read failed: {0:?}")]
    ReadFailed(io::Error),
    #[error("write failed: {0:?}")]
    WriteFailed(io::Error),
}

/// Cached bytes live in `buf[start..end]`, which is drained before the next read
struct RelayState {
    buf: Box<[u8]>,
    start: usize,
    end: usize,
    eof: bool,
    unflushed: bool,
    active: bool,
    nr: u64,
    nw: u64,
    yield_size: usize,
}

impl RelayState {
    fn new(config: &StreamCopyConfig) -> Self {
        RelayState {
            buf: vec![0; config.buffer_size.max(MIN_BUFFER_SIZE)].into_boxed_slice(),
            start: 0,
            end: 0,
            eof: false,
            unflushed: false,
            active: false,
            nr: 0,
            nw: 0,
            yield_size: config.yield_size,
        }
    }

    fn poll_read_more<R>(
        &mut self,
        cx: &mut Context<'_>,
        reader: Pin<&mut R>,
    ) -> Poll<Result<(), StreamCopyError>>
    where
        R: AsyncRead + ?Sized,
    {
        if self.start == self.end {
            self.start = 0;
            self.end = 0;
        }
        let mut read_buf = ReadBuf::new(&mut self.buf[self.end..]);
        ready!(reader.poll_read(cx, &mut read_buf)).map_err(StreamCopyError::ReadFailed)?;
        match read_buf.filled().len() {
            0 => self.eof = true,
            n => {
                self.end += n;
                self.nr += n as u64;
                self.active = true;
            }
        }
        Poll::Ready(Ok(()))
    }

    fn poll_drain<W>(
        &mut self,
        cx: &mut Context<'_>,
        mut writer: Pin<&mut W>,
    ) -> Poll<Result<usize, StreamCopyError>>
    where
        W: AsyncWrite + ?Sized,
    {
        let mut drained = 0;
        while self.start < self.end {
            let n = ready!(writer.as_mut().poll_write(cx, &self.buf[self.start..self.end]))
                .map_err(StreamCopyError::WriteFailed)?;
            if n == 0 {
                return Poll::Ready(Err(StreamCopyError::WriteFailed(io::Error::from(
                    io::ErrorKind::WriteZero,
                ))));
            }
            self.start += n;
            self.nw += n as u64;
            self.unflushed = true;
            self.active = true;
            drained += n;
        }
        Poll::Ready(Ok(drained))
    }

    fn poll_flush<W>(
        &mut self,
        cx: &mut Context<'_>,
        writer: Pin<&mut W>,
    ) -> Poll<Result<(), StreamCopyError>>
    where
        W: AsyncWrite + ?Sized,
    {
        if self.unflushed {
            ready!(writer.poll_flush(cx)).map_err(StreamCopyError::WriteFailed)?;
            self.unflushed = false;
        }
        Poll::Ready(Ok(()))
    }

    fn poll_relay<R, W>(
        &mut self,
        cx: &mut Context<'_>,
        mut reader: Pin<&mut R>,
        mut writer: Pin<&mut W>,
    ) -> Poll<Result<u64, StreamCopyError>>
    where
        R: AsyncRead + ?Sized,
        W: AsyncWrite + ?Sized,
    {
        let mut relayed = 0usize;
        loop {
            relayed += ready!(self.poll_drain(cx, writer.as_mut()))?;
            if self.eof {
                ready!(self.poll_flush(cx, writer.as_mut()))?;
                return Poll::Ready(Ok(self.nw));
            }
            if relayed >= self.yield_size {
                cx.waker().wake_by_ref();
                return Poll::Pending;
            }

            if self.poll_read_more(cx, reader.as_mut())?.is_pending() {
                // nothing more to read for now, push out what has been written
                ready!(self.poll_flush(cx, writer.as_mut()))?;
                return Poll::Pending;
            }
        }
    }
}

/// One direction of a byte relay, resolving with the number of bytes written on reader EOF
pub struct StreamCopy<'a, R: ?Sized, W: ?Sized> {
    reader: &'a mut R,
    writer: &'a mut W,
    state: RelayState,
}

impl<'a, R, W> StreamCopy<'a, R, W>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    pub fn new(reader: &'a mut R, writer: &'a mut W, config: &StreamCopyConfig) -> Self {
        StreamCopy {
            reader,
            writer,
            state: RelayState::new(config),
        }
    }

    pub fn writer(&mut self) -> &mut W {
        self.writer
    }

    #[inline]
    pub fn read_size(&self) -> u64 {
        self.state.nr
    }

    #[inline]
    pub fn copied_size(&self) -> u64 {
        self.state.nw
    }

    /// No byte has been read or written since the last [`StreamCopy::reset_active`]
    #[inline]
    pub fn is_idle(&self) -> bool {
        !self.state.active
    }

    #[inline]
    pub fn reset_active(&mut self) {
        self.state.active = false;
    }

    /// Write out the cached bytes and flush, used once the other direction has ended
    pub async fn write_flush(&mut self) -> Result<(), StreamCopyError> {
        let state = &mut self.state;
        if state.start < state.end {
            self.writer
                .write_all(&state.buf[state.start..state.end])
                .await
                .map_err(StreamCopyError::WriteFailed)?;
            state.nw += (state.end - state.start) as u64;
            state.start = state.end;
        }
        self.writer
            .flush()
            .await
            .map_err(StreamCopyError::WriteFailed)?;
        state.unflushed = false;
        Ok(())
    }
}

impl<R, W> Future for StreamCopy<'_, R, W>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    type Output = Result<u64, StreamCopyError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let StreamCopy {
            reader,
            writer,
            state,
        } = self.get_mut();
        state.poll_relay(cx, Pin::new(&mut **reader), Pin::new(&mut **writer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn relay_to_eof() {
        let mut reader = tokio_test::io::Builder::new()
            .read(b"hello ")
            .read(b"world")
            .build();
        let (mut writer, mut peer) = tokio::io::duplex(64);

        let config = StreamCopyConfig::default();
        let mut copy = StreamCopy::new(&mut reader, &mut writer, &config);
        assert!(copy.is_idle());
        let nw = (&mut copy).await.unwrap();
        assert_eq!(nw, 11);
        assert_eq!(copy.read_size(), 11);
        assert_eq!(copy.copied_size(), 11);
        assert!(!copy.is_idle());
        copy.reset_active();
        assert!(copy.is_idle());
        drop(copy);
        drop(writer);

        let mut received = Vec::new();
        peer.read_to_end(&mut received).await.unwrap();
        assert_eq!(received, b"hello world");
    }

    #[tokio::test]
    async fn small_writer() {
        let data = vec![b'x'; 5000];
        let mut reader = tokio_test::io::Builder::new().read(&data).build();
        let (mut writer, mut peer) = tokio::io::duplex(100);

        let reading = tokio::spawn(async move {
            let mut received = Vec::new();
            peer.read_to_end(&mut received).await.unwrap();
            received.len()
        });
        let config = StreamCopyConfig::default();
        let nw = StreamCopy::new(&mut reader, &mut writer, &config)
            .await
            .unwrap();
        assert_eq!(nw, 5000);
        drop(writer);
        assert_eq!(reading.await.unwrap(), 5000);
    }

    #[tokio::test]
    async fn read_failed() {
        let mut reader = tokio_test::io::Builder::new()
            .read(b"abc")
            .read_error(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            .build();
        let (mut writer, _peer) = tokio::io::duplex(64);

        let config = StreamCopyConfig::default();
        let r = StreamCopy::new(&mut reader, &mut writer, &config).await;
        assert!(matches!(r, Err(StreamCopyError::ReadFailed(_))));
    }
}
