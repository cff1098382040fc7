/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use tokio::io::AsyncBufRead;

/// Like `read_until`, but stops after `max_len` bytes.
///
/// Resolves to whether the delimiter is found and the number of bytes appended.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct LimitedReadUntil<'a, R: ?Sized> {
    reader: &'a mut R,
    buf: &'a mut Vec<u8>,
    delimiter: u8,
    max_len: usize,
    appended: usize,
}

impl<'a, R> LimitedReadUntil<'a, R>
where
    R: AsyncBufRead + ?Sized + Unpin,
{
    pub(super) fn new(
        reader: &'a mut R,
        delimiter: u8,
        max_len: usize,
        buf: &'a mut Vec<u8>,
    ) -> Self {
        LimitedReadUntil {
            reader,
            buf,
            delimiter,
            max_len,
            appended: 0,
        }
    }

    fn finish(&mut self, found: bool) -> Poll<io::Result<(bool, usize)>> {
        let n = std::mem::take(&mut self.appended);
        Poll::Ready(Ok((found, n)))
    }
}

impl<R: AsyncBufRead + ?Sized + Unpin> Future for LimitedReadUntil<'_, R> {
    type Output = io::Result<(bool, usize)>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        while this.appended < this.max_len {
            let available = ready!(Pin::new(&mut *this.reader).poll_fill_buf(cx))?;
            if available.is_empty() {
                return this.finish(false);
            }

            let window = available.len().min(this.max_len - this.appended);
            let chunk = &available[..window];
            let (taken, found) = match memchr::memchr(this.delimiter, chunk) {
                Some(p) => (p + 1, true),
                None => (window, false),
            };
            this.buf.extend_from_slice(&chunk[..taken]);
            Pin::new(&mut *this.reader).consume(taken);
            this.appended += taken;
            if found {
                return this.finish(true);
            }
        }
        this.finish(false)
    }
}

#[cfg(test)]
mod tests {
    use crate::LimitedBufReadExt;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn read_lines() {
        let stream = tokio_test::io::Builder::new()
            .read(b"GET / HTTP/1.1\r\nHo")
            .read(b"st: a\r\n")
            .build();
        let mut reader = BufReader::new(stream);

        let mut buf = Vec::new();
        let (found, nr) = reader.limited_read_until(b'\n', 64, &mut buf).await.unwrap();
        assert!(found);
        assert_eq!(nr, 16);
        assert_eq!(buf, b"GET / HTTP/1.1\r\n");

        buf.clear();
        let (found, nr) = reader.limited_read_until(b'\n', 64, &mut buf).await.unwrap();
        assert!(found);
        assert_eq!(nr, 9);
        assert_eq!(buf, b"Host: a\r\n");

        buf.clear();
        let (found, nr) = reader.limited_read_until(b'\n', 64, &mut buf).await.unwrap();
        assert!(!found);
        assert_eq!(nr, 0);
    }

    #[tokio::test]
    async fn read_limited() {
        let stream = tokio_test::io::Builder::new().read(b"0123456789\n").build();
        let mut reader = BufReader::new(stream);

        let mut buf = Vec::new();
        let (found, nr) = reader.limited_read_until(b'\n', 4, &mut buf).await.unwrap();
        assert!(!found);
        assert_eq!(nr, 4);
        assert_eq!(buf, b"0123");

        buf.clear();
        let (found, nr) = reader.limited_read_until(b'\n', 64, &mut buf).await.unwrap();
        assert!(found);
        assert_eq!(nr, 7);
        assert_eq!(buf, b"456789\n");
    }
}
