/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::io;
use std::str::FromStr;

use tokio::io::AsyncBufRead;

use tg_io_ext::LimitedBufReadExt;

use crate::HttpBodyType;

pub(crate) enum HeadReadError {
    Closed,
    TooLarge,
    Io(io::Error),
}

impl From<io::Error> for HeadReadError {
    fn from(e: io::Error) -> Self {
        HeadReadError::Io(e)
    }
}

/// Line by line reader of a message head, with a total size limit
pub(crate) struct HeadLineReader {
    line: Vec<u8>,
    remaining: usize,
    consumed: usize,
}

impl HeadLineReader {
    pub(crate) fn new(max_header_size: usize) -> Self {
        HeadLineReader {
            line: Vec::with_capacity(1024),
            remaining: max_header_size,
            consumed: 0,
        }
    }

    #[inline]
    pub(crate) fn consumed(&self) -> usize {
        self.consumed
    }

    /// Read the next line, including the line ending
    pub(crate) async fn read_line<R>(&mut self, reader: &mut R) -> Result<&[u8], HeadReadError>
    where
        R: AsyncBufRead + Unpin,
    {
        if self.remaining == 0 {
            return Err(HeadReadError::TooLarge);
        }
        self.line.clear();
        let (found, nr) = reader
            .limited_read_until(b'\n', self.remaining, &mut self.line)
            .await?;
        if !found {
            // a partial line at eof means the peer has gone
            return if nr == 0 || nr < self.remaining {
                Err(HeadReadError::Closed)
            } else {
                Err(HeadReadError::TooLarge)
            };
        }
        self.remaining -= nr;
        self.consumed += nr;
        Ok(&self.line)
    }
}

#[inline]
pub(crate) fn is_end_line(line: &[u8]) -> bool {
    matches!(line, b"\n" | b"\r\n")
}

/// Visit the non empty items of a comma separated header value
pub(crate) fn for_each_token<F>(value: &str, mut f: F)
where
    F: FnMut(&str),
{
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .for_each(&mut f);
}

pub(crate) enum FramingError {
    TransferEncoding,
    ContentLength,
}

/// Body framing collected from `Transfer-Encoding` and `Content-Length` headers
#[derive(Default)]
pub(crate) struct BodyFraming {
    content_length: Option<u64>,
    transfer_encoding: bool,
    chunked: bool,
    /// both length headers seen, the connection should not be reused
    conflicted: bool,
}

impl BodyFraming {
    #[inline]
    pub(crate) fn conflicted(&self) -> bool {
        self.conflicted
    }

    #[inline]
    pub(crate) fn chunked(&self) -> bool {
        self.chunked
    }

    #[inline]
    pub(crate) fn has_length(&self) -> bool {
        self.chunked || self.content_length.is_some()
    }

    /// Returns whether a previously accepted `Content-Length` is dropped
    pub(crate) fn set_transfer_encoding(&mut self, value: &str) -> Result<bool, FramingError> {
        self.transfer_encoding = true;
        let dropped = self.content_length.take().is_some();
        if dropped {
            self.conflicted = true;
        }

        let mut codings = value.rsplit(',').map(str::trim);
        let last = codings.next().unwrap_or_default();
        if last.eq_ignore_ascii_case("chunked") {
            self.chunked = true;
        } else if codings.any(|c| c.eq_ignore_ascii_case("chunked")) {
            return Err(FramingError::TransferEncoding);
        }
        Ok(dropped)
    }

    /// Returns whether the header should be kept
    pub(crate) fn set_content_length(&mut self, value: &str) -> Result<bool, FramingError> {
        if self.transfer_encoding {
            self.conflicted = true;
            return Ok(false);
        }
        let len = u64::from_str(value.trim()).map_err(|_| FramingError::ContentLength)?;
        match self.content_length {
            Some(prev) if prev != len => Err(FramingError::ContentLength),
            Some(_) => Ok(false),
            None => {
                self.content_length = Some(len);
                Ok(true)
            }
        }
    }

    /// The body of a message that carries one, `None` if the length is unknown
    pub(crate) fn body_type(&self) -> Option<Option<HttpBodyType>> {
        if self.chunked {
            Some(Some(HttpBodyType::Chunked))
        } else {
            match self.content_length {
                Some(0) => Some(None),
                Some(n) => Some(Some(HttpBodyType::ContentLength(n))),
                None => None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_line() {
        assert!(is_end_line(b"\r\n"));
        assert!(is_end_line(b"\n"));
        assert!(!is_end_line(b"a\r\n"));
        assert!(!is_end_line(b"\r\r\n"));
    }

    #[test]
    fn transfer_encoding_wins() {
        let mut framing = BodyFraming::default();
        assert!(matches!(framing.set_content_length("12"), Ok(true)));
        assert!(matches!(framing.set_transfer_encoding("gzip, chunked"), Ok(true)));
        assert!(framing.conflicted());
        assert!(framing.chunked());
        assert!(matches!(framing.set_content_length("12"), Ok(false)));
        assert_eq!(framing.body_type(), Some(Some(HttpBodyType::Chunked)));
    }

    #[test]
    fn chunked_not_last() {
        let mut framing = BodyFraming::default();
        assert!(matches!(
            framing.set_transfer_encoding("chunked, gzip"),
            Err(FramingError::TransferEncoding)
        ));

        let mut framing = BodyFraming::default();
        assert!(matches!(framing.set_transfer_encoding("gzip"), Ok(false)));
        assert!(!framing.has_length());
        assert!(framing.body_type().is_none());
    }

    #[test]
    fn content_length() {
        let mut framing = BodyFraming::default();
        assert!(matches!(framing.set_content_length("5"), Ok(true)));
        assert!(matches!(framing.set_content_length("5"), Ok(false)));
        assert!(matches!(
            framing.set_content_length("6"),
            Err(FramingError::ContentLength)
        ));
        assert_eq!(framing.body_type(), Some(Some(HttpBodyType::ContentLength(5))));

        let mut framing = BodyFraming::default();
        assert!(matches!(
            framing.set_content_length("-1"),
            Err(FramingError::ContentLength)
        ));
        assert!(matches!(framing.set_content_length("0"), Ok(true)));
        assert_eq!(framing.body_type(), Some(None));
    }
}
