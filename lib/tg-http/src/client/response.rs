/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use http::{Method, Version};
use tokio::io::AsyncBufRead;

use super::HttpResponseParseError;
use crate::head::{BodyFraming, FramingError, HeadLineReader, HeadReadError};
use crate::{HttpBodyType, HttpHeaderLine, HttpStatusLine, head};

impl From<HeadReadError> for HttpResponseParseError {
    fn from(e: HeadReadError) -> Self {
        match e {
            HeadReadError::Closed => HttpResponseParseError::RemoteClosed,
            HeadReadError::TooLarge => HttpResponseParseError::TooLargeHeader,
            HeadReadError::Io(e) => HttpResponseParseError::IoFailed(e),
        }
    }
}

impl From<FramingError> for HttpResponseParseError {
    fn from(e: FramingError) -> Self {
        match e {
            FramingError::TransferEncoding => {
                HttpResponseParseError::InvalidChunkedTransferEncoding
            }
            FramingError::ContentLength => HttpResponseParseError::InvalidContentLength,
        }
    }
}

/// A response head from the origin server, kept in its received form for relaying
pub struct HttpForwardRemoteResponse {
    pub version: Version,
    pub code: u16,
    pub reason: String,
    head: Vec<u8>,
    keep_alive: bool,
    framing: BodyFraming,
}

impl HttpForwardRemoteResponse {
    /// The raw bytes of the response head, including the ending empty line
    #[inline]
    pub fn head(&self) -> &[u8] {
        &self.head
    }

    #[inline]
    pub fn keep_alive(&self) -> bool {
        self.keep_alive
    }

    /// `1xx` responses other than `101` are followed by the final response
    #[inline]
    pub fn is_informational(&self) -> bool {
        self.code / 100 == 1 && !self.is_switching_protocols()
    }

    #[inline]
    pub fn is_switching_protocols(&self) -> bool {
        self.code == 101
    }

    fn has_body(&self, method: &Method) -> bool {
        !matches!(self.code, 100..=199 | 204 | 304) && *method != Method::HEAD
    }

    /// Message body length by rfc9112 Section 6.3
    pub fn body_type(&self, method: &Method) -> Option<HttpBodyType> {
        if !self.has_body(method) {
            return None;
        }
        self.framing
            .body_type()
            .unwrap_or(Some(HttpBodyType::ReadUntilEnd))
    }

    pub async fn parse<R>(
        reader: &mut R,
        method: &Method,
        max_header_size: usize,
    ) -> Result<Self, HttpResponseParseError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = HeadLineReader::new(max_header_size);
        let line = lines.read_line(reader).await?;
        let mut rsp = HttpForwardRemoteResponse::from_status_line(line)?;

        loop {
            let line = lines.read_line(reader).await?;
            rsp.head.extend_from_slice(line);
            if head::is_end_line(line) {
                break;
            }
            let header =
                HttpHeaderLine::parse(line).map_err(HttpResponseParseError::InvalidHeaderLine)?;
            rsp.add_header(header)?;
        }

        if rsp.framing.conflicted() {
            // rfc9112 Section 6.1
            rsp.keep_alive = false;
        } else if !rsp.framing.has_length() && rsp.has_body(method) {
            // the body ends with the connection
            rsp.keep_alive = false;
        }
        Ok(rsp)
    }

    fn from_status_line(line: &[u8]) -> Result<Self, HttpResponseParseError> {
        let sl = HttpStatusLine::parse(line).map_err(HttpResponseParseError::InvalidStatusLine)?;
        let version = match sl.version {
            0 => Version::HTTP_10,
            1 => Version::HTTP_11,
            _ => return Err(HttpResponseParseError::InvalidVersion(Version::HTTP_2)),
        };
        Ok(HttpForwardRemoteResponse {
            version,
            code: sl.code,
            reason: sl.reason.to_string(),
            head: line.to_vec(),
            keep_alive: version == Version::HTTP_11,
            framing: BodyFraming::default(),
        })
    }

    fn add_header(&mut self, header: HttpHeaderLine) -> Result<(), HttpResponseParseError> {
        let name = header.name;
        if name.eq_ignore_ascii_case("transfer-encoding") {
            self.framing.set_transfer_encoding(header.value)?;
        } else if name.eq_ignore_ascii_case("content-length") {
            self.framing.set_content_length(header.value)?;
        } else if name.eq_ignore_ascii_case("connection") {
            let http10 = self.version == Version::HTTP_10;
            head::for_each_token(header.value, |v| {
                if v.eq_ignore_ascii_case("close") {
                    self.keep_alive = false;
                } else if http10 && v.eq_ignore_ascii_case("keep-alive") {
                    self.keep_alive = true;
                }
            });
        }
        Ok(())
    }
}
