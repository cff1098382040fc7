/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use atoi::FromRadix16Checked;

use super::HttpLineParseError;

pub struct HttpChunkedLine<'a> {
    pub chunk_size: u64,
    pub extension: Option<&'a str>,
}

impl<'a> HttpChunkedLine<'a> {
    /// Parse `SIZE[;EXT]`, the line ending included
    pub fn parse(buf: &'a [u8]) -> Result<HttpChunkedLine<'a>, HttpLineParseError> {
        let (chunk_size, n) = match u64::from_radix_16_checked(buf) {
            (Some(size), n) if n > 0 => (size, n),
            _ => return Err(HttpLineParseError::InvalidChunkSize),
        };

        let extension = match buf.get(n) {
            None => return Err(HttpLineParseError::NotLongEnough),
            Some(b'\r' | b'\n') => None,
            Some(b';' | b' ' | b'\t') => {
                let ext = std::str::from_utf8(&buf[n + 1..])?;
                Some(ext.trim().trim_start_matches(';').trim_start())
            }
            Some(_) => return Err(HttpLineParseError::InvalidChunkSize),
        };
        Ok(HttpChunkedLine {
            chunk_size,
            extension,
        })
    }
}
