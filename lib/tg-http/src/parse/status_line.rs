/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use atoi::FromRadix10;

use super::HttpLineParseError;

pub struct HttpStatusLine<'a> {
    pub version: u8,
    pub code: u16,
    pub reason: &'a str,
}

impl<'a> HttpStatusLine<'a> {
    /// Parse `HTTP/1.x CODE [REASON]`, the line ending included
    pub fn parse(buf: &'a [u8]) -> Result<HttpStatusLine<'a>, HttpLineParseError> {
        // shortest form: "HTTP/1.x XYZ\n"
        if buf.len() < 13 {
            return Err(HttpLineParseError::NotLongEnough);
        }
        let sp = memchr::memchr(b' ', buf).ok_or(HttpLineParseError::NoDelimiterFound(' '))?;
        let version = match &buf[..sp] {
            b"HTTP/1.1" => 1,
            b"HTTP/1.0" => 0,
            b"HTTP/2" | b"HTTP/2.0" => 2,
            _ => return Err(HttpLineParseError::InvalidVersion),
        };

        let rest = &buf[sp + 1..];
        let code = match u16::from_radix_10(rest) {
            (code @ 100..=999, 3) => code,
            _ => return Err(HttpLineParseError::InvalidStatusCode),
        };
        let reason = match rest.get(4..) {
            Some(r) => std::str::from_utf8(r)?.trim(),
            None => return Err(HttpLineParseError::NotLongEnough),
        };
        Ok(HttpStatusLine {
            version,
            code,
            reason,
        })
    }
}
