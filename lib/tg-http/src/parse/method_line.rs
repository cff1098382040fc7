/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use super::HttpLineParseError;

pub struct HttpMethodLine<'a> {
    pub method: &'a str,
    pub uri: &'a str,
    pub version: u8,
}

impl<'a> HttpMethodLine<'a> {
    pub fn parse(buf: &'a [u8]) -> Result<HttpMethodLine<'a>, HttpLineParseError> {
        const MINIMAL_LENGTH: usize = 15; // GET / HTTP/1.x\n

        if buf.len() < MINIMAL_LENGTH {
            return Err(HttpLineParseError::NotLongEnough);
        }

        let line = std::str::from_utf8(buf)?.trim_end();

        let Some(p1) = memchr::memchr(b' ', line.as_bytes()) else {
            return Err(HttpLineParseError::NoDelimiterFound(' '));
        };
        let Some(p2) = memchr::memrchr(b' ', line.as_bytes()) else {
            return Err(HttpLineParseError::NoDelimiterFound(' '));
        };
        if p1 == p2 {
            return Err(HttpLineParseError::NoDelimiterFound(' '));
        }

        let version = match &line[p2 + 1..] {
            "HTTP/1.0" => 0,
            "HTTP/1.1" => 1,
            "HTTP/2.0" | "HTTP/2" => 2,
            _ => return Err(HttpLineParseError::InvalidVersion),
        };

        let uri = line[p1 + 1..p2].trim();
        if uri.is_empty() {
            return Err(HttpLineParseError::NotLongEnough);
        }

        Ok(HttpMethodLine {
            method: &line[0..p1],
            uri,
            version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal() {
        let m = HttpMethodLine::parse(b"GET http://example.com/ HTTP/1.1\r\n").unwrap();
        assert_eq!(m.method, "GET");
        assert_eq!(m.uri, "http://example.com/");
        assert_eq!(m.version, 1);
    }

    #[test]
    fn connect() {
        let m = HttpMethodLine::parse(b"CONNECT example.com:443 HTTP/1.0\n").unwrap();
        assert_eq!(m.method, "CONNECT");
        assert_eq!(m.uri, "example.com:443");
        assert_eq!(m.version, 0);
    }

    #[test]
    fn invalid() {
        assert!(HttpMethodLine::parse(b"GET\r\n").is_err());
        assert!(HttpMethodLine::parse(b"GET http://example.com/\r\n").is_err());
        assert!(HttpMethodLine::parse(b"GET http://example.com/ HTTP/3.0\r\n").is_err());
    }
}
