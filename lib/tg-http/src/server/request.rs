/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::io::Write;
use std::str::FromStr;

use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri, Version, header};
use tokio::io::AsyncBufRead;

use tg_types::net::UpstreamAddr;

use super::HttpRequestParseError;
use crate::head::{BodyFraming, FramingError, HeadLineReader, HeadReadError};
use crate::{HttpBodyType, HttpHeaderLine, HttpLineParseError, HttpMethodLine, head};

const HTTP_DEFAULT_PORT: u16 = 80;
const HTTPS_DEFAULT_PORT: u16 = 443;

impl From<HeadReadError> for HttpRequestParseError {
    fn from(e: HeadReadError) -> Self {
        match e {
            HeadReadError::Closed => HttpRequestParseError::ClientClosed,
            HeadReadError::TooLarge => HttpRequestParseError::TooLargeHeader,
            HeadReadError::Io(e) => HttpRequestParseError::IoFailed(e),
        }
    }
}

impl From<FramingError> for HttpRequestParseError {
    fn from(e: FramingError) -> Self {
        match e {
            FramingError::TransferEncoding => HttpRequestParseError::InvalidChunkedTransferEncoding,
            FramingError::ContentLength => HttpRequestParseError::InvalidContentLength,
        }
    }
}

fn default_port(tls: bool) -> u16 {
    if tls {
        HTTPS_DEFAULT_PORT
    } else {
        HTTP_DEFAULT_PORT
    }
}

/// A request head received by a forward proxy, in absolute-form or authority-form
pub struct HttpProxyClientRequest {
    pub version: Version,
    pub method: Method,
    pub uri: Uri,
    /// headers to send to the origin, without `Host` and the proxy specific ones
    pub end_to_end_headers: HeaderMap,
    pub proxy_authorization: Option<HeaderValue>,
    origin_header_size: usize,
    keep_alive: bool,
    framing: BodyFraming,
}

impl HttpProxyClientRequest {
    #[inline]
    pub fn origin_header_size(&self) -> usize {
        self.origin_header_size
    }

    #[inline]
    pub fn keep_alive(&self) -> bool {
        self.keep_alive
    }

    #[inline]
    pub fn is_connect(&self) -> bool {
        self.method == Method::CONNECT
    }

    /// A request without any length header has no body
    pub fn body_type(&self) -> Option<HttpBodyType> {
        self.framing.body_type().flatten()
    }

    /// Get the tunnel target of a CONNECT request
    pub fn connect_target(
        &self,
        default_port: u16,
    ) -> Result<UpstreamAddr, HttpRequestParseError> {
        let authority = match (self.uri.scheme(), self.uri.path_and_query()) {
            (None, None) => self.uri.authority(),
            _ => None,
        }
        .ok_or(HttpRequestParseError::InvalidRequestTarget)?;
        UpstreamAddr::from_authority_with_default_port(authority.as_str(), default_port)
            .map_err(|_| HttpRequestParseError::InvalidRequestTarget)
    }

    /// Get the origin of an absolute-form request, and whether tls is needed to reach it
    pub fn forward_target(&self) -> Result<(UpstreamAddr, bool), HttpRequestParseError> {
        let scheme = self
            .uri
            .scheme_str()
            .ok_or(HttpRequestParseError::InvalidRequestTarget)?;
        let tls = if scheme.eq_ignore_ascii_case("https") {
            true
        } else if scheme.eq_ignore_ascii_case("http") {
            false
        } else {
            return Err(HttpRequestParseError::UnsupportedScheme);
        };
        let authority = self
            .uri
            .authority()
            .ok_or(HttpRequestParseError::InvalidRequestTarget)?
            .as_str();
        // userinfo is never sent to the origin
        let host_port = authority
            .rsplit_once('@')
            .map(|(_, hp)| hp)
            .unwrap_or(authority);
        let upstream = UpstreamAddr::from_authority_with_default_port(host_port, default_port(tls))
            .map_err(|_| HttpRequestParseError::InvalidRequestTarget)?;
        Ok((upstream, tls))
    }

    pub async fn parse<R>(
        reader: &mut R,
        max_header_size: usize,
    ) -> Result<Self, HttpRequestParseError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = HeadLineReader::new(max_header_size);
        let mut req = {
            let line = lines.read_line(reader).await?;
            HttpProxyClientRequest::from_method_line(line)?
        };

        loop {
            let line = lines.read_line(reader).await?;
            if head::is_end_line(line) {
                break;
            }
            let header =
                HttpHeaderLine::parse(line).map_err(HttpRequestParseError::InvalidHeaderLine)?;
            req.add_header(header)?;
        }

        req.origin_header_size = lines.consumed();
        if req.framing.conflicted() {
            // rfc9112 Section 6.1
            req.keep_alive = false;
        }
        Ok(req)
    }

    fn from_method_line(line: &[u8]) -> Result<Self, HttpRequestParseError> {
        let ml = HttpMethodLine::parse(line).map_err(HttpRequestParseError::InvalidMethodLine)?;
        let version = match ml.version {
            0 => Version::HTTP_10,
            1 => Version::HTTP_11,
            _ => return Err(HttpRequestParseError::UnsupportedVersion(Version::HTTP_2)),
        };
        let method = Method::from_str(ml.method)
            .map_err(|_| HttpRequestParseError::UnsupportedMethod(ml.method.to_string()))?;
        let uri = Uri::from_str(ml.uri).map_err(|_| HttpRequestParseError::InvalidRequestTarget)?;

        Ok(HttpProxyClientRequest {
            version,
            method,
            uri,
            end_to_end_headers: HeaderMap::new(),
            proxy_authorization: None,
            origin_header_size: 0,
            keep_alive: version == Version::HTTP_11,
            framing: BodyFraming::default(),
        })
    }

    fn update_keep_alive(&mut self, value: &str) {
        head::for_each_token(value, |v| {
            if v.eq_ignore_ascii_case("close") {
                self.keep_alive = false;
            } else if v.eq_ignore_ascii_case("keep-alive") {
                self.keep_alive = true;
            }
        });
    }

    fn add_header(&mut self, header: HttpHeaderLine) -> Result<(), HttpRequestParseError> {
        let name = HeaderName::from_str(header.name).map_err(|_| {
            HttpRequestParseError::InvalidHeaderLine(HttpLineParseError::InvalidHeaderName)
        })?;
        let value = HeaderValue::from_str(header.value).map_err(|_| {
            HttpRequestParseError::InvalidHeaderLine(HttpLineParseError::InvalidHeaderValue)
        })?;

        let forward = match name.as_str() {
            // rebuilt from the request target
            "host" => false,
            "proxy-authorization" => {
                self.proxy_authorization = Some(value);
                return Ok(());
            }
            // sent by some clients instead of `Connection`
            "proxy-connection" => {
                self.update_keep_alive(header.value);
                false
            }
            "connection" => {
                self.update_keep_alive(header.value);
                true
            }
            "transfer-encoding" => {
                if self.framing.set_transfer_encoding(header.value)? {
                    self.end_to_end_headers.remove(header::CONTENT_LENGTH);
                }
                if !self.framing.chunked() {
                    return Err(HttpRequestParseError::InvalidChunkedTransferEncoding);
                }
                true
            }
            "content-length" => self.framing.set_content_length(header.value)?,
            _ => true,
        };
        if forward {
            self.end_to_end_headers.append(name, value);
        }
        Ok(())
    }

    /// Build the request head for the origin server, in origin-form with `Host` rewritten
    pub fn serialize_for_origin(&self, upstream: &UpstreamAddr, tls: bool) -> Vec<u8> {
        let mut buf = Vec::<u8>::with_capacity(self.origin_header_size + 256);
        let target = self
            .uri
            .path_and_query()
            .map(|pa| pa.as_str())
            .unwrap_or("/");
        let _ = write!(buf, "{} {target} {:?}\r\n", self.method, self.version);

        let _ = write!(buf, "Host: {}", upstream.host().to_authority_string());
        if upstream.port() != default_port(tls) {
            let _ = write!(buf, ":{}", upstream.port());
        }
        buf.extend_from_slice(b"\r\n");

        for (name, value) in &self.end_to_end_headers {
            buf.extend_from_slice(name.as_str().as_bytes());
            buf.extend_from_slice(b": ");
            buf.extend_from_slice(value.as_bytes());
            buf.extend_from_slice(b"\r\n");
        }
        buf.extend_from_slice(b"\r\n");
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use tokio::io::{BufReader, Result};
    use tokio_util::io::StreamReader;

    use tg_types::net::Host;

    async fn parse_one(content: &'static [u8]) -> HttpProxyClientRequest {
        let stream = tokio_stream::iter(vec![Result::Ok(Bytes::from_static(content))]);
        let stream = StreamReader::new(stream);
        let mut buf_stream = BufReader::new(stream);
        HttpProxyClientRequest::parse(&mut buf_stream, 4096)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn read_get() {
        let content = b"GET http://example.com/v/a/x?q=1 HTTP/1.1\r\n\
            Host: example.com\r\n\
            Proxy-Authorization: Basic YWxpY2U6czNjcmV0\r\n\
            Proxy-Connection: Keep-Alive\r\n\
            Accept: */*\r\n\
            User-Agent: curl/8.5.0\r\n\r\n";
        let stream = tokio_stream::iter(vec![Result::Ok(Bytes::from_static(content))]);
        let stream = StreamReader::new(stream);
        let mut buf_stream = BufReader::new(stream);
        let request = HttpProxyClientRequest::parse(&mut buf_stream, 4096)
            .await
            .unwrap();
        assert_eq!(request.method, Method::GET);
        assert!(request.keep_alive());
        assert!(request.body_type().is_none());
        assert_eq!(
            request.proxy_authorization,
            Some(HeaderValue::from_static("Basic YWxpY2U6czNjcmV0"))
        );
        assert!(request.end_to_end_headers.get(header::HOST).is_none());

        let (upstream, tls) = request.forward_target().unwrap();
        assert!(!tls);
        assert_eq!(upstream.host(), &Host::Domain("example.com".to_string()));
        assert_eq!(upstream.port(), 80);

        let head = request.serialize_for_origin(&upstream, tls);
        assert_eq!(
            head.as_slice(),
            b"GET /v/a/x?q=1 HTTP/1.1\r\n\
            Host: example.com\r\n\
            accept: */*\r\n\
            user-agent: curl/8.5.0\r\n\r\n"
        );

        let result = HttpProxyClientRequest::parse(&mut buf_stream, 4096).await;
        assert!(matches!(result, Err(HttpRequestParseError::ClientClosed)));
    }

    #[tokio::test]
    async fn connection_close() {
        let request = parse_one(
            b"GET http://api.example.com:8080/v1/files HTTP/1.1\r\n\
            host: api.example.com\r\n\
            Connection: close\r\n\r\n",
        )
        .await;
        assert!(!request.keep_alive());

        let (upstream, tls) = request.forward_target().unwrap();
        let head = request.serialize_for_origin(&upstream, tls);
        assert_eq!(
            head.as_slice(),
            b"GET /v1/files HTTP/1.1\r\n\
            Host: api.example.com:8080\r\n\
            connection: close\r\n\r\n"
        );
    }

    #[tokio::test]
    async fn read_post() {
        let request = parse_one(
            b"POST https://example.com/upload HTTP/1.0\r\n\
            Content-Length: 5\r\n\r\nhello",
        )
        .await;
        assert!(!request.keep_alive());
        assert_eq!(request.body_type(), Some(HttpBodyType::ContentLength(5)));
        let (upstream, tls) = request.forward_target().unwrap();
        assert!(tls);
        assert_eq!(upstream.port(), 443);

        let request = parse_one(
            b"POST http://example.com/upload HTTP/1.1\r\n\
            Expect: 100-continue\r\n\
            Transfer-Encoding: chunked\r\n\r\n",
        )
        .await;
        assert_eq!(request.body_type(), Some(HttpBodyType::Chunked));
    }

    #[tokio::test]
    async fn read_connect() {
        let request = parse_one(
            b"CONNECT example.com:443 HTTP/1.1\r\n\
            Host: example.com:443\r\n\r\n",
        )
        .await;
        assert!(request.is_connect());
        let upstream = request.connect_target(443).unwrap();
        assert_eq!(upstream.to_string(), "example.com:443");

        let request = parse_one(b"CONNECT example.com HTTP/1.1\r\n\r\n").await;
        let upstream = request.connect_target(443).unwrap();
        assert_eq!(upstream.port(), 443);

        let request = parse_one(b"CONNECT example.com: HTTP/1.1\r\n\r\n").await;
        let upstream = request.connect_target(443).unwrap();
        assert_eq!(upstream.to_string(), "example.com:443");

        let request = parse_one(b"CONNECT [::1]:8443 HTTP/1.1\r\n\r\n").await;
        let upstream = request.connect_target(443).unwrap();
        assert_eq!(upstream.to_string(), "[::1]:8443");
    }

    #[tokio::test]
    async fn invalid_target() {
        let request = parse_one(b"GET /index.html HTTP/1.1\r\nHost: a\r\n\r\n").await;
        assert!(matches!(
            request.forward_target(),
            Err(HttpRequestParseError::InvalidRequestTarget)
        ));

        let request = parse_one(b"GET ftp://example.com/ HTTP/1.1\r\n\r\n").await;
        assert!(matches!(
            request.forward_target(),
            Err(HttpRequestParseError::UnsupportedScheme)
        ));

        let request = parse_one(b"CONNECT http://example.com/ HTTP/1.1\r\n\r\n").await;
        assert!(request.connect_target(443).is_err());
    }

    #[tokio::test]
    async fn too_large_header() {
        let content = b"GET http://example.com/ HTTP/1.1\r\n\
            X-Long: aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\r\n\r\n";
        let stream = tokio_stream::iter(vec![Result::Ok(Bytes::from_static(content))]);
        let stream = StreamReader::new(stream);
        let mut buf_stream = BufReader::new(stream);
        let result = HttpProxyClientRequest::parse(&mut buf_stream, 64).await;
        assert!(matches!(result, Err(HttpRequestParseError::TooLargeHeader)));
    }

    #[tokio::test]
    async fn split_reads() {
        let stream = tokio_test::io::Builder::new()
            .read(b"GET http://example.com/ HT")
            .read(b"TP/1.1\r\nHost: exa")
            .read(b"mple.com\r\nContent-Le")
            .read(b"ngth: 0\r\n\r\n")
            .build();
        let mut buf_stream = BufReader::new(stream);
        let request = HttpProxyClientRequest::parse(&mut buf_stream, 4096)
            .await
            .unwrap();
        assert!(request.keep_alive());
        assert!(request.body_type().is_none());
        let (upstream, _) = request.forward_target().unwrap();
        assert_eq!(upstream.to_string(), "example.com:80");
    }

    #[tokio::test]
    async fn closed_inside_head() {
        let stream = tokio_test::io::Builder::new()
            .read(b"GET http://example.com/ HTTP/1.1\r\nHost")
            .build();
        let mut buf_stream = BufReader::new(stream);
        let result = HttpProxyClientRequest::parse(&mut buf_stream, 4096).await;
        assert!(matches!(result, Err(HttpRequestParseError::ClientClosed)));
    }
}
