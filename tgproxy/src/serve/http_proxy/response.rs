/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::io::{self, Write};

use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Responses generated by the proxy itself
pub(super) enum HttpProxyLocalResponse<'a> {
    ConnectionEstablished,
    ConnectAuthRequired,
    AuthRequired { close: bool },
    BadGateway { reason: &'a str },
}

impl HttpProxyLocalResponse<'_> {
    fn serialize(&self) -> Vec<u8> {
        match self {
            HttpProxyLocalResponse::ConnectionEstablished => b"HTTP/1.1 200 OK\r\n\r\n".to_vec(),
            HttpProxyLocalResponse::ConnectAuthRequired => {
                b"HTTP/1.1 407 Proxy Authentication Required\r\n\
                  Proxy-Authenticate: Basic\r\n\r\n"
                    .to_vec()
            }
            HttpProxyLocalResponse::AuthRequired { close } => {
                let mut buf = b"HTTP/1.1 407 Proxy Authentication Required\r\n\
                                Proxy-Authenticate: Basic\r\n\
                                Content-Length: 0\r\n"
                    .to_vec();
                if *close {
                    buf.extend_from_slice(b"Connection: close\r\n");
                }
                buf.extend_from_slice(b"\r\n");
                buf
            }
            HttpProxyLocalResponse::BadGateway { reason } => {
                let mut buf = Vec::with_capacity(128 + reason.len());
                let _ = write!(
                    buf,
                    "HTTP/1.1 502 Bad Gateway\r\n\
                     Content-Type: text/plain\r\n\
                     Content-Length: {}\r\n\
                     Connection: close\r\n\r\n{reason}",
                    reason.len()
                );
                buf
            }
        }
    }

    pub(super) async fn send<W>(&self, clt_w: &mut W) -> io::Result<u64>
    where
        W: AsyncWrite + Unpin,
    {
        let buf = self.serialize();
        clt_w.write_all(&buf).await?;
        clt_w.flush().await?;
        Ok(buf.len() as u64)
    }
}
