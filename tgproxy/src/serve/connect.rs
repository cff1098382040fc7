/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpStream;

use tg_types::net::{Host, UpstreamAddr};

#[derive(Error, Debug)]
pub(crate) enum TcpConnectError {
    #[error("resolve failed: {0}")]
    ResolveFailed(io::Error),
    #[error("no address resolved")]
    NoAddressResolved,
    #[error("timeout by rule")]
    TimeoutByRule,
    #[error("connect failed: {0}")]
    ConnectFailed(io::Error),
}

/// Connect to the upstream, trying each resolved address in order within the deadline
pub(crate) async fn tcp_connect_to(
    upstream: &UpstreamAddr,
    timeout: Duration,
) -> Result<TcpStream, TcpConnectError> {
    match tokio::time::timeout(timeout, connect(upstream)).await {
        Ok(r) => r,
        Err(_) => Err(TcpConnectError::TimeoutByRule),
    }
}

async fn connect(upstream: &UpstreamAddr) -> Result<TcpStream, TcpConnectError> {
    let port = upstream.port();
    let addrs: Vec<SocketAddr> = match upstream.host() {
        Host::Ip(ip) => vec![SocketAddr::new(*ip, port)],
        Host::Domain(domain) => tokio::net::lookup_host((domain.as_str(), port))
            .await
            .map_err(TcpConnectError::ResolveFailed)?
            .collect(),
    };

    let mut last_err = None;
    for addr in addrs {
        match TcpStream::connect(addr).await {
            Ok(stream) => {
                let _ = stream.set_nodelay(true);
                return Ok(stream);
            }
            Err(e) => last_err = Some(e),
        }
    }
    match last_err {
        Some(e) => Err(TcpConnectError::ConnectFailed(e)),
        None => Err(TcpConnectError::NoAddressResolved),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn connect_ok() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let upstream = UpstreamAddr::new(Host::Ip(IpAddr::V4(Ipv4Addr::LOCALHOST)), port);
        let stream = tcp_connect_to(&upstream, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(stream.peer_addr().unwrap().port(), port);
    }

    #[tokio::test]
    async fn connect_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let upstream = UpstreamAddr::new(Host::Ip(IpAddr::V4(Ipv4Addr::LOCALHOST)), port);
        let e = tcp_connect_to(&upstream, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(e, TcpConnectError::ConnectFailed(_)));
    }
}
