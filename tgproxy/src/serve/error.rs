/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::io;
use std::time::Duration;

use thiserror::Error;

use tg_http::client::HttpResponseParseError;
use tg_http::server::HttpRequestParseError;
use tg_socks::{SocksNegotiationError, SocksRequestParseError};

use super::TcpConnectError;

macro_rules! impl_brief {
    ($($variant:ident),+ $(,)?) => {
        impl ServerTaskError {
            /// Variant name used as the `reason` field of task logs
            pub(crate) fn brief(&self) -> &'static str {
                match self {
                    $(ServerTaskError::$variant { .. } => stringify!($variant),)+
                }
            }
        }
    };
}

#[derive(Error, Debug)]
pub(crate) enum ServerTaskError {
    #[error("internal error: {0}")]
    InternalServerError(&'static str),
    #[error("bad target: {0}")]
    MalformedTarget(String),
    #[error("bad client request: {0}")]
    InvalidClientProtocol(&'static str),
    #[error("request not supported")]
    UnimplementedProtocol,
    #[error("client read: {0:?}")]
    ClientTcpReadFailed(io::Error),
    #[error("client write: {0:?}")]
    ClientTcpWriteFailed(io::Error),
    #[error("client not authorized")]
    ClientAuthFailed,
    #[error("client too slow at {0}")]
    ClientAppTimeout(&'static str),
    #[error("connect to upstream: {0}")]
    UpstreamNotConnected(#[from] TcpConnectError),
    #[error("tls handshake with upstream: {0:?}")]
    UpstreamTlsHandshakeFailed(io::Error),
    #[error("bad upstream response: {0}")]
    InvalidUpstreamProtocol(String),
    #[error("upstream read: {0:?}")]
    UpstreamReadFailed(io::Error),
    #[error("upstream write: {0:?}")]
    UpstreamWriteFailed(io::Error),
    #[error("upstream closed")]
    ClosedByUpstream,
    #[error("client closed")]
    ClosedByClient,
    #[error("no data for {0:?} x {1}")]
    Idle(Duration, usize),
    /// normal end of a task, only used in logs
    #[error("finished")]
    Finished,
}

impl_brief!(
    InternalServerError,
    MalformedTarget,
    InvalidClientProtocol,
    UnimplementedProtocol,
    ClientTcpReadFailed,
    ClientTcpWriteFailed,
    ClientAuthFailed,
    ClientAppTimeout,
    UpstreamNotConnected,
    UpstreamTlsHandshakeFailed,
    InvalidUpstreamProtocol,
    UpstreamReadFailed,
    UpstreamWriteFailed,
    ClosedByUpstream,
    ClosedByClient,
    Idle,
    Finished,
);

pub(crate) type ServerTaskResult<T> = Result<T, ServerTaskError>;

impl From<HttpRequestParseError> for ServerTaskError {
    fn from(e: HttpRequestParseError) -> Self {
        match e {
            HttpRequestParseError::ClientClosed => ServerTaskError::ClosedByClient,
            HttpRequestParseError::IoFailed(e) => ServerTaskError::ClientTcpReadFailed(e),
            e => ServerTaskError::MalformedTarget(e.to_string()),
        }
    }
}

impl From<HttpResponseParseError> for ServerTaskError {
    fn from(e: HttpResponseParseError) -> Self {
        match e {
            HttpResponseParseError::RemoteClosed => ServerTaskError::ClosedByUpstream,
            HttpResponseParseError::IoFailed(e) => ServerTaskError::UpstreamReadFailed(e),
            e => ServerTaskError::InvalidUpstreamProtocol(e.to_string()),
        }
    }
}

impl From<SocksNegotiationError> for ServerTaskError {
    fn from(e: SocksNegotiationError) -> Self {
        match e {
            SocksNegotiationError::InvalidCommand => ServerTaskError::UnimplementedProtocol,
            SocksNegotiationError::InvalidVersion => {
                ServerTaskError::InvalidClientProtocol("unexpected socks version")
            }
            SocksNegotiationError::NoAuthMethod => {
                ServerTaskError::InvalidClientProtocol("empty socks auth method list")
            }
            SocksNegotiationError::InvalidDomainString | SocksNegotiationError::InvalidAddrType => {
                ServerTaskError::MalformedTarget(e.to_string())
            }
        }
    }
}

impl From<SocksRequestParseError> for ServerTaskError {
    fn from(e: SocksRequestParseError) -> Self {
        match e {
            SocksRequestParseError::ClientClosed => ServerTaskError::ClosedByClient,
            SocksRequestParseError::ReadFailed(e) => ServerTaskError::ClientTcpReadFailed(e),
            SocksRequestParseError::InvalidProtocol(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brief() {
        assert_eq!(ServerTaskError::Finished.brief(), "Finished");
        assert_eq!(
            ServerTaskError::Idle(Duration::from_secs(1), 2).brief(),
            "Idle"
        );
        let e = ServerTaskError::from(SocksRequestParseError::from(
            SocksNegotiationError::InvalidCommand,
        ));
        assert_eq!(e.brief(), "UnimplementedProtocol");
        let e = ServerTaskError::from(HttpRequestParseError::InvalidRequestTarget);
        assert_eq!(e.brief(), "MalformedTarget");
    }
}
