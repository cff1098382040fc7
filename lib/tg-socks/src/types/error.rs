/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SocksNegotiationError {
    #[error("unexpected version byte")]
    InvalidVersion,
    #[error("empty auth method list")]
    NoAuthMethod,
    #[error("unknown command")]
    InvalidCommand,
    #[error("bad domain name")]
    InvalidDomainString,
    #[error("unknown address type")]
    InvalidAddrType,
}

#[derive(Error, Debug)]
pub enum SocksRequestParseError {
    #[error("client closed")]
    ClientClosed,
    #[error("read from client: {0:?}")]
    ReadFailed(io::Error),
    #[error("protocol error: {0}")]
    InvalidProtocol(#[from] SocksNegotiationError),
}

impl From<io::Error> for SocksRequestParseError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::UnexpectedEof => SocksRequestParseError::ClientClosed,
            _ => SocksRequestParseError::ReadFailed(e),
        }
    }
}
