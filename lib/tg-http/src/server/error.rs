/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::io;

use http::Version;
use thiserror::Error;

use crate::HttpLineParseError;

#[derive(Debug, Error)]
pub enum HttpRequestParseError {
    #[error("closed by client")]
    ClientClosed,
    #[error("request head exceeds the size limit")]
    TooLargeHeader,
    #[error("bad request line: {0}")]
    InvalidMethodLine(HttpLineParseError),
    #[error("method {0} is not supported")]
    UnsupportedMethod(String),
    #[error("version {0:?} is not supported")]
    UnsupportedVersion(Version),
    #[error("bad request target")]
    InvalidRequestTarget,
    #[error("request target scheme is not supported")]
    UnsupportedScheme,
    #[error("bad header line: {0}")]
    InvalidHeaderLine(HttpLineParseError),
    #[error("bad transfer-encoding for a request")]
    InvalidChunkedTransferEncoding,
    #[error("bad content-length")]
    InvalidContentLength,
    #[error("read from client: {0:?}")]
    IoFailed(#[from] io::Error),
}
