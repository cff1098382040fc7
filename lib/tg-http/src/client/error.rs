/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::io;

use http::Version;
use thiserror::Error;

use crate::HttpLineParseError;

#[derive(Debug, Error)]
pub enum HttpResponseParseError {
    #[error("closed by remote")]
    RemoteClosed,
    #[error("response head exceeds the size limit")]
    TooLargeHeader,
    #[error("version {0:?} is not supported")]
    InvalidVersion(Version),
    #[error("bad status line: {0}")]
    InvalidStatusLine(HttpLineParseError),
    #[error("bad header line: {0}")]
    InvalidHeaderLine(HttpLineParseError),
    #[error("chunked is not the final transfer coding")]
    InvalidChunkedTransferEncoding,
    #[error("bad content-length")]
    InvalidContentLength,
    #[error("read from remote: {0:?}")]
    IoFailed(#[from] io::Error),
}
