/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::str::Utf8Error;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpLineParseError {
    #[error("not long enough")]
    NotLongEnough,
    #[error("invalid utf-8 encoding: {0}")]
    InvalidUtf8Encoding(#[from] Utf8Error),
    #[error("no delimiter '{0}' found")]
    NoDelimiterFound(char),
    #[error("invalid header name")]
    InvalidHeaderName,
    #[error("invalid header value")]
    InvalidHeaderValue,
    #[error("invalid version")]
    InvalidVersion,
    #[error("invalid status code")]
    InvalidStatusCode,
    #[error("invalid chunk size")]
    InvalidChunkSize,
}
