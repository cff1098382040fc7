/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthParseError {
    #[error("unsupported auth type")]
    UnsupportedAuthType,
    #[error("invalid base64 encoding")]
    InvalidBase64Encoding,
    #[error("invalid utf-8 encoding")]
    InvalidUtf8Encoding,
    #[error("no delimiter found")]
    NoDelimiterFound,
}
