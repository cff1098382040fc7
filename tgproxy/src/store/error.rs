/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot file not found")]
    NotFound,
    #[error("read failed: {0:?}")]
    ReadFailed(io::Error),
    #[error("invalid json: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid snapshot: {0}")]
    InvalidFormat(&'static str),
    #[error("write failed: {0:?}")]
    WriteFailed(io::Error),
}
