/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

mod transfer;
pub use transfer::{HttpBodyTransferError, transfer_body};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HttpBodyType {
    ContentLength(u64),
    Chunked,
    ReadUntilEnd,
}
