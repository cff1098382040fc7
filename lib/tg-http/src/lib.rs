/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

mod parse;
pub use parse::{
    HttpChunkedLine, HttpHeaderLine, HttpLineParseError, HttpMethodLine, HttpStatusLine,
};

mod head;

mod body;
pub use body::{HttpBodyTransferError, HttpBodyType, transfer_body};

pub mod client;
pub mod server;
