/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

mod error;
pub use error::HttpResponseParseError;

mod response;
pub use response::HttpForwardRemoteResponse;
