/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

mod error;
pub use error::HttpLineParseError;

mod method_line;
pub use method_line::HttpMethodLine;

mod status_line;
pub use status_line::HttpStatusLine;

mod header_line;
pub use header_line::HttpHeaderLine;

mod chunked_line;
pub use chunked_line::HttpChunkedLine;
