/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

mod limited_read_until;
pub use limited_read_until::LimitedReadUntil;

mod limited_buf_read_ext;
pub use limited_buf_read_ext::LimitedBufReadExt;
