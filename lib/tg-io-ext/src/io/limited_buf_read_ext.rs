/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use tokio::io::AsyncBufRead;

use super::LimitedReadUntil;

pub trait LimitedBufReadExt: AsyncBufRead {
    /// Read into `buf` until `delimiter` or at most `max_len` bytes.
    ///
    /// Returns `(found, nr)`, where `found` tells whether the delimiter is the last byte read.
    fn limited_read_until<'a>(
        &'a mut self,
        delimiter: u8,
        max_len: usize,
        buf: &'a mut Vec<u8>,
    ) -> LimitedReadUntil<'a, Self>
    where
        Self: Unpin,
    {
        LimitedReadUntil::new(self, delimiter, max_len, buf)
    }
}

impl<R: AsyncBufRead + ?Sized> LimitedBufReadExt for R {}
