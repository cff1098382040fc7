/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

/// Implement `Serializer` methods by formatting with the `Buffer` type of `itoa` or `ryu`
macro_rules! emit_by_buffer {
    ($krate:ident: $($t:ty => $f:ident),+ $(,)?) => {
        $(
            fn $f(&mut self, key: slog::Key, val: $t) -> slog::Result {
                let mut buffer = $krate::Buffer::new();
                self.emit_str(key, buffer.format(val))
            }
        )+
    };
}
