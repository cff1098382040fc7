/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::net::SocketAddr;
use std::time::Duration;

use slog::{Record, Serializer, Value};

use tg_types::net::UpstreamAddr;

pub(crate) struct LtDuration(pub(crate) Duration);

impl Value for LtDuration {
    fn serialize(
        &self,
        _record: &Record,
        key: slog::Key,
        serializer: &mut dyn Serializer,
    ) -> slog::Result {
        if self.0.is_zero() {
            serializer.emit_none(key)
        } else {
            serializer.emit_arguments(key, &format_args!("{:.3?}", self.0))
        }
    }
}

pub(crate) struct LtSocketAddr(pub(crate) SocketAddr);

impl Value for LtSocketAddr {
    fn serialize(
        &self,
        _record: &Record,
        key: slog::Key,
        serializer: &mut dyn Serializer,
    ) -> slog::Result {
        serializer.emit_arguments(key, &format_args!("{}", self.0))
    }
}

pub(crate) struct LtUpstreamAddr<'a>(pub(crate) &'a UpstreamAddr);

impl Value for LtUpstreamAddr<'_> {
    fn serialize(
        &self,
        _record: &Record,
        key: slog::Key,
        serializer: &mut dyn Serializer,
    ) -> slog::Result {
        serializer.emit_arguments(key, &format_args!("{}", self.0))
    }
}
