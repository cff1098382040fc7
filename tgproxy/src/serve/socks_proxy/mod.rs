/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

mod server;
pub(crate) use server::{SERVER_TYPE_SOCKS, SocksProxyServer};

mod task;

#[cfg(test)]
mod tests;
