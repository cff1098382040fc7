/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

mod server;
pub(crate) use server::{HttpProxyServer, SERVER_TYPE_HTTP, SERVER_TYPE_HTTPS};

mod connect;
mod forward;
mod response;
mod task;
