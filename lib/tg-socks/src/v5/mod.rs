/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use super::types::*;

pub const VERSION: u8 = 0x05;

mod addr;

mod reply;
pub use reply::Socks5Reply;

mod request;
pub use request::Socks5Request;

pub mod auth;
