/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

mod host;
mod upstream;

pub use host::Host;
pub use upstream::UpstreamAddr;

pub mod http;
