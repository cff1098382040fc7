/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

mod auth;
pub use auth::{HttpAuth, HttpBasicAuth};
