/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

pub mod auth;
pub mod config;
pub mod opts;
pub mod serve;
pub mod signal;
pub mod store;

mod build;
pub mod log;
