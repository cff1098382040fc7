/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

pub mod process;

pub(crate) mod task;

mod types;
pub(crate) use types::{LtDuration, LtSocketAddr, LtUpstreamAddr};

const LOG_TYPE_TASK: &str = "Task";
