/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

mod size;
pub use size::as_usize;

mod time;
pub use time::as_duration;
