/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

#[macro_use]
mod macros;

mod hash;
mod util;

pub mod humanize;
pub mod key;
pub mod value;

pub use hash::foreach_kv;
pub use util::load_doc;
