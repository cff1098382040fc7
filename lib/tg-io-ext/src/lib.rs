/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

mod io;
mod stream;
mod time;

pub use io::*;
pub use stream::*;
pub use time::*;
