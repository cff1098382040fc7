/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

mod fs;
mod net;
mod primary;

pub use fs::{as_file_path, as_path_in_dir};
pub use net::as_ipaddr;
pub use primary::{as_list, as_string, as_u16, as_usize};
