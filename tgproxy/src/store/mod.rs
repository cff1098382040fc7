/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

mod error;
pub use error::StoreError;

mod snapshot;

mod file;
pub use file::{load_snapshot, restore_from_file, save_snapshot};

mod persist;
pub use persist::{PersistenceHandle, PersistenceLoop};
