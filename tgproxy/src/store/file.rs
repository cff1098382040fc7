/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};

use super::{StoreError, snapshot};
use crate::auth::{TrustCache, TrustSnapshot};

pub fn load_snapshot(path: &Path) -> Result<TrustSnapshot, StoreError> {
    let content = std::fs::read(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            StoreError::NotFound
        } else {
            StoreError::ReadFailed(e)
        }
    })?;
    let value = serde_json::from_slice(&content)?;
    snapshot::decode(&value)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut s = OsString::from(path.as_os_str());
    s.push(".tmp");
    PathBuf::from(s)
}

/// Overwrite the snapshot file as a whole, readers never see a partial file
pub async fn save_snapshot(path: &Path, snapshot: &TrustSnapshot) -> Result<(), StoreError> {
    let content = serde_json::to_vec(&snapshot::encode(snapshot))?;
    let tmp = tmp_path(path);
    tokio::fs::write(&tmp, &content)
        .await
        .map_err(StoreError::WriteFailed)?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(StoreError::WriteFailed)
}

/// Restore the trust cache at startup, a missing or invalid file leaves it empty
pub fn restore_from_file(cache: &TrustCache, path: &Path) {
    match load_snapshot(path) {
        Ok(snapshot) => {
            info!(
                "restored {} ip(s) of {} user(s) from {}",
                snapshot.ip_count(),
                snapshot.logins.len(),
                path.display()
            );
            cache.restore(snapshot);
        }
        Err(StoreError::NotFound) => {
            info!("no snapshot found at {}, start with empty trust cache", path.display());
        }
        Err(e) => {
            warn!("failed to load snapshot from {}: {e}", path.display());
        }
    }
}
