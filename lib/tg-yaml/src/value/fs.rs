/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::anyhow;
use yaml_rust::Yaml;

fn join_lookup_dir(v: &Yaml, lookup_dir: &Path) -> anyhow::Result<PathBuf> {
    if let Yaml::String(path) = v {
        let path = PathBuf::from_str(path).map_err(|e| anyhow!("invalid path: {e:?}"))?;
        if path.is_absolute() {
            Ok(path)
        } else {
            Ok(lookup_dir.join(path))
        }
    } else {
        Err(anyhow!("yaml value type for path should be string"))
    }
}

/// Get the path of an existing regular file, relative paths are resolved in `lookup_dir`
pub fn as_file_path(v: &Yaml, lookup_dir: &Path) -> anyhow::Result<PathBuf> {
    let path = join_lookup_dir(v, lookup_dir)?;
    if !path.exists() {
        return Err(anyhow!("path {} is not existed", path.display()));
    }
    if !path.is_file() {
        return Err(anyhow!("the path is existed but not a regular file"));
    }
    path.canonicalize()
        .map_err(|e| anyhow!("invalid path {}: {e:?}", path.display()))
}

/// Get a path that may not exist yet, relative paths are resolved in `lookup_dir`
pub fn as_path_in_dir(v: &Yaml, lookup_dir: &Path) -> anyhow::Result<PathBuf> {
    let path = join_lookup_dir(v, lookup_dir)?;
    if path.is_dir() {
        return Err(anyhow!("the path {} is a directory", path.display()));
    }
    Ok(path)
}
