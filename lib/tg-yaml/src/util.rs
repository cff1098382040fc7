/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::path::Path;

use anyhow::{Context, anyhow};
use yaml_rust::{Yaml, YamlLoader};

/// Load the first document of a yaml file
pub fn load_doc(path: &Path) -> anyhow::Result<Yaml> {
    let contents = std::fs::read_to_string(path)
        .context(format!("failed to read file {}", path.display()))?;
    let mut docs = YamlLoader::load_from_str(&contents)
        .context(format!("invalid yaml file {}", path.display()))?;
    if docs.is_empty() {
        return Err(anyhow!("no yaml document found in file {}", path.display()));
    }
    Ok(docs.swap_remove(0))
}
