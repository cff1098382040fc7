/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use anyhow::{Context, anyhow};
use yaml_rust::{Yaml, yaml};

/// Visit every entry of a map, all keys should be strings
pub fn foreach_kv<F>(table: &yaml::Hash, mut f: F) -> anyhow::Result<()>
where
    F: FnMut(&str, &Yaml) -> anyhow::Result<()>,
{
    table.iter().try_for_each(|(k, v)| {
        let Some(key) = k.as_str() else {
            return Err(anyhow!("map key {k:?} is not a string"));
        };
        f(key, v).with_context(|| format!("invalid value for key {key}"))
    })
}
