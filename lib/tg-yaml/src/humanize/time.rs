/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::str::FromStr;
use std::time::Duration;

use anyhow::anyhow;
use humanize_rs::ParseError;
use yaml_rust::Yaml;

pub fn as_duration(v: &Yaml) -> anyhow::Result<Duration> {
    match v {
        Yaml::String(value) => match humanize_rs::duration::parse(value) {
            Ok(v) => Ok(v),
            Err(ParseError::MissingUnit) => {
                let u = u64::from_str(value).map_err(|_| anyhow!("invalid duration string"))?;
                Ok(Duration::from_secs(u))
            }
            Err(e) => Err(anyhow!("invalid humanize duration string: {e}")),
        },
        Yaml::Integer(value) => {
            let u = u64::try_from(*value).map_err(|_| anyhow!("negative duration value"))?;
            Ok(Duration::from_secs(u))
        }
        Yaml::Real(s) => {
            let f = f64::from_str(s).map_err(|e| anyhow!("invalid f64 value: {e}"))?;
            Duration::try_from_secs_f64(f).map_err(anyhow::Error::new)
        }
        _ => Err(anyhow!(
            "yaml value type for humanize duration should be 'string' or 'integer' or 'real'"
        )),
    }
}
