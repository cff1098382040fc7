/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::net::IpAddr;
use std::str::FromStr;

use anyhow::anyhow;
use yaml_rust::Yaml;

pub fn as_ipaddr(v: &Yaml) -> anyhow::Result<IpAddr> {
    if let Yaml::String(s) = v {
        let ip = IpAddr::from_str(s).map_err(|e| anyhow!("invalid ip address {s}: {e}"))?;
        Ok(ip)
    } else {
        Err(anyhow!("yaml value type for 'IpAddr' should be 'string'"))
    }
}
