/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::fmt::Display;
use std::str::FromStr;

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

fn as_integer<T>(v: &Yaml, type_name: &str) -> anyhow::Result<T>
where
    T: FromStr + TryFrom<i64>,
    <T as FromStr>::Err: Display,
    <T as TryFrom<i64>>::Error: Display,
{
    match v {
        Yaml::Integer(i) => {
            T::try_from(*i).map_err(|e| anyhow!("{i} is not a valid {type_name}: {e}"))
        }
        Yaml::String(s) => {
            T::from_str(s.trim()).map_err(|e| anyhow!("'{s}' is not a valid {type_name}: {e}"))
        }
        _ => Err(anyhow!("a {type_name} value should be an integer or a string")),
    }
}

pub fn as_u16(v: &Yaml) -> anyhow::Result<u16> {
    as_integer(v, "u16")
}

pub fn as_usize(v: &Yaml) -> anyhow::Result<usize> {
    as_integer(v, "usize")
}

pub fn as_string(v: &Yaml) -> anyhow::Result<String> {
    match v {
        Yaml::String(s) | Yaml::Real(s) => Ok(s.clone()),
        Yaml::Integer(i) => Ok(i.to_string()),
        _ => Err(anyhow!("a string value should be a string or a number")),
    }
}

/// Convert a sequence, a single value is taken as a list of one element
pub fn as_list<T, F>(v: &Yaml, convert: F) -> anyhow::Result<Vec<T>>
where
    F: Fn(&Yaml) -> anyhow::Result<T>,
{
    let Yaml::Array(seq) = v else {
        return convert(v).map(|item| vec![item]);
    };
    seq.iter()
        .enumerate()
        .map(|(i, item)| convert(item).with_context(|| format!("invalid list element #{i}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_u16() {
        assert_eq!(as_u16(&Yaml::Integer(8080)).unwrap(), 8080);
        assert_eq!(as_u16(&Yaml::String("1080".to_string())).unwrap(), 1080);
        assert!(as_u16(&Yaml::Integer(70000)).is_err());
        assert!(as_u16(&Yaml::Integer(-1)).is_err());
        assert!(as_u16(&Yaml::Boolean(true)).is_err());
    }

    #[test]
    fn t_string() {
        assert_eq!(as_string(&Yaml::Integer(12)).unwrap(), "12");
        assert_eq!(as_string(&Yaml::String("a".to_string())).unwrap(), "a");
        assert!(as_string(&Yaml::Null).is_err());
    }

    #[test]
    fn t_list() {
        let v = Yaml::Array(vec![Yaml::Integer(1), Yaml::Integer(2)]);
        assert_eq!(as_list(&v, as_usize).unwrap(), vec![1, 2]);

        let v = Yaml::Integer(3);
        assert_eq!(as_list(&v, as_usize).unwrap(), vec![3]);

        let v = Yaml::Array(vec![Yaml::Integer(1), Yaml::Integer(-2)]);
        assert!(as_list(&v, as_usize).is_err());
    }
}
