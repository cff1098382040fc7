/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::str::FromStr;

use http::HeaderValue;

use crate::auth::AuthParseError;

mod basic;
pub use basic::HttpBasicAuth;

pub enum HttpAuth {
    None,
    Basic(HttpBasicAuth),
}

impl HttpAuth {
    pub fn from_authorization(value: &str) -> Result<Self, AuthParseError> {
        let value = value.trim_start();
        match memchr::memchr(b' ', value.as_bytes()) {
            Some(i) => {
                if value[0..i].eq_ignore_ascii_case("basic") {
                    let basic = HttpBasicAuth::from_str(&value[i + 1..])?;
                    Ok(HttpAuth::Basic(basic))
                } else {
                    Ok(HttpAuth::None)
                }
            }
            None => Err(AuthParseError::UnsupportedAuthType),
        }
    }
}

impl TryFrom<&HeaderValue> for HttpAuth {
    type Error = AuthParseError;

    fn try_from(value: &HeaderValue) -> Result<Self, Self::Error> {
        let value = std::str::from_utf8(value.as_bytes())
            .map_err(|_| AuthParseError::InvalidUtf8Encoding)?;
        HttpAuth::from_authorization(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ok() {
        let value = HeaderValue::from_static("Basic YWxpY2U6czNjcmV0");
        let HttpAuth::Basic(HttpBasicAuth {
            username, password, ..
        }) = HttpAuth::try_from(&value).unwrap()
        else {
            panic!("not basic auth");
        };
        assert_eq!(username, "alice");
        assert_eq!(password, "s3cret");
    }

    #[test]
    fn parse_scheme_case() {
        let info = HttpAuth::from_authorization("bASIC cm9vdDp0b29y").unwrap();
        assert!(matches!(info, HttpAuth::Basic(_)));
    }

    #[test]
    fn parse_other_scheme() {
        let info = HttpAuth::from_authorization("Bearer abcdef").unwrap();
        assert!(matches!(info, HttpAuth::None));
    }

    #[test]
    fn parse_scheme_only() {
        assert!(HttpAuth::from_authorization("Basic ").is_err());
        assert!(HttpAuth::from_authorization("Basic").is_err());
    }
}
