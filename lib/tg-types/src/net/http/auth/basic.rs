/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::str::FromStr;

use base64::prelude::*;

use crate::auth::AuthParseError;

pub struct HttpBasicAuth {
    pub username: String,
    pub password: String,
    encoded_value: String,
}

impl HttpBasicAuth {
    pub fn new(username: &str, password: &str) -> Self {
        let mut buf = Vec::with_capacity(username.len() + 1 + password.len());
        buf.extend_from_slice(username.as_bytes());
        buf.push(b':');
        buf.extend_from_slice(password.as_bytes());

        let encoded_value = BASE64_STANDARD.encode(buf);

        HttpBasicAuth {
            username: username.to_string(),
            password: password.to_string(),
            encoded_value,
        }
    }

    #[inline]
    pub fn encoded_value(&self) -> &str {
        &self.encoded_value
    }
}

impl FromStr for HttpBasicAuth {
    type Err = AuthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let encoded_value = s.trim(); // allow more space than rfc 7617

        let decoded = BASE64_STANDARD
            .decode(encoded_value)
            .map_err(|_| AuthParseError::InvalidBase64Encoding)?;
        let value =
            std::str::from_utf8(&decoded).map_err(|_| AuthParseError::InvalidUtf8Encoding)?;

        // the password may contain ':'
        match memchr::memchr(b':', value.as_bytes()) {
            Some(i) => Ok(HttpBasicAuth {
                username: value[0..i].to_string(),
                password: value[i + 1..].to_string(),
                encoded_value: encoded_value.to_string(),
            }),
            None => Err(AuthParseError::NoDelimiterFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode() {
        let auth = HttpBasicAuth::new("alice", "s3cret");
        assert_eq!(auth.encoded_value(), "YWxpY2U6czNjcmV0");
    }

    #[test]
    fn decode_password_with_colon() {
        // "bob:pa:ss"
        let auth = HttpBasicAuth::from_str("Ym9iOnBhOnNz").unwrap();
        assert_eq!(auth.username, "bob");
        assert_eq!(auth.password, "pa:ss");
    }

    #[test]
    fn decode_invalid() {
        assert_eq!(
            HttpBasicAuth::from_str("!!!").err(),
            Some(AuthParseError::InvalidBase64Encoding)
        );
        // "alice"
        assert_eq!(
            HttpBasicAuth::from_str("YWxpY2U=").err(),
            Some(AuthParseError::NoDelimiterFound)
        );
    }
}
