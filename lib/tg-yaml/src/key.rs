/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

pub fn normalize(raw: &str) -> String {
    raw.to_lowercase().replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t() {
        assert_eq!(normalize("Abc"), "abc");
        assert_eq!(normalize("HTTP-Port"), "http_port");
        assert_eq!(normalize("max_header-size"), "max_header_size");
    }
}
