/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

pub(crate) const VERSION: &str = env!("CARGO_PKG_VERSION");
pub(crate) const PKG_NAME: &str = env!("CARGO_PKG_NAME");
const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

const RUSTLS_PROVIDER: &str = if cfg!(feature = "rustls-aws-lc") {
    "aws-lc-rs"
} else {
    "ring"
};

pub(crate) fn print_version(verbose_level: u8) {
    println!("{PKG_NAME} {VERSION}");
    if verbose_level > 0 {
        println!("{PKG_DESCRIPTION}");
        println!("Rustls Provider: {RUSTLS_PROVIDER}");
    }
    if verbose_level > 1 {
        println!("Target: {} {}", std::env::consts::OS, std::env::consts::ARCH);
        println!("Debug Assertions: {}", cfg!(debug_assertions));
    }
}
