/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

#[cfg(test)]
macro_rules! yaml_doc {
    ($s:expr) => {
        YamlLoader::load_from_str($s).unwrap().remove(0)
    };
}
