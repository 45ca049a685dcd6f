// SPDX-License-Identifier: Apache-2.0
// SPDX-FileCopyrightText: 2026 reqguard contributors

#![no_main]

use libfuzzer_sys::fuzz_target;
use reqguard_core::TrustedRoot;

fuzz_target!(|data: &[u8]| {
    if let Ok(requested) = std::str::from_utf8(data) {
        let root = TrustedRoot::lexical("/var/app/data").unwrap();
        if let Ok(confined) = root.confine(requested) {
            assert!(confined.as_path().starts_with(root.as_path()));
            assert_eq!(root.confine(confined.relative()).unwrap(), confined);
        }
        if let Ok(upload) = root.confine_upload(requested) {
            assert_eq!(upload.as_path().parent(), Some(root.as_path()));
        }
    }
});
