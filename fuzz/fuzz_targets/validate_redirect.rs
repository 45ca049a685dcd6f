// SPDX-License-Identifier: Apache-2.0
// SPDX-FileCopyrightText: 2026 reqguard contributors

#![no_main]

use libfuzzer_sys::fuzz_target;
use reqguard_core::AllowedHostSet;

fuzz_target!(|data: &[u8]| {
    if let Ok(next) = std::str::from_utf8(data) {
        let allowed = AllowedHostSet::new(["example.com"]).unwrap();
        if let Ok(redirect) = allowed.validate_redirect(next) {
            assert!(allowed.contains(redirect.host()));
            assert!(matches!(redirect.as_url().scheme(), "http" | "https"));
        }
    }
});
