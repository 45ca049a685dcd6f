// SPDX-License-Identifier: Apache-2.0
// SPDX-FileCopyrightText: 2026 reqguard contributors

#![no_main]

use libfuzzer_sys::fuzz_target;
use reqguard_core::{Params, StatementTemplate};

const LOOKUP: StatementTemplate =
    StatementTemplate::new("SELECT id FROM users WHERE name = ? AND note = '?' -- ?");

fuzz_target!(|data: &[u8]| {
    let values: Vec<String> = data
        .split(|b| *b == 0)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect();
    let count = values.len();

    match LOOKUP.bind(Params::positional(values)) {
        Ok(stmt) => {
            assert_eq!(count, 1);
            assert_eq!(stmt.sql(), LOOKUP.sql());
        }
        Err(_) => assert_ne!(count, 1),
    }
});
