// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Windows path flavor

use super::Flavor;

/// Windows paths: `\` and `/` separate, volumes are drives or UNC shares
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32;

impl Flavor for Win32 {
    const SEP: char = '\\';
    const DELIMITER: char = ';';

    fn is_sep(b: u8) -> bool {
        b == b'\\' || b == b'/'
    }

    /// `C:` or `\\host\share`
    fn volume_len(path: &str) -> usize {
        let b = path.as_bytes();
        if b.len() < 2 {
            return 0;
        }
        if b[1] == b':' && b[0].is_ascii_alphabetic() {
            return 2;
        }

        if b.len() > 4 && Self::is_sep(b[0]) && Self::is_sep(b[1]) && !Self::is_sep(b[2]) && b[2] != b'.' {
            // host runs up to the next separator; a share must follow it
            if let Some(i) = (3..b.len() - 1).find(|&i| Self::is_sep(b[i])) {
                if !Self::is_sep(b[i + 1]) {
                    return (i + 1..b.len()).find(|&j| Self::is_sep(b[j])).unwrap_or(b.len());
                }
            }
        }
        0
    }
}
