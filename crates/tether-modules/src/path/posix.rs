// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! POSIX path flavor

use super::Flavor;

/// POSIX paths: `/` is the only separator and there are no volumes
#[derive(Debug, Clone, Copy, Default)]
pub struct Posix;

impl Flavor for Posix {
    const SEP: char = '/';
    const DELIMITER: char = ':';

    fn is_sep(b: u8) -> bool {
        b == b'/'
    }

    fn volume_len(_path: &str) -> usize {
        0
    }
}
