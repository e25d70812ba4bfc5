// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Path string algebra for POSIX and Windows-style paths
//!
//! Every operation is written once against the [`Flavor`] trait. A flavor
//! only supplies its separators and how to find the volume (drive letter or
//! UNC prefix) at the start of a path; [`Posix`] and [`Win32`] are the two
//! instantiations. [`PathFlavor`] selects one at runtime.
//!
//! All functions are purely lexical and never touch the file system.

mod posix;
mod win32;

pub use posix::Posix;
pub use win32::Win32;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Components of a path as returned by `parse`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedPath {
    /// Root (e.g., "/" or "C:\\"); empty for relative paths
    pub root: String,
    /// Directory (e.g., "/home/user")
    pub dir: String,
    /// Base name with extension (e.g., "file.txt")
    pub base: String,
    /// Name without extension (e.g., "file")
    pub name: String,
    /// Extension including dot (e.g., ".txt")
    pub ext: String,
}

/// Separator rules and volume detection for one OS family
pub trait Flavor {
    /// Separator used when building paths
    const SEP: char;
    /// Delimiter for path lists
    const DELIMITER: char;

    /// Check if a byte is a path separator
    fn is_sep(b: u8) -> bool;

    /// Length of the volume prefix (drive or UNC share) of `path`
    fn volume_len(path: &str) -> usize;

    /// The volume prefix of `path`
    fn volume(path: &str) -> &str {
        &path[..Self::volume_len(path)]
    }

    /// Last portion of a path, ignoring trailing separators
    ///
    /// `suffix` is removed when it is a proper tail of the result.
    fn basename(path: &str, suffix: Option<&str>) -> String {
        let b = path.as_bytes();
        let vol = Self::volume_len(path);
        let end = trim_end::<Self>(b, vol);
        if end == vol {
            return String::new();
        }

        let start = last_sep::<Self>(b, vol, end).map_or(vol, |i| i + 1);
        let base = &path[start..end];
        match suffix {
            Some(s) if !s.is_empty() && base.len() > s.len() && base.ends_with(s) => {
                base[..base.len() - s.len()].to_string()
            }
            _ => base.to_string(),
        }
    }

    /// Directory portion of a path
    fn dirname(path: &str) -> String {
        let b = path.as_bytes();
        let vol = Self::volume_len(path);
        if vol > 0 && vol == path.len() {
            return path.to_string();
        }
        if !b[vol..].iter().any(|&c| Self::is_sep(c)) {
            return ".".to_string();
        }

        let end = trim_end::<Self>(b, vol);
        if end == vol {
            return path[..=vol].to_string();
        }
        match last_sep::<Self>(b, vol, end) {
            Some(i) if i == vol => path[..=vol].to_string(),
            Some(i) => path[..i].to_string(),
            None => ".".to_string(),
        }
    }

    /// Extension of the final segment, from its last `.` to the end
    ///
    /// A dot that starts the segment does not count (`.profile` has none).
    fn extname(path: &str) -> String {
        let b = path.as_bytes();
        let vol = Self::volume_len(path);
        let start = last_sep::<Self>(b, vol, b.len()).map_or(vol, |i| i + 1);
        ext_of(&path[start..]).to_string()
    }

    /// Check if the path has a separator right after its volume
    fn is_absolute(path: &str) -> bool {
        path.as_bytes()
            .get(Self::volume_len(path))
            .is_some_and(|&c| Self::is_sep(c))
    }

    /// Rewrite a path to its canonical lexical form
    ///
    /// Drops `.` segments, folds `..` into preceding segments (keeping leading
    /// `..` of relative paths), collapses separator runs to one [`Flavor::SEP`],
    /// and keeps a single trailing separator if the input had one.
    fn normalize(path: &str) -> String {
        let b = path.as_bytes();
        let n = b.len();
        let vol = Self::volume_len(path);
        let sep = Self::SEP;

        if vol == n {
            if vol == 0 {
                return ".".to_string();
            }
            let volume = normalize_volume::<Self>(path);
            return if vol == 2 {
                format!("{}.", volume)
            } else {
                format!("{}{}", volume, sep)
            };
        }

        let abs = Self::is_sep(b[vol]);
        // length of the leading run of `..` segments that cannot be folded
        let mut dot = 0;
        let mut rv = String::with_capacity(n);
        let mut i = vol;
        while i < n {
            if Self::is_sep(b[i]) {
                i += 1;
            } else if b[i] == b'.' && (i + 1 == n || Self::is_sep(b[i + 1])) {
                i += 1;
            } else if b[i] == b'.'
                && i + 1 < n
                && b[i + 1] == b'.'
                && (i + 2 == n || Self::is_sep(b[i + 2]))
            {
                i += 2;
                if dot < rv.len() {
                    let cut = rv.rfind(sep).map_or(dot, |p| p.max(dot));
                    rv.truncate(cut);
                } else if !abs {
                    if !rv.is_empty() {
                        rv.push(sep);
                    }
                    rv.push_str("..");
                    dot = rv.len();
                }
            } else {
                if abs || !rv.is_empty() {
                    rv.push(sep);
                }
                let beg = i;
                while i < n && !Self::is_sep(b[i]) {
                    i += 1;
                }
                rv.push_str(&path[beg..i]);
            }
        }

        if rv.is_empty() {
            rv.push(if abs { sep } else { '.' });
        }
        if vol + 1 < n && Self::is_sep(b[n - 1]) && !rv.ends_with(sep) {
            rv.push(sep);
        }
        format!("{}{}", normalize_volume::<Self>(path), rv)
    }

    /// Split a path into root, dir, base, name and ext
    fn parse(path: &str) -> ParsedPath {
        let b = path.as_bytes();
        let vol = Self::volume_len(path);
        let root = if Self::is_absolute(path) {
            path[..=vol].to_string()
        } else {
            String::new()
        };
        // a volume-relative path (`C:foo`) keeps its volume in `dir`
        let top = if root.is_empty() { &path[..vol] } else { root.as_str() };

        let end = trim_end::<Self>(b, vol);
        if end == vol {
            return ParsedPath {
                dir: top.to_string(),
                root,
                ..ParsedPath::default()
            };
        }

        let (dir, start) = match last_sep::<Self>(b, vol, end) {
            Some(i) if i == vol => (root.clone(), i + 1),
            Some(i) => (path[..i].to_string(), i + 1),
            None => (top.to_string(), vol),
        };
        let base = &path[start..end];
        let ext = ext_of(base);
        ParsedPath {
            root,
            dir,
            base: base.to_string(),
            name: base[..base.len() - ext.len()].to_string(),
            ext: ext.to_string(),
        }
    }

    /// Build a path from components; the inverse of `parse`
    ///
    /// `base` wins over `name` + `ext`, and `dir` falls back to `root`. A `dir`
    /// that is only a volume is joined without a separator.
    fn format(parsed: &ParsedPath) -> String {
        let dir = if parsed.dir.is_empty() {
            &parsed.root
        } else {
            &parsed.dir
        };
        let base = if parsed.base.is_empty() {
            format!("{}{}", parsed.name, parsed.ext)
        } else {
            parsed.base.clone()
        };

        if dir.is_empty() {
            base
        } else if *dir == parsed.root || Self::volume_len(dir) == dir.len() {
            format!("{}{}", dir, base)
        } else {
            format!("{}{}{}", dir, Self::SEP, base)
        }
    }
}

/// End of `b` after dropping trailing separators, never before the volume
fn trim_end<F: Flavor + ?Sized>(b: &[u8], vol: usize) -> usize {
    let mut end = b.len();
    while vol < end && F::is_sep(b[end - 1]) {
        end -= 1;
    }
    end
}

/// Index of the last separator in `b[from..to]`
fn last_sep<F: Flavor + ?Sized>(b: &[u8], from: usize, to: usize) -> Option<usize> {
    (from..to).rev().find(|&i| F::is_sep(b[i]))
}

fn ext_of(segment: &str) -> &str {
    match segment.rfind('.') {
        Some(0) | None => "",
        Some(i) => &segment[i..],
    }
}

fn normalize_volume<F: Flavor + ?Sized>(path: &str) -> String {
    F::volume(path)
        .chars()
        .map(|c| if c == '/' { F::SEP } else { c })
        .collect()
}

/// Path flavor selected at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathFlavor {
    /// `/` separated, no volumes
    Posix,
    /// `\` or `/` separated, with drive letters and UNC shares
    Win32,
}

impl PathFlavor {
    /// Flavor of the host OS
    pub fn host() -> Self {
        if cfg!(windows) { Self::Win32 } else { Self::Posix }
    }

    /// Name used in bindings and on the command line
    pub fn name(self) -> &'static str {
        match self {
            Self::Posix => "posix",
            Self::Win32 => "win32",
        }
    }

    /// Path separator
    pub fn sep(self) -> char {
        match self {
            Self::Posix => Posix::SEP,
            Self::Win32 => Win32::SEP,
        }
    }

    /// Path list delimiter
    pub fn delimiter(self) -> char {
        match self {
            Self::Posix => Posix::DELIMITER,
            Self::Win32 => Win32::DELIMITER,
        }
    }

    /// See [`Flavor::basename`]
    pub fn basename(self, path: &str, suffix: Option<&str>) -> String {
        match self {
            Self::Posix => Posix::basename(path, suffix),
            Self::Win32 => Win32::basename(path, suffix),
        }
    }

    /// See [`Flavor::dirname`]
    pub fn dirname(self, path: &str) -> String {
        match self {
            Self::Posix => Posix::dirname(path),
            Self::Win32 => Win32::dirname(path),
        }
    }

    /// See [`Flavor::extname`]
    pub fn extname(self, path: &str) -> String {
        match self {
            Self::Posix => Posix::extname(path),
            Self::Win32 => Win32::extname(path),
        }
    }

    /// See [`Flavor::is_absolute`]
    pub fn is_absolute(self, path: &str) -> bool {
        match self {
            Self::Posix => Posix::is_absolute(path),
            Self::Win32 => Win32::is_absolute(path),
        }
    }

    /// See [`Flavor::normalize`]
    pub fn normalize(self, path: &str) -> String {
        match self {
            Self::Posix => Posix::normalize(path),
            Self::Win32 => Win32::normalize(path),
        }
    }

    /// See [`Flavor::parse`]
    pub fn parse(self, path: &str) -> ParsedPath {
        match self {
            Self::Posix => Posix::parse(path),
            Self::Win32 => Win32::parse(path),
        }
    }

    /// See [`Flavor::format`]
    pub fn format(self, parsed: &ParsedPath) -> String {
        match self {
            Self::Posix => Posix::format(parsed),
            Self::Win32 => Win32::format(parsed),
        }
    }
}

impl fmt::Display for PathFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PathFlavor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "posix" => Ok(Self::Posix),
            "win32" | "windows" => Ok(Self::Win32),
            other => Err(format!("unknown path flavor '{}'", other)),
        }
    }
}
