// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Byte-oriented file reading with a size-based strategy.
//!
// Allow unsafe_code for memory-mapped I/O (required by memmap2).
// Safety justification:
// 1. File handle is valid (just opened)
// 2. We don't mutate the mapped memory
// 3. Stale data on concurrent modification is acceptable for signature scans
#![allow(unsafe_code)]
//!
//! Small files are read straight into an owned buffer; larger ones are
//! memory-mapped so database and target bytes reach the engine without
//! an extra copy.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use memmap2::Mmap;

/// Files at or above this size are memory-mapped instead of read.
const MMAP_THRESHOLD: u64 = 64 * 1024;

/// Contents of a file, either owned or memory-mapped.
#[derive(Debug)]
pub(crate) enum FileBuf {
    /// Small file read into memory.
    Owned(Vec<u8>),
    /// Large file memory-mapped.
    Mapped(Mmap),
}

impl FileBuf {
    /// Read `path` with the strategy its size calls for.
    pub(crate) fn read(path: &Path) -> io::Result<FileBuf> {
        let meta = fs::metadata(path)?;
        if meta.len() < MMAP_THRESHOLD {
            Ok(FileBuf::Owned(fs::read(path)?))
        } else {
            let file = File::open(path)?;
            // SAFETY: the handle was just opened, the mapping is never
            // written through, and stale bytes from a concurrent writer are
            // acceptable for signature matching.
            let mmap = unsafe { Mmap::map(&file)? };
            Ok(FileBuf::Mapped(mmap))
        }
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        match self {
            FileBuf::Owned(data) => data,
            FileBuf::Mapped(mmap) => mmap,
        }
    }
}

#[cfg(test)]
#[path = "filebuf_tests.rs"]
mod tests;
