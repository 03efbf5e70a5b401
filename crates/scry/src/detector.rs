// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Identification profiles.
//!
//! A [`Detector`] pairs a signature database source with behavior flags
//! and an engine. It holds no engine state, so it is cheap to clone and
//! safe to use from any number of threads while requests are in flight;
//! every request opens its own engine session.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::dispatch::Dispatcher;
use crate::engine::{SignatureEngine, default_engine};
use crate::error::DetectError;
use crate::flags::Flags;
use crate::request::{BufferHold, DetectionRequest, Pending, TargetInput};

/// Where a detector's signature database comes from.
#[derive(Clone)]
pub enum DatabaseSource {
    /// The engine's built-in default database.
    Default,
    /// An explicit database file.
    Path(PathBuf),
    /// An in-memory database, shared across requests by refcount.
    Buffer(Arc<[u8]>),
}

impl fmt::Debug for DatabaseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseSource::Default => write!(f, "Default"),
            DatabaseSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
            DatabaseSource::Buffer(bytes) => {
                f.debug_struct("Buffer").field("len", &bytes.len()).finish()
            }
        }
    }
}

/// A configured identification profile.
#[derive(Clone)]
pub struct Detector {
    source: DatabaseSource,
    flags: Flags,
    engine: Arc<dyn SignatureEngine>,
}

impl Detector {
    /// Default database, platform-default flags.
    pub fn new() -> Detector {
        Detector::with_flags(Flags::default())
    }

    /// Default database with explicit flags.
    pub fn with_flags(flags: Flags) -> Detector {
        Detector::with_engine(default_engine(), DatabaseSource::Default, flags)
    }

    /// Explicit database file.
    pub fn with_database(path: impl Into<PathBuf>, flags: Flags) -> Detector {
        Detector::with_engine(default_engine(), DatabaseSource::Path(path.into()), flags)
    }

    /// In-memory database.
    ///
    /// The bytes are shared, not copied: they stay pinned until the
    /// detector and every request referencing them are gone. A detector
    /// configured this way never consults the fallback database.
    pub fn with_database_buffer(buffer: impl Into<Arc<[u8]>>, flags: Flags) -> Detector {
        Detector::with_engine(
            default_engine(),
            DatabaseSource::Buffer(buffer.into()),
            flags,
        )
    }

    /// Full control over engine, database source, and flags.
    ///
    /// Asking for every match (`CONTINUE`) forces `RAW` on: multi-match
    /// output is parsed on its raw delimiter framing, which character
    /// translation would corrupt.
    pub fn with_engine(
        engine: Arc<dyn SignatureEngine>,
        source: DatabaseSource,
        flags: Flags,
    ) -> Detector {
        Detector {
            source,
            flags: flags.normalized(),
            engine,
        }
    }

    /// The flags this detector runs with, after composition.
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// The configured database source.
    pub fn source(&self) -> &DatabaseSource {
        &self.source
    }

    pub(crate) fn engine(&self) -> Arc<dyn SignatureEngine> {
        self.engine.clone()
    }

    /// Build a request for a file target without submitting it.
    ///
    /// The path is copied into request-owned storage; callers may drop or
    /// reuse theirs immediately. An empty path is rejected here, before
    /// any worker is involved.
    pub fn file_request(&self, path: impl AsRef<Path>) -> Result<DetectionRequest, DetectError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(DetectError::InvalidArgument {
                reason: "target path is empty".to_string(),
            });
        }
        Ok(DetectionRequest::new(
            self,
            TargetInput::Path(path.to_path_buf()),
        ))
    }

    /// Build a request for an in-memory target without submitting it.
    pub fn buffer_request(&self, buffer: impl Into<BufferHold>) -> DetectionRequest {
        DetectionRequest::new(self, TargetInput::Buffer(buffer.into()))
    }

    /// Identify a file, scheduling on the shared dispatcher.
    pub fn detect_file(&self, path: impl AsRef<Path>) -> Result<Pending, DetectError> {
        Ok(Dispatcher::shared().submit(self.file_request(path)?))
    }

    /// Identify an in-memory buffer, scheduling on the shared dispatcher.
    pub fn detect_buffer(&self, buffer: impl Into<BufferHold>) -> Pending {
        Dispatcher::shared().submit(self.buffer_request(buffer))
    }
}

impl Default for Detector {
    fn default() -> Detector {
        Detector::new()
    }
}

impl fmt::Debug for Detector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Detector")
            .field("source", &self.source)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "detector_tests.rs"]
mod tests;
