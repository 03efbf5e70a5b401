// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Signature engine contract.
//!
//! The matching engine is consumed as a black box behind two traits: a
//! [`SignatureEngine`] opens fresh [`EngineSession`]s, and each session
//! loads exactly one database and runs exactly one match before it is
//! dropped. Sessions are never shared between requests, so no locking
//! guards the match path.

pub mod stub;

#[cfg(feature = "libmagic")]
pub mod libmagic;

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use crate::error::{DetectError, SessionError};
use crate::flags::Flags;

/// Factory for engine sessions.
///
/// Implementations hold no per-request state and are shared across workers
/// behind an [`Arc`].
pub trait SignatureEngine: Send + Sync {
    /// Open a fresh session with the given engine flags.
    fn open(&self, flags: Flags) -> Result<Box<dyn EngineSession>, DetectError>;
}

/// One open engine instance.
///
/// Dropping the session closes the engine, and that is the only close path,
/// so a session is closed exactly once no matter which error exit a request
/// takes. A failed load leaves the session usable for a further load
/// attempt; that is what the fallback step relies on.
pub trait EngineSession: Send {
    /// Load the engine's built-in default database.
    fn load_default(&mut self) -> Result<(), SessionError>;

    /// Load a database from a filesystem path.
    fn load_path(&mut self, path: &Path) -> Result<(), SessionError>;

    /// Load a compiled database from an in-memory buffer.
    fn load_buffer(&mut self, buffer: &[u8]) -> Result<(), SessionError>;

    /// Match a target file by path.
    ///
    /// `Ok(None)` means the engine produced no result and no diagnostic.
    fn match_path(&mut self, path: &Path) -> Result<Option<Vec<u8>>, SessionError>;

    /// Match an in-memory target buffer.
    fn match_buffer(&mut self, buffer: &[u8]) -> Result<Option<Vec<u8>>, SessionError>;

    /// Match an already-open target file.
    ///
    /// Used where handing the engine a path by name is unreliable for
    /// non-ASCII names; the dispatcher opens the file itself and passes
    /// the handle down.
    fn match_descriptor(&mut self, file: &File) -> Result<Option<Vec<u8>>, SessionError>;
}

impl std::fmt::Debug for dyn EngineSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineSession").finish_non_exhaustive()
    }
}

/// Open a session for a request, composing in the engine flags the
/// orchestration relies on: faults surface as errors rather than output
/// text, and compression heuristics stay off.
pub(crate) fn open_session(
    engine: &dyn SignatureEngine,
    flags: Flags,
) -> Result<Box<dyn EngineSession>, DetectError> {
    engine.open(flags.for_open())
}

/// The engine used by detectors that don't name one explicitly.
#[cfg(not(feature = "libmagic"))]
pub fn default_engine() -> Arc<dyn SignatureEngine> {
    Arc::new(stub::StubEngine::new())
}

/// The engine used by detectors that don't name one explicitly.
#[cfg(feature = "libmagic")]
pub fn default_engine() -> Arc<dyn SignatureEngine> {
    Arc::new(libmagic::LibmagicEngine::new())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
