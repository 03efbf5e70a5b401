// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for detection requests.
//!
//! Every failure inside a worker is captured as a [`DetectError`] value and
//! delivered through the same completion channel as a success; nothing
//! crosses the thread boundary as a panic.

use serde::Serialize;
use thiserror::Error;

/// Errors a detection request can resolve to.
#[derive(Debug, Error)]
pub enum DetectError {
    /// The engine could not initialize a session.
    #[error("engine open failed: {message}")]
    OpenFailed { message: String },

    /// Neither the configured database nor the fallback could be loaded.
    #[error("no usable signature database: {message}")]
    DatabaseUnavailable { message: String },

    /// The engine ran but reported an error, or produced no result where
    /// one was required.
    #[error("match failed: {message}")]
    MatchFailed { message: String },

    /// The target file could not be opened or read.
    #[error("target I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed input, rejected at submission before any worker ran.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },
}

impl DetectError {
    /// The taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DetectError::OpenFailed { .. } => ErrorKind::OpenFailed,
            DetectError::DatabaseUnavailable { .. } => ErrorKind::DatabaseUnavailable,
            DetectError::MatchFailed { .. } => ErrorKind::MatchFailed,
            DetectError::Io(_) => ErrorKind::Io,
            DetectError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
        }
    }
}

/// Flat classification for callers that branch on failure class rather
/// than message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    OpenFailed,
    DatabaseUnavailable,
    MatchFailed,
    Io,
    InvalidArgument,
}

/// Failure surfaced by a single engine session call.
///
/// `Io` marks failures reading bytes before the engine saw them; `Engine`
/// carries the engine's own diagnostic. The dispatcher maps the two onto
/// different [`DetectError`] variants depending on the phase that failed.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Engine(String),
}

impl SessionError {
    /// The diagnostic as plain text, whichever side produced it.
    pub fn message(&self) -> String {
        match self {
            SessionError::Io(err) => err.to_string(),
            SessionError::Engine(message) => message.clone(),
        }
    }
}

/// A private worker pool could not be constructed.
#[derive(Debug, Error)]
#[error("failed to build detection worker pool: {message}")]
pub struct PoolBuildError {
    pub(crate) message: String,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
