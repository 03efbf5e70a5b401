// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Asynchronous file type detection backed by magic signature databases.
//!
//! `scry` identifies what a byte stream is, whether it lives on disk or in
//! memory, by matching it against a database of binary signature rules.
//! Matching runs on a worker pool: submission never blocks the calling
//! thread, and every request resolves exactly once through a one-shot
//! completion handle.
//!
//! ```
//! use scry::{Detection, Detector};
//!
//! # fn main() -> Result<(), scry::DetectError> {
//! let detector = Detector::new();
//! let pending = detector.detect_buffer(b"%PDF-1.4".to_vec());
//! match pending.wait()? {
//!     Detection::Single(description) => assert!(description.contains("PDF")),
//!     Detection::Multiple(_) => {}
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Multi-match mode
//!
//! With [`Flags::CONTINUE`] a detection reports every rule that matched,
//! in database order, as [`Detection::Multiple`]:
//!
//! ```
//! use scry::{Detector, Flags};
//!
//! # fn main() -> Result<(), scry::DetectError> {
//! let detector = Detector::with_flags(Flags::CONTINUE);
//! let detection = detector.detect_buffer(b"%PDF-1.4".to_vec()).wait()?;
//! let matches = detection.as_multiple().unwrap_or_default();
//! assert!(matches.len() >= 2);
//! # Ok(())
//! # }
//! ```
//!
//! # Engines
//!
//! The matching engine sits behind the [`engine::SignatureEngine`] trait.
//! Builds default to a small built-in engine with an embedded signature
//! table; the `libmagic` feature links the system libmagic instead. Either
//! way each request opens a fresh engine session, loads one database into
//! it, runs one match, and closes it.
//!
//! # Databases and fallback
//!
//! A [`Detector`] reads rules from the engine's default database, an
//! explicit file, or an in-memory buffer. When a default or file database
//! fails to load, the process-wide path registered with
//! [`set_fallback_database`] is tried before the request fails; in-memory
//! databases never fall back.
//!
//! # Buffer lifetimes
//!
//! Caller buffers travel as [`BufferHold`]s: refcounted, immutable pins
//! that are released on every request exit path before the completion is
//! observable. Dropping a [`Pending`] handle never cancels the work.

mod decode;
mod detector;
mod dispatch;
mod error;
mod fallback;
mod filebuf;
mod flags;
mod request;

pub mod engine;

#[cfg(test)]
mod test_utils;

pub use detector::{DatabaseSource, Detector};
pub use dispatch::{Dispatcher, DispatcherConfig};
pub use error::{DetectError, ErrorKind, PoolBuildError, SessionError};
pub use fallback::{fallback_database, set_fallback_database};
pub use flags::Flags;
pub use request::{BufferHold, Detection, DetectionRequest, Pending};
