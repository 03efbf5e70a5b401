// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Detection requests, buffer holds, and completion handles.
//!
//! A request snapshots everything it needs from its detector at
//! construction, so a worker never chases the detector's lifetime. Input
//! buffers travel as refcounted immutable holds; the pin on caller bytes
//! ends when the worker drops its clone, which happens on every exit path
//! before the completion is delivered.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crossbeam_channel::{Receiver, TryRecvError};
use serde::Serialize;

use crate::detector::{DatabaseSource, Detector};
use crate::engine::SignatureEngine;
use crate::error::DetectError;
use crate::flags::Flags;

/// Refcounted, immutable pin on caller-supplied bytes.
///
/// Cloning shares the same allocation. The bytes can never be mutated for
/// the life of the hold, so handing a buffer to an in-flight request is
/// safe by construction rather than by caller discipline.
#[derive(Clone)]
pub struct BufferHold {
    data: Arc<[u8]>,
}

impl BufferHold {
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Number of live holds on this allocation.
    pub fn holders(&self) -> usize {
        Arc::strong_count(&self.data)
    }
}

impl From<Vec<u8>> for BufferHold {
    fn from(data: Vec<u8>) -> BufferHold {
        BufferHold { data: data.into() }
    }
}

impl From<Arc<[u8]>> for BufferHold {
    fn from(data: Arc<[u8]>) -> BufferHold {
        BufferHold { data }
    }
}

impl From<&[u8]> for BufferHold {
    fn from(data: &[u8]) -> BufferHold {
        BufferHold { data: data.into() }
    }
}

impl fmt::Debug for BufferHold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferHold")
            .field("len", &self.data.len())
            .field("holders", &self.holders())
            .finish()
    }
}

/// What a request examines.
#[derive(Debug)]
pub(crate) enum TargetInput {
    Path(PathBuf),
    Buffer(BufferHold),
}

/// One submitted (or submittable) unit of identification work.
///
/// Everything here is an owned snapshot; the originating [`Detector`] can
/// be reconfigured or dropped freely once the request exists.
pub struct DetectionRequest {
    pub(crate) input: TargetInput,
    pub(crate) source: DatabaseSource,
    pub(crate) flags: Flags,
    pub(crate) engine: Arc<dyn SignatureEngine>,
}

impl fmt::Debug for DetectionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectionRequest")
            .field("input", &self.input)
            .field("source", &self.source)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

impl DetectionRequest {
    pub(crate) fn new(detector: &Detector, input: TargetInput) -> DetectionRequest {
        DetectionRequest {
            input,
            source: detector.source().clone(),
            flags: detector.flags(),
            engine: detector.engine(),
        }
    }
}

/// What detection produced when it succeeded.
///
/// Serializes the way callers see it: a bare string in single-match mode,
/// an array of strings in multi-match mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Detection {
    /// The first matching description.
    Single(String),
    /// Every matching description, first match first.
    Multiple(Vec<String>),
}

impl Detection {
    /// The description, when in single-match mode.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Detection::Single(text) => Some(text),
            Detection::Multiple(_) => None,
        }
    }

    /// The ordered match list, when in multi-match mode.
    pub fn as_multiple(&self) -> Option<&[String]> {
        match self {
            Detection::Single(_) => None,
            Detection::Multiple(items) => Some(items),
        }
    }
}

/// Receiving end of a request's one-shot completion channel.
///
/// Every submitted request resolves exactly once. Dropping the handle does
/// not cancel anything; the worker runs to completion and its delivery
/// becomes a no-op.
#[must_use = "a detection result arrives only through wait()"]
#[derive(Debug)]
pub struct Pending {
    receiver: Receiver<Result<Detection, DetectError>>,
}

impl Pending {
    pub(crate) fn new(receiver: Receiver<Result<Detection, DetectError>>) -> Pending {
        Pending { receiver }
    }

    /// Block until the result arrives.
    ///
    /// The worker sends exactly one outcome before it exits, so this
    /// returns as soon as the request has run. A disconnect without a
    /// value can only mean the process is tearing down around us.
    pub fn wait(self) -> Result<Detection, DetectError> {
        match self.receiver.recv() {
            Ok(outcome) => outcome,
            Err(_) => Err(vanished_worker()),
        }
    }

    /// Take the result if it has already arrived, without blocking.
    ///
    /// `None` means the request is still in flight. A handle delivers one
    /// outcome; polling again after taking it reports the worker as gone.
    pub fn try_wait(&self) -> Option<Result<Detection, DetectError>> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(vanished_worker())),
        }
    }
}

fn vanished_worker() -> DetectError {
    DetectError::MatchFailed {
        message: "detection worker exited without delivering a result".to_string(),
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
