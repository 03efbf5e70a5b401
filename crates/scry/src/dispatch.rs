// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Worker dispatch for detection requests.
//!
//! `submit` hands a request to a pool thread and returns at once; the
//! worker runs the whole request body against a fresh engine session and
//! delivers exactly one outcome through the one-shot completion channel.
//! Failures travel as values. A panicking engine is caught, converted,
//! and delivered like any other error, after the request's holds have
//! been released.

use std::fs::File;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use crossbeam_channel::{Sender, bounded};
use tracing::{debug, trace, warn};

use crate::decode::decode_result;
use crate::detector::DatabaseSource;
use crate::engine::{EngineSession, SignatureEngine, open_session};
use crate::error::{DetectError, PoolBuildError, SessionError};
use crate::fallback::{self, LoadPlan};
use crate::flags::Flags;
use crate::request::{Detection, DetectionRequest, Pending, TargetInput};

/// Sizing for a private dispatcher pool.
#[derive(Debug, Clone, Default)]
pub struct DispatcherConfig {
    /// Worker threads; `None` means one per logical CPU.
    pub threads: Option<usize>,
}

/// Schedules detection requests onto worker threads.
///
/// The shared dispatcher runs on the process-global worker pool and is
/// what [`Detector::detect_file`] and [`Detector::detect_buffer`] use. A
/// private dispatcher owns a fixed-size pool of its own. Either way,
/// requests queue when every worker is busy, exactly one worker executes
/// each request, and submission never blocks the caller.
///
/// [`Detector::detect_file`]: crate::Detector::detect_file
/// [`Detector::detect_buffer`]: crate::Detector::detect_buffer
pub struct Dispatcher {
    pool: Option<rayon::ThreadPool>,
}

static SHARED: Dispatcher = Dispatcher { pool: None };

impl Dispatcher {
    /// The process-shared dispatcher.
    pub fn shared() -> &'static Dispatcher {
        &SHARED
    }

    /// Build a dispatcher with a private fixed-size pool.
    pub fn new(config: DispatcherConfig) -> Result<Dispatcher, PoolBuildError> {
        let threads = config.threads.unwrap_or_else(num_cpus::get);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("scry-detect-{i}"))
            .build()
            .map_err(|e| PoolBuildError {
                message: e.to_string(),
            })?;
        debug!(threads, "built private detection pool");
        Ok(Dispatcher { pool: Some(pool) })
    }

    /// Submit a request, returning its completion handle immediately.
    pub fn submit(&self, request: DetectionRequest) -> Pending {
        let (sender, receiver) = bounded(1);
        trace!(input = %describe_input(&request.input), "submitting detection request");
        let job = move || run_request(request, sender);
        match &self.pool {
            Some(pool) => pool.spawn(job),
            None => rayon::spawn(job),
        }
        Pending::new(receiver)
    }
}

fn describe_input(input: &TargetInput) -> String {
    match input {
        TargetInput::Path(path) => path.display().to_string(),
        TargetInput::Buffer(hold) => format!("buffer({} bytes)", hold.bytes().len()),
    }
}

/// Worker body: run the request, release its holds, deliver the outcome.
fn run_request(request: DetectionRequest, completion: Sender<Result<Detection, DetectError>>) {
    let DetectionRequest {
        input,
        source,
        flags,
        engine,
    } = request;
    trace!(input = %describe_input(&input), "detection worker started");

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        detect(engine.as_ref(), &source, flags, &input)
    }));
    let outcome = match outcome {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_text(payload.as_ref());
            warn!(%message, "detection worker caught an engine panic");
            Err(DetectError::MatchFailed {
                message: format!("engine panicked: {message}"),
            })
        }
    };

    // Release every hold before the outcome can be observed: the input
    // pin, the database snapshot, and the engine handle all drop here.
    drop(input);
    drop(source);
    drop(engine);

    // A dropped Pending turns this into a no-op.
    let _ = completion.send(outcome);
}

fn panic_text(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// One full detection pass: open, load (with fallback), match, decode.
///
/// The session closes when it drops, on success and on every `?` exit
/// alike.
fn detect(
    engine: &dyn SignatureEngine,
    source: &DatabaseSource,
    flags: Flags,
    input: &TargetInput,
) -> Result<Detection, DetectError> {
    let mut session = open_session(engine, flags)?;
    load_database(session.as_mut(), source)?;
    let raw = match input {
        TargetInput::Path(path) => match_path_target(session.as_mut(), path)?,
        TargetInput::Buffer(hold) => session.match_buffer(hold.bytes()).map_err(match_error)?,
    };
    decode_result(flags, raw)
}

/// Load the request's database into the session, consulting the fallback
/// when a path-based primary fails. In-memory databases get no fallback.
/// When both candidates fail, the fallback's message wins.
fn load_database(
    session: &mut dyn EngineSession,
    source: &DatabaseSource,
) -> Result<(), DetectError> {
    match fallback::resolve(source, fallback::fallback_database()) {
        LoadPlan::Buffer(bytes) => {
            session
                .load_buffer(&bytes)
                .map_err(|e| DetectError::DatabaseUnavailable { message: e.message() })
        }
        LoadPlan::Paths { primary, fallback } => {
            let Err(primary_err) = load_candidate(session, primary.as_deref()) else {
                return Ok(());
            };
            let Some(fallback_path) = fallback else {
                return Err(DetectError::DatabaseUnavailable {
                    message: primary_err.message(),
                });
            };
            debug!(
                fallback = %fallback_path.display(),
                error = %primary_err.message(),
                "primary database failed to load, trying fallback"
            );
            session
                .load_path(&fallback_path)
                .map_err(|e| DetectError::DatabaseUnavailable { message: e.message() })
        }
    }
}

fn load_candidate(session: &mut dyn EngineSession, path: Option<&Path>) -> Result<(), SessionError> {
    match path {
        Some(path) => session.load_path(path),
        None => session.load_default(),
    }
}

/// Match a file target. Windows engines are handed an open descriptor
/// instead of a name, which keeps non-ASCII paths working; the file opens
/// with the host's own Unicode handling either way.
fn match_path_target(
    session: &mut dyn EngineSession,
    path: &Path,
) -> Result<Option<Vec<u8>>, DetectError> {
    if cfg!(windows) {
        let file = File::open(path)?;
        session.match_descriptor(&file).map_err(match_error)
    } else {
        session.match_path(path).map_err(match_error)
    }
}

/// Map a match-phase session failure onto the caller taxonomy: I/O stays
/// I/O, engine diagnostics become match failures.
fn match_error(error: SessionError) -> DetectError {
    match error {
        SessionError::Io(err) => DetectError::Io(err),
        SessionError::Engine(message) => DetectError::MatchFailed { message },
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
