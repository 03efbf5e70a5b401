// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide fallback database and load-plan resolution.
//!
//! The fallback path lives in a single guarded slot: replaceable at any
//! time, last writer wins, read once per request at the start of its load
//! phase. Resolution into a [`LoadPlan`] is a pure function so the buffer
//! asymmetry (in-memory databases never fall back) is testable without
//! touching the global.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::detector::DatabaseSource;

static FALLBACK_DB: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Set or clear the database consulted when a primary database fails to
/// load. Applies process-wide and replaces any previous value; requests
/// already past their load phase are unaffected.
pub fn set_fallback_database(path: Option<&Path>) {
    *slot() = path.map(Path::to_path_buf);
}

/// Snapshot of the current fallback database path.
pub fn fallback_database() -> Option<PathBuf> {
    slot().clone()
}

fn slot() -> MutexGuard<'static, Option<PathBuf>> {
    // A poisoned slot still holds a coherent Option; keep serving it.
    match FALLBACK_DB.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// How a request's database load phase will proceed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LoadPlan {
    /// Try candidates in order; `None` means the engine's default database.
    Paths {
        primary: Option<PathBuf>,
        fallback: Option<PathBuf>,
    },
    /// Load the in-memory database. No fallback, ever: the caller chose
    /// bytes precisely to avoid filesystem lookups.
    Buffer(std::sync::Arc<[u8]>),
}

/// Resolve a database source against a fallback snapshot.
pub(crate) fn resolve(source: &DatabaseSource, fallback: Option<PathBuf>) -> LoadPlan {
    match source {
        DatabaseSource::Default => LoadPlan::Paths {
            primary: None,
            fallback,
        },
        DatabaseSource::Path(path) => LoadPlan::Paths {
            primary: Some(path.clone()),
            fallback,
        },
        DatabaseSource::Buffer(bytes) => LoadPlan::Buffer(bytes.clone()),
    }
}

#[cfg(test)]
#[path = "fallback_tests.rs"]
mod tests;
