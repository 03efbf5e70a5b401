//! Shared unit test utilities.
//!
//! Provides a scripted engine double that records the calls its sessions
//! see, plus helpers for tests that touch the process-wide fallback slot.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::engine::{EngineSession, SignatureEngine};
use crate::error::{DetectError, SessionError};
use crate::flags::Flags;

/// Serializes tests that read or write the process-wide fallback slot.
///
/// Hold the guard for the whole test, including any `wait()` on requests
/// whose load phase reads the slot, and restore the slot to `None` before
/// releasing it.
pub fn fallback_lock() -> MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());
    match LOCK.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[derive(Clone, Default)]
struct Script {
    fail_open: bool,
    fail_default_load: bool,
    fail_buffer_load: bool,
    fail_paths: Vec<PathBuf>,
    output: Option<Vec<u8>>,
    match_error: Option<String>,
    panic_on_match: bool,
    released: Option<Arc<AtomicBool>>,
    read_after_release: Option<Arc<AtomicBool>>,
}

/// Engine double whose sessions follow a script and log every call.
pub struct ScriptedEngine {
    script: Script,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedEngine {
    pub fn new() -> ScriptedEngine {
        ScriptedEngine {
            script: Script {
                output: Some(b"scripted result".to_vec()),
                ..Script::default()
            },
            calls: Arc::default(),
        }
    }

    /// Every `open` fails.
    pub fn fail_open(mut self) -> Self {
        self.script.fail_open = true;
        self
    }

    /// Loading the default database fails.
    pub fn fail_default_load(mut self) -> Self {
        self.script.fail_default_load = true;
        self
    }

    /// Loading any in-memory database fails.
    pub fn fail_buffer_load(mut self) -> Self {
        self.script.fail_buffer_load = true;
        self
    }

    /// Loading this database path fails.
    pub fn fail_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.script.fail_paths.push(path.into());
        self
    }

    /// Matches produce this raw output.
    pub fn output(mut self, raw: &[u8]) -> Self {
        self.script.output = Some(raw.to_vec());
        self
    }

    /// Matches produce no result and no diagnostic.
    pub fn no_result(mut self) -> Self {
        self.script.output = None;
        self
    }

    /// Matches fail with this engine diagnostic.
    pub fn match_error(mut self, message: &str) -> Self {
        self.script.match_error = Some(message.to_string());
        self
    }

    /// Matches panic instead of returning.
    pub fn panic_on_match(mut self) -> Self {
        self.script.panic_on_match = true;
        self
    }

    /// Buffer matches set `witness` if they run after `released` is set.
    pub fn watch_release(mut self, released: Arc<AtomicBool>, witness: Arc<AtomicBool>) -> Self {
        self.script.released = Some(released);
        self.script.read_after_release = Some(witness);
        self
    }

    /// Handle to the call log; grab it before wrapping the engine in `Arc`.
    pub fn call_log(&self) -> Arc<Mutex<Vec<String>>> {
        self.calls.clone()
    }
}

impl Default for ScriptedEngine {
    fn default() -> ScriptedEngine {
        ScriptedEngine::new()
    }
}

impl SignatureEngine for ScriptedEngine {
    fn open(&self, flags: Flags) -> Result<Box<dyn EngineSession>, DetectError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("open:{:#x}", flags.bits()));
        if self.script.fail_open {
            return Err(DetectError::OpenFailed {
                message: "scripted open failure".to_string(),
            });
        }
        Ok(Box::new(ScriptedSession {
            script: self.script.clone(),
            calls: self.calls.clone(),
        }))
    }
}

struct ScriptedSession {
    script: Script,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedSession {
    fn log(&self, entry: String) {
        self.calls.lock().unwrap().push(entry);
    }

    fn finish(&self) -> Result<Option<Vec<u8>>, SessionError> {
        if self.script.panic_on_match {
            panic!("scripted engine panic");
        }
        if let Some(message) = &self.script.match_error {
            return Err(SessionError::Engine(message.clone()));
        }
        Ok(self.script.output.clone())
    }
}

impl EngineSession for ScriptedSession {
    fn load_default(&mut self) -> Result<(), SessionError> {
        self.log("load_default".to_string());
        if self.script.fail_default_load {
            return Err(SessionError::Engine("scripted default load failure".to_string()));
        }
        Ok(())
    }

    fn load_path(&mut self, path: &Path) -> Result<(), SessionError> {
        self.log(format!("load_path:{}", path.display()));
        if self.script.fail_paths.iter().any(|p| p == path) {
            return Err(SessionError::Engine(format!("cannot load {}", path.display())));
        }
        Ok(())
    }

    fn load_buffer(&mut self, buffer: &[u8]) -> Result<(), SessionError> {
        self.log(format!("load_buffer:{}", buffer.len()));
        if self.script.fail_buffer_load {
            return Err(SessionError::Engine("scripted buffer load failure".to_string()));
        }
        Ok(())
    }

    fn match_path(&mut self, path: &Path) -> Result<Option<Vec<u8>>, SessionError> {
        self.log(format!("match_path:{}", path.display()));
        self.finish()
    }

    fn match_buffer(&mut self, buffer: &[u8]) -> Result<Option<Vec<u8>>, SessionError> {
        self.log(format!("match_buffer:{}", buffer.len()));
        if let (Some(released), Some(witness)) =
            (&self.script.released, &self.script.read_after_release)
        {
            if released.load(Ordering::SeqCst) {
                witness.store(true, Ordering::SeqCst);
            }
        }
        self.finish()
    }

    fn match_descriptor(&mut self, _file: &std::fs::File) -> Result<Option<Vec<u8>>, SessionError> {
        self.log("match_descriptor".to_string());
        self.finish()
    }
}
