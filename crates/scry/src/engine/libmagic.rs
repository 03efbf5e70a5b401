// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Adapter for the system libmagic.
//!
// Allow unsafe_code for the C ABI of libmagic; this module is the only
// place the crate talks to it.
// Safety justification:
// 1. Every magic_set pointer is checked non-null at open and owned by
//    exactly one session, so no handle sees concurrent calls
// 2. Strings crossing the boundary are copied before the next engine call;
//    no engine-owned pointer outlives the call that produced it
// 3. The session closes its handle exactly once, in Drop
#![allow(unsafe_code)]
//!
//! Enabled by the `libmagic` feature, which links `-lmagic` and makes this
//! the engine behind [`default_engine`](super::default_engine).

use std::ffi::{CStr, CString, c_char, c_int, c_void};
use std::fs::File;
use std::io;
use std::path::Path;

use crate::error::{DetectError, SessionError};
use crate::flags::Flags;

use super::{EngineSession, SignatureEngine};

#[repr(C)]
struct MagicSet {
    _private: [u8; 0],
}

#[link(name = "magic")]
unsafe extern "C" {
    fn magic_open(flags: c_int) -> *mut MagicSet;
    fn magic_close(cookie: *mut MagicSet);
    fn magic_error(cookie: *mut MagicSet) -> *const c_char;
    fn magic_load(cookie: *mut MagicSet, filename: *const c_char) -> c_int;
    fn magic_load_buffers(
        cookie: *mut MagicSet,
        buffers: *mut *mut c_void,
        sizes: *mut usize,
        nbuffers: usize,
    ) -> c_int;
    fn magic_file(cookie: *mut MagicSet, filename: *const c_char) -> *const c_char;
    fn magic_buffer(cookie: *mut MagicSet, buffer: *const c_void, length: usize) -> *const c_char;
    fn magic_descriptor(cookie: *mut MagicSet, fd: c_int) -> *const c_char;
}

/// Engine backed by the system libmagic.
pub struct LibmagicEngine;

impl LibmagicEngine {
    pub fn new() -> LibmagicEngine {
        LibmagicEngine
    }
}

impl Default for LibmagicEngine {
    fn default() -> LibmagicEngine {
        LibmagicEngine::new()
    }
}

impl SignatureEngine for LibmagicEngine {
    fn open(&self, flags: Flags) -> Result<Box<dyn EngineSession>, DetectError> {
        // SAFETY: magic_open has no preconditions; null is its only
        // failure signal.
        let cookie = unsafe { magic_open(flags.bits() as c_int) };
        if cookie.is_null() {
            return Err(DetectError::OpenFailed {
                message: io::Error::last_os_error().to_string(),
            });
        }
        Ok(Box::new(LibmagicSession { cookie }))
    }
}

struct LibmagicSession {
    cookie: *mut MagicSet,
}

// SAFETY: a session moves to one worker and is never shared; the cookie
// sees calls from at most one thread at a time.
unsafe impl Send for LibmagicSession {}

impl LibmagicSession {
    fn last_error(&self) -> Option<String> {
        // SAFETY: the cookie is valid until Drop; the returned string is
        // engine-owned and valid until the next call on this cookie, and is
        // copied before that can happen.
        let err = unsafe { magic_error(self.cookie) };
        if err.is_null() {
            return None;
        }
        // SAFETY: non-null magic_error results are NUL-terminated.
        let text = unsafe { CStr::from_ptr(err) };
        Some(text.to_string_lossy().into_owned())
    }

    fn error_or(&self, what: &str) -> SessionError {
        SessionError::Engine(
            self.last_error()
                .unwrap_or_else(|| format!("{what} failed")),
        )
    }

    fn text_result(&self, result: *const c_char) -> Result<Option<Vec<u8>>, SessionError> {
        if result.is_null() {
            return match self.last_error() {
                Some(message) => Err(SessionError::Engine(message)),
                None => Ok(None),
            };
        }
        // SAFETY: non-null match results are NUL-terminated engine-owned
        // strings; copied here, before any further engine call.
        let text = unsafe { CStr::from_ptr(result) };
        Ok(Some(text.to_bytes().to_vec()))
    }
}

impl EngineSession for LibmagicSession {
    fn load_default(&mut self) -> Result<(), SessionError> {
        // SAFETY: a null filename selects the engine's default database.
        let status = unsafe { magic_load(self.cookie, std::ptr::null()) };
        if status == -1 {
            return Err(self.error_or("default database load"));
        }
        Ok(())
    }

    fn load_path(&mut self, path: &Path) -> Result<(), SessionError> {
        let cpath = path_to_cstring(path)?;
        // SAFETY: cpath outlives the call; the engine copies what it needs.
        let status = unsafe { magic_load(self.cookie, cpath.as_ptr()) };
        if status == -1 {
            return Err(self.error_or("database load"));
        }
        Ok(())
    }

    fn load_buffer(&mut self, buffer: &[u8]) -> Result<(), SessionError> {
        let mut ptr = buffer.as_ptr() as *mut c_void;
        let mut len = buffer.len();
        // SAFETY: the pointer array holds one entry and lives across the
        // call; the request's database hold keeps the bytes alive longer
        // than this session.
        let status = unsafe { magic_load_buffers(self.cookie, &mut ptr, &mut len, 1) };
        if status == -1 {
            return Err(self.error_or("database buffer load"));
        }
        Ok(())
    }

    fn match_path(&mut self, path: &Path) -> Result<Option<Vec<u8>>, SessionError> {
        let cpath = path_to_cstring(path)?;
        // SAFETY: cpath outlives the call.
        let result = unsafe { magic_file(self.cookie, cpath.as_ptr()) };
        self.text_result(result)
    }

    fn match_buffer(&mut self, buffer: &[u8]) -> Result<Option<Vec<u8>>, SessionError> {
        // SAFETY: the buffer is only read, for the duration of the call.
        let result =
            unsafe { magic_buffer(self.cookie, buffer.as_ptr() as *const c_void, buffer.len()) };
        self.text_result(result)
    }

    #[cfg(unix)]
    fn match_descriptor(&mut self, file: &File) -> Result<Option<Vec<u8>>, SessionError> {
        use std::os::unix::io::AsRawFd;
        // SAFETY: the borrowed File keeps the descriptor open across the
        // call; libmagic reads from it without taking ownership.
        let result = unsafe { magic_descriptor(self.cookie, file.as_raw_fd()) };
        self.text_result(result)
    }

    #[cfg(not(unix))]
    fn match_descriptor(&mut self, file: &File) -> Result<Option<Vec<u8>>, SessionError> {
        // libmagic wants CRT descriptors here, which std won't hand out;
        // feeding it the bytes is equivalent, since magic_descriptor only
        // ever reads the stream.
        use std::io::Read;
        let mut data = Vec::new();
        let mut reader = file;
        reader.read_to_end(&mut data)?;
        self.match_buffer(&data)
    }
}

impl Drop for LibmagicSession {
    fn drop(&mut self) {
        // SAFETY: close runs exactly once; the cookie is not used after.
        unsafe { magic_close(self.cookie) };
    }
}

fn path_to_cstring(path: &Path) -> Result<CString, SessionError> {
    #[cfg(unix)]
    let bytes = {
        use std::os::unix::ffi::OsStrExt;
        path.as_os_str().as_bytes().to_vec()
    };
    #[cfg(not(unix))]
    let bytes = path.to_string_lossy().into_owned().into_bytes();

    CString::new(bytes).map_err(|_| {
        SessionError::Engine(format!("path {} contains a NUL byte", path.display()))
    })
}
