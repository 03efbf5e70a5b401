// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in prefix-signature engine.
//!
//! A deliberately small engine for hosts built without the system libmagic:
//! rules match fixed byte patterns at fixed offsets. Databases are plain
//! text, one rule per line:
//!
//! ```text
//! # offset  pattern   mime             description
//! 0         25504446  application/pdf  PDF document
//! ```
//!
//! The description field runs to the end of the line, so it may contain
//! spaces. A `-` pattern matches everything; the embedded default table
//! ends with one, mirroring the catch-all `data` classification of the
//! classic file(1) tool. The in-memory database form accepted by
//! [`EngineSession::load_buffer`] is the same text as bytes.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::decode::MATCH_DELIMITER;
use crate::error::{DetectError, SessionError};
use crate::filebuf::FileBuf;
use crate::flags::Flags;

use super::{EngineSession, SignatureEngine};

/// Embedded default signature table.
const DEFAULT_RULES: &str = "\
# offset  pattern                           mime                       description
0         25504446                          application/pdf            PDF document
0         89504e470d0a1a0a                  image/png                  PNG image data
0         474946383761                      image/gif                  GIF image data, version 87a
0         474946383961                      image/gif                  GIF image data, version 89a
0         ffd8ff                            image/jpeg                 JPEG image data
0         504b0304                          application/zip            Zip archive data
0         1f8b                              application/gzip           gzip compressed data
0         425a68                            application/x-bzip2       bzip2 compressed data
0         7f454c46                          application/x-executable   ELF binary
0         4d5a                              application/x-dosexec      MS-DOS executable
0         cafebabe                          application/x-java-applet  compiled Java class data
0         53514c69746520666f726d6174203300  application/vnd.sqlite3    SQLite 3.x database
0         0061736d                          application/wasm           WebAssembly (wasm) binary module
0         2521                              application/postscript     PostScript document text
257       7573746172                        application/x-tar          POSIX tar archive
0         -                                 application/octet-stream   data
";

/// Engine backed by the embedded table or any loaded rule text.
pub struct StubEngine;

impl StubEngine {
    pub fn new() -> StubEngine {
        StubEngine
    }
}

impl Default for StubEngine {
    fn default() -> StubEngine {
        StubEngine::new()
    }
}

impl SignatureEngine for StubEngine {
    fn open(&self, flags: Flags) -> Result<Box<dyn EngineSession>, DetectError> {
        Ok(Box::new(StubSession { flags, db: None }))
    }
}

struct Rule {
    offset: usize,
    pattern: Vec<u8>,
    mime: String,
    description: String,
}

impl Rule {
    fn matches(&self, data: &[u8]) -> bool {
        if self.pattern.is_empty() {
            return true;
        }
        let end = match self.offset.checked_add(self.pattern.len()) {
            Some(end) => end,
            None => return false,
        };
        data.get(self.offset..end) == Some(self.pattern.as_slice())
    }

    fn output(&self, flags: Flags) -> &str {
        if flags.contains(Flags::MIME_TYPE) {
            &self.mime
        } else {
            &self.description
        }
    }
}

struct SignatureDb {
    rules: Vec<Rule>,
}

impl SignatureDb {
    fn parse(text: &str) -> Result<SignatureDb, String> {
        let mut rules = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let parsed = parse_rule(line).map_err(|e| format!("line {}: {}", index + 1, e))?;
            if let Some(rule) = parsed {
                rules.push(rule);
            }
        }
        if rules.is_empty() {
            return Err("database has no rules".to_string());
        }
        Ok(SignatureDb { rules })
    }
}

fn parse_rule(line: &str) -> Result<Option<Rule>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut rest = line;
    let offset = next_token(&mut rest);
    let pattern = next_token(&mut rest);
    let mime = next_token(&mut rest);
    let description = rest.trim();
    if mime.is_empty() || description.is_empty() {
        return Err("expected `offset pattern mime description`".to_string());
    }
    let offset: usize = offset
        .parse()
        .map_err(|_| format!("invalid offset `{offset}`"))?;
    let pattern = if pattern == "-" {
        Vec::new()
    } else {
        decode_hex(pattern)?
    };
    Ok(Some(Rule {
        offset,
        pattern,
        mime: mime.to_string(),
        description: description.to_string(),
    }))
}

fn next_token<'a>(rest: &mut &'a str) -> &'a str {
    *rest = rest.trim_start();
    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let (token, tail) = rest.split_at(end);
    *rest = tail;
    token
}

fn decode_hex(text: &str) -> Result<Vec<u8>, String> {
    if text.len() % 2 != 0 {
        return Err(format!("odd-length hex pattern `{text}`"));
    }
    let mut bytes = Vec::with_capacity(text.len() / 2);
    let mut digits = text.chars();
    while let (Some(hi), Some(lo)) = (digits.next(), digits.next()) {
        let hi = hi
            .to_digit(16)
            .ok_or_else(|| format!("invalid hex pattern `{text}`"))?;
        let lo = lo
            .to_digit(16)
            .ok_or_else(|| format!("invalid hex pattern `{text}`"))?;
        bytes.push((hi * 16 + lo) as u8);
    }
    Ok(bytes)
}

struct StubSession {
    flags: Flags,
    db: Option<SignatureDb>,
}

impl StubSession {
    fn db(&self) -> Result<&SignatureDb, SessionError> {
        self.db
            .as_ref()
            .ok_or_else(|| SessionError::Engine("no database loaded".to_string()))
    }

    fn run_match(&self, data: &[u8]) -> Result<Option<Vec<u8>>, SessionError> {
        let db = self.db()?;
        if self.flags.multi_match() {
            let mut out: Option<Vec<u8>> = None;
            for rule in db.rules.iter().filter(|rule| rule.matches(data)) {
                let text = rule.output(self.flags).as_bytes();
                if let Some(joined) = &mut out {
                    joined.extend_from_slice(MATCH_DELIMITER);
                    joined.extend_from_slice(text);
                } else {
                    out = Some(text.to_vec());
                }
            }
            Ok(out)
        } else {
            Ok(db
                .rules
                .iter()
                .find(|rule| rule.matches(data))
                .map(|rule| rule.output(self.flags).as_bytes().to_vec()))
        }
    }
}

impl EngineSession for StubSession {
    fn load_default(&mut self) -> Result<(), SessionError> {
        self.db = Some(SignatureDb::parse(DEFAULT_RULES).map_err(SessionError::Engine)?);
        Ok(())
    }

    fn load_path(&mut self, path: &Path) -> Result<(), SessionError> {
        let buf = FileBuf::read(path)?;
        let text = std::str::from_utf8(buf.bytes()).map_err(|_| {
            SessionError::Engine(format!("database {} is not valid UTF-8", path.display()))
        })?;
        let db = SignatureDb::parse(text)
            .map_err(|e| SessionError::Engine(format!("database {}: {}", path.display(), e)))?;
        self.db = Some(db);
        Ok(())
    }

    fn load_buffer(&mut self, buffer: &[u8]) -> Result<(), SessionError> {
        let text = std::str::from_utf8(buffer)
            .map_err(|_| SessionError::Engine("database buffer is not valid UTF-8".to_string()))?;
        self.db = Some(SignatureDb::parse(text).map_err(SessionError::Engine)?);
        Ok(())
    }

    fn match_path(&mut self, path: &Path) -> Result<Option<Vec<u8>>, SessionError> {
        let buf = FileBuf::read(path)?;
        self.run_match(buf.bytes())
    }

    fn match_buffer(&mut self, buffer: &[u8]) -> Result<Option<Vec<u8>>, SessionError> {
        self.run_match(buffer)
    }

    fn match_descriptor(&mut self, file: &File) -> Result<Option<Vec<u8>>, SessionError> {
        let mut data = Vec::new();
        let mut reader = file;
        reader.read_to_end(&mut data)?;
        self.run_match(&data)
    }
}

#[cfg(test)]
#[path = "stub_tests.rs"]
mod tests;
