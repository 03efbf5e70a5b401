// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Decoding of raw engine output into detection results.
//!
//! In multi-match mode the engine joins every matching description with the
//! literal three-byte delimiter `"\n- "`. The decoder splits on that exact
//! sequence. The raw format has no escaping, so a description that happens
//! to contain the delimiter splits too; this layer preserves that rule
//! instead of inventing one.

use memchr::memmem;

use crate::error::DetectError;
use crate::flags::Flags;
use crate::request::Detection;

/// Delimiter between successive matches in raw multi-match output:
/// newline, hyphen, space.
pub(crate) const MATCH_DELIMITER: &[u8] = b"\n- ";

/// Split raw multi-match output into ordered match segments.
///
/// A segment before a delimiter occurrence is kept even when empty; the
/// tail after the last delimiter is kept only when non-empty. Input with
/// no delimiter at all is a single segment.
pub(crate) fn split_matches(raw: &[u8]) -> Vec<&[u8]> {
    let mut segments = Vec::new();
    let mut start = 0;
    for hit in memmem::find_iter(raw, MATCH_DELIMITER) {
        segments.push(&raw[start..hit]);
        start = hit + MATCH_DELIMITER.len();
    }
    if start < raw.len() {
        segments.push(&raw[start..]);
    }
    segments
}

/// Convert an engine's raw output into a [`Detection`] according to the
/// request's snapshot flags.
///
/// Single-match mode passes the text through whole; an absent result is a
/// match failure, since the engine raised no diagnostic to explain it.
/// Multi-match mode decodes the delimited list, where an absent result is
/// simply an empty list. Bytes are converted lossily, so an engine emitting
/// non-UTF-8 descriptions degrades to replacement characters rather than
/// failing the request.
pub(crate) fn decode_result(
    flags: Flags,
    raw: Option<Vec<u8>>,
) -> Result<Detection, DetectError> {
    if flags.multi_match() {
        let raw = raw.unwrap_or_default();
        let matches = split_matches(&raw)
            .into_iter()
            .map(|segment| String::from_utf8_lossy(segment).into_owned())
            .collect();
        Ok(Detection::Multiple(matches))
    } else {
        match raw {
            Some(bytes) => Ok(Detection::Single(
                String::from_utf8_lossy(&bytes).into_owned(),
            )),
            None => Err(DetectError::MatchFailed {
                message: "engine produced no result".to_string(),
            }),
        }
    }
}

#[cfg(test)]
#[path = "decode_tests.rs"]
mod tests;
