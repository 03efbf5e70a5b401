// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::io;

use super::*;

#[test]
fn kind_maps_every_variant() {
    let open = DetectError::OpenFailed {
        message: "out of memory".into(),
    };
    assert_eq!(open.kind(), ErrorKind::OpenFailed);

    let db = DetectError::DatabaseUnavailable {
        message: "no such file".into(),
    };
    assert_eq!(db.kind(), ErrorKind::DatabaseUnavailable);

    let matched = DetectError::MatchFailed {
        message: "bad rule".into(),
    };
    assert_eq!(matched.kind(), ErrorKind::MatchFailed);

    let io_err = DetectError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
    assert_eq!(io_err.kind(), ErrorKind::Io);

    let arg = DetectError::InvalidArgument {
        reason: "target path is empty".into(),
    };
    assert_eq!(arg.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn messages_name_the_failure() {
    let err = DetectError::DatabaseUnavailable {
        message: "could not open /tmp/magic.mgc".into(),
    };
    assert_eq!(
        err.to_string(),
        "no usable signature database: could not open /tmp/magic.mgc"
    );

    let err = DetectError::InvalidArgument {
        reason: "target path is empty".into(),
    };
    assert_eq!(err.to_string(), "invalid argument: target path is empty");
}

#[test]
fn io_errors_convert_with_question_mark() {
    fn read() -> Result<(), DetectError> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))?;
        Ok(())
    }
    let err = read().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(err.to_string().contains("denied"));
}

#[test]
fn session_error_message_covers_both_sides() {
    let engine = SessionError::Engine("cannot read `bogus' (No such file or directory)".into());
    assert!(engine.message().contains("bogus"));

    let io_side = SessionError::from(io::Error::new(io::ErrorKind::NotFound, "missing"));
    assert!(io_side.message().contains("missing"));
}

#[test]
fn error_kind_serializes_snake_case() {
    let json = serde_json::to_string(&ErrorKind::DatabaseUnavailable).unwrap();
    assert_eq!(json, "\"database_unavailable\"");
}
