// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use crate::error::ErrorKind;
use crate::test_utils::ScriptedEngine;

#[test]
fn new_uses_platform_default_flags() {
    let detector = Detector::new();
    assert_eq!(detector.flags(), Flags::default());
    assert!(matches!(detector.source(), DatabaseSource::Default));
}

#[test]
fn continue_forces_raw_at_construction() {
    let detector = Detector::with_flags(Flags::CONTINUE);
    assert!(detector.flags().contains(Flags::CONTINUE));
    assert!(detector.flags().contains(Flags::RAW));
}

#[test]
fn other_flags_pass_through_unchanged() {
    let detector = Detector::with_flags(Flags::MIME);
    assert_eq!(detector.flags(), Flags::MIME);
}

#[test]
fn database_path_is_recorded() {
    let detector = Detector::with_database("/share/custom.magic", Flags::NONE);
    match detector.source() {
        DatabaseSource::Path(path) => assert_eq!(path, Path::new("/share/custom.magic")),
        other => panic!("unexpected source: {other:?}"),
    }
}

#[test]
fn empty_target_path_is_rejected_synchronously() {
    let detector = Detector::new();
    let err = detector.file_request("").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn requests_snapshot_the_detector_configuration() {
    let detector = Detector::with_flags(Flags::MIME_TYPE);
    let request = detector.file_request("/tmp/example.bin").unwrap();
    drop(detector);
    // The request carries its own copies.
    assert_eq!(request.flags, Flags::MIME_TYPE);
    assert!(matches!(request.source, DatabaseSource::Default));
}

#[test]
fn buffer_database_is_shared_not_copied() {
    let table: Arc<[u8]> = Arc::from(b"0 6162 a/b ab".as_slice());
    let detector = Detector::with_database_buffer(table.clone(), Flags::NONE);

    let request = detector.buffer_request(b"ab".as_slice());
    match &request.source {
        DatabaseSource::Buffer(held) => assert!(Arc::ptr_eq(held, &table)),
        other => panic!("unexpected source: {other:?}"),
    }
}

#[test]
fn custom_engine_is_carried_into_requests() {
    let engine = Arc::new(ScriptedEngine::new());
    let detector = Detector::with_engine(engine, DatabaseSource::Default, Flags::NONE);
    let request = detector.buffer_request(b"xyz".as_slice());
    // Session opens go to the scripted engine, not the built-in default.
    assert!(request.engine.open(Flags::NONE).is_ok());
}

#[test]
fn clones_share_the_engine() {
    let detector = Detector::new();
    let clone = detector.clone();
    assert_eq!(detector.flags(), clone.flags());
    assert!(Arc::ptr_eq(&detector.engine(), &clone.engine()));
}

#[test]
fn debug_omits_engine_internals() {
    let text = format!("{:?}", Detector::new());
    assert!(text.contains("source"), "got: {text}");
    assert!(text.contains(".."), "got: {text}");
}
