// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;

use super::*;
use crate::test_utils::fallback_lock;

#[test]
fn slot_set_replace_clear() {
    let _guard = fallback_lock();

    set_fallback_database(Some(Path::new("/usr/share/file/magic.mgc")));
    assert_eq!(
        fallback_database(),
        Some(PathBuf::from("/usr/share/file/magic.mgc"))
    );

    // Last writer wins.
    set_fallback_database(Some(Path::new("/opt/other.mgc")));
    assert_eq!(fallback_database(), Some(PathBuf::from("/opt/other.mgc")));

    set_fallback_database(None);
    assert_eq!(fallback_database(), None);
}

#[test]
fn default_source_resolves_to_default_then_fallback() {
    let plan = resolve(
        &DatabaseSource::Default,
        Some(PathBuf::from("/fallback.mgc")),
    );
    assert_eq!(
        plan,
        LoadPlan::Paths {
            primary: None,
            fallback: Some(PathBuf::from("/fallback.mgc")),
        }
    );
}

#[test]
fn path_source_keeps_its_primary() {
    let plan = resolve(
        &DatabaseSource::Path(PathBuf::from("/custom.mgc")),
        Some(PathBuf::from("/fallback.mgc")),
    );
    assert_eq!(
        plan,
        LoadPlan::Paths {
            primary: Some(PathBuf::from("/custom.mgc")),
            fallback: Some(PathBuf::from("/fallback.mgc")),
        }
    );
}

#[test]
fn missing_fallback_resolves_empty() {
    let plan = resolve(&DatabaseSource::Default, None);
    assert_eq!(
        plan,
        LoadPlan::Paths {
            primary: None,
            fallback: None,
        }
    );
}

#[test]
fn buffer_source_ignores_the_fallback() {
    let bytes: Arc<[u8]> = Arc::from(b"0 6162 a/b ab".as_slice());
    let plan = resolve(
        &DatabaseSource::Buffer(bytes.clone()),
        Some(PathBuf::from("/fallback.mgc")),
    );
    assert_eq!(plan, LoadPlan::Buffer(bytes));
}
