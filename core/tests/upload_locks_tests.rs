/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Tests for the per-build upload lock registry

extern crate core as depot_core;
use depot_core::types::UploadLocks;

#[test]
fn test_second_acquire_for_same_build_fails() {
    let locks = UploadLocks::default();

    let guard = locks.try_acquire(7);
    assert!(guard.is_some());
    assert!(locks.try_acquire(7).is_none());

    // A different build is unaffected.
    assert!(locks.try_acquire(8).is_some());
}

#[test]
fn test_dropping_the_guard_releases_the_build() {
    let locks = UploadLocks::default();

    let guard = locks.try_acquire(7);
    drop(guard);

    assert!(locks.try_acquire(7).is_some());
}

#[test]
fn test_clones_share_the_registry() {
    let locks = UploadLocks::default();
    let clone = locks.clone();

    let _guard = locks.try_acquire(7);
    assert!(clone.try_acquire(7).is_none());
}
