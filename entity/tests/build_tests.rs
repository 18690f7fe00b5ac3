/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Tests for build entity

use entity::*;
use sea_orm::{DatabaseBackend, MockDatabase, entity::prelude::*};
use serde_json::json;

#[tokio::test]
async fn test_build_entity_round_trip() -> Result<(), DbErr> {
    let db = MockDatabase::new(DatabaseBackend::Sqlite)
        .append_query_results([vec![build::Model {
            id: 7,
            version_id: 2,
            ready: true,
            file_extension: "tar.gz".to_owned(),
            build: "42".to_owned(),
            result: "success".to_owned(),
            timestamp: 1735689600,
            duration: 95,
            commits: json!([{
                "author": "Jane Doe",
                "email": "jane@example.com",
                "description": "Fix artifact naming",
                "hash": "0f2e9c1a8d5b4e7f0a3c6d9e2b5f8a1c4d7e0b3a",
                "timestamp": 1735689000,
            }]),
            metadata: json!({"channel": "stable"}),
            md5: "cb08ca4a7bb5f9683c19133a84872ca7".to_owned(),
            sha256: "e12e115acf4552b2568b55e93cbd39394c4ef81c82447fafc997882a02d23677"
                .to_owned(),
            sha512: "49ec55bd83fcd67838e3d385ce831669e3f815a7f44b7aa5f8d52b5d42354c46d89c8b9d06e47a797ae4fbd22291be15bcc35b07735c4a6f92357f93d5a33d9b"
                .to_owned(),
        }]])
        .into_connection();

    let build = build::Entity::find_by_id(7)
        .one(&db)
        .await?
        .expect("build should exist");

    assert!(build.ready);
    assert_eq!(build.build, "42");
    assert_eq!(build.version_id, 2);
    assert_eq!(build.md5, "cb08ca4a7bb5f9683c19133a84872ca7");

    let commits: Vec<build::Commit> = serde_json::from_value(build.commits).unwrap();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].author, "Jane Doe");

    Ok(())
}

#[test]
fn test_commit_requires_all_fields() {
    let missing_email = json!({
        "author": "Jane Doe",
        "description": "Fix artifact naming",
        "hash": "0f2e9c1a8d5b4e7f0a3c6d9e2b5f8a1c4d7e0b3a",
        "timestamp": 1735689000,
    });

    assert!(serde_json::from_value::<build::Commit>(missing_email).is_err());

    let complete = json!({
        "author": "Jane Doe",
        "email": "jane@example.com",
        "description": "Fix artifact naming",
        "hash": "0f2e9c1a8d5b4e7f0a3c6d9e2b5f8a1c4d7e0b3a",
        "timestamp": 1735689000,
    });

    assert!(serde_json::from_value::<build::Commit>(complete).is_ok());
}

#[test]
fn test_commit_tolerates_extra_fields() {
    let with_extra = json!({
        "author": "Jane Doe",
        "email": "jane@example.com",
        "description": "Fix artifact naming",
        "hash": "0f2e9c1a8d5b4e7f0a3c6d9e2b5f8a1c4d7e0b3a",
        "timestamp": 1735689000,
        "branch": "main",
    });

    let commit: build::Commit = serde_json::from_value(with_extra).unwrap();
    assert_eq!(commit.email, "jane@example.com");
}
