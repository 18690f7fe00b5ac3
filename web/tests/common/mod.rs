/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use depot_core::types::{Cli, ServerState, UploadLocks};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database};
use std::sync::Arc;
use storage::blob::BlobStore;
use tempfile::TempDir;
use tower::ServiceExt;

pub const TEST_KEY: &str = "test-secret";

pub fn create_test_cli() -> Cli {
    Cli {
        log_level: "info".to_string(),
        ip: "127.0.0.1".to_string(),
        port: 3000,
        database_url: Some("sqlite::memory:".to_string()),
        database_url_file: None,
        storage_path: "storage".to_string(),
        auth_key: Some(TEST_KEY.to_string()),
        auth_key_file: None,
        report_errors: false,
    }
}

pub async fn create_test_state() -> (Arc<ServerState>, TempDir) {
    let dir = tempfile::tempdir().unwrap();

    // A pool of one keeps every query on the same in-memory database.
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1);
    let db = Database::connect(opt).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let storage = BlobStore::new(dir.path().join("blobs")).await.unwrap();

    let state = Arc::new(ServerState {
        db,
        storage,
        uploads: UploadLocks::default(),
        auth_key: TEST_KEY.to_string(),
        cli: create_test_cli(),
    });

    (state, dir)
}

pub async fn create_test_app() -> (Router, Arc<ServerState>, TempDir) {
    let (state, dir) = create_test_state().await;
    let app = web::create_router(Arc::clone(&state));
    (app, state, dir)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, auth: Option<&str>, body: &serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(key) = auth {
        builder = builder.header("authorization", key);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn put_json(uri: &str, auth: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(key) = auth {
        builder = builder.header("authorization", key);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn post_bytes(uri: &str, auth: Option<&str>, body: &[u8]) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/octet-stream");
    if let Some(key) = auth {
        builder = builder.header("authorization", key);
    }
    builder.body(Body::from(body.to_vec())).unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

pub fn create_build_body(project: &str, version: &str, build: &str) -> serde_json::Value {
    serde_json::json!({
        "project": project,
        "version": version,
        "fileExtension": "tar.gz",
        "build": build,
        "result": "success",
        "timestamp": 1735689600i64,
        "duration": 95,
        "commits": [{
            "author": "Jane Doe",
            "email": "jane@example.com",
            "description": "Fix artifact naming",
            "hash": "0f2e9c1a8d5b4e7f0a3c6d9e2b5f8a1c4d7e0b3a",
            "timestamp": 1735689000i64,
        }],
        "metadata": {"channel": "stable"},
    })
}

/// Registers a build and returns its id.
pub async fn register_build(app: &Router, project: &str, version: &str, build: &str) -> i32 {
    let response = send(
        app,
        post_json(
            "/create",
            Some(TEST_KEY),
            &create_build_body(project, version, build),
        ),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let value: serde_json::Value = body_json(response).await;
    value["id"].as_i64().unwrap() as i32
}

/// Registers a build and uploads its artifact, returning the build id.
pub async fn upload_build(
    app: &Router,
    project: &str,
    version: &str,
    build: &str,
    data: &[u8],
) -> i32 {
    let id = register_build(app, project, version, build).await;
    let response = send(
        app,
        post_bytes(&format!("/create/upload/{}", id), Some(TEST_KEY), data),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    id
}
