/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use depot_core::consts::LATEST_LABEL;
use depot_core::database::{
    CreateOutcome, NewBuild, create_build, get_build, get_build_by_label, list_ready_builds,
    update_metadata,
};
use depot_core::types::{MBuild, ServerState};
use entity::build::Commit;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;

use crate::error::{WebError, WebResult};

const REQUIRED_FIELDS: [&str; 9] = [
    "project",
    "version",
    "fileExtension",
    "build",
    "result",
    "timestamp",
    "duration",
    "commits",
    "metadata",
];

#[derive(Debug, Clone)]
pub struct CreateBuildRequest {
    pub project: String,
    pub version: String,
    pub file_extension: String,
    pub build: String,
    pub result: String,
    pub timestamp: i64,
    pub duration: i32,
    pub commits: Vec<Commit>,
    pub metadata: JsonValue,
}

fn string_field(object: &Map<String, JsonValue>, field: &str) -> WebResult<String> {
    object
        .get(field)
        .and_then(JsonValue::as_str)
        .map(str::to_string)
        .ok_or_else(WebError::missing_fields)
}

impl CreateBuildRequest {
    /// Validates the request shape before anything touches the database:
    /// all top-level fields, then every field of every commit.
    pub fn parse(value: &JsonValue) -> WebResult<Self> {
        let object = value.as_object().ok_or_else(WebError::missing_fields)?;

        for field in REQUIRED_FIELDS {
            if !object.contains_key(field) {
                return Err(WebError::missing_fields());
            }
        }

        let timestamp = object
            .get("timestamp")
            .and_then(JsonValue::as_i64)
            .ok_or_else(WebError::missing_fields)?;
        let duration = object
            .get("duration")
            .and_then(JsonValue::as_i64)
            .and_then(|d| i32::try_from(d).ok())
            .ok_or_else(WebError::missing_fields)?;

        let mut commits = Vec::new();
        for commit in object
            .get("commits")
            .and_then(JsonValue::as_array)
            .ok_or_else(|| WebError::invalid("Commit"))?
        {
            let commit: Commit = serde_json::from_value(commit.clone())
                .map_err(|_| WebError::invalid("Commit"))?;
            commits.push(commit);
        }

        Ok(CreateBuildRequest {
            project: string_field(object, "project")?,
            version: string_field(object, "version")?,
            file_extension: string_field(object, "fileExtension")?,
            build: string_field(object, "build")?,
            result: string_field(object, "result")?,
            timestamp,
            duration,
            commits,
            metadata: object
                .get("metadata")
                .cloned()
                .ok_or_else(WebError::missing_fields)?,
        })
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateBuildResponse {
    pub id: i32,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct BuildRecord {
    pub project: String,
    pub version: String,
    pub build: String,
    pub result: String,
    pub timestamp: i64,
    pub duration: i32,
    pub md5: String,
    pub sha256: String,
    pub sha512: String,
    pub commits: JsonValue,
    pub metadata: JsonValue,
}

impl BuildRecord {
    pub fn from_model(project: &str, version: &str, build: MBuild) -> Self {
        BuildRecord {
            project: project.to_string(),
            version: version.to_string(),
            build: build.build,
            result: build.result,
            timestamp: build.timestamp,
            duration: build.duration,
            md5: build.md5,
            sha256: build.sha256,
            sha512: build.sha512,
            commits: build.commits,
            metadata: build.metadata,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct BuildList {
    pub latest: BuildRecord,
    pub all: Vec<BuildRecord>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct BuildListResponse {
    pub project: String,
    pub version: String,
    pub builds: BuildList,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MetadataUpdateResponse {
    pub success: bool,
}

pub async fn post(
    state: State<Arc<ServerState>>,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> WebResult<Json<CreateBuildResponse>> {
    let Json(value) = payload?;
    let request = CreateBuildRequest::parse(&value)?;

    if request.build == LATEST_LABEL {
        return Err(WebError::invalid("Build Label"));
    }

    let input = NewBuild {
        project: request.project,
        version: request.version,
        file_extension: request.file_extension,
        label: request.build,
        result: request.result,
        timestamp: request.timestamp,
        duration: request.duration,
        commits: serde_json::to_value(&request.commits)
            .map_err(|e| WebError::Internal(e.into()))?,
        metadata: request.metadata,
    };

    match create_build(&state.db, input).await? {
        CreateOutcome::AlreadyExists => Err(WebError::already_exists("Build")),
        CreateOutcome::Created(id) => Ok(Json(CreateBuildResponse { id })),
    }
}

pub async fn get_all(
    state: State<Arc<ServerState>>,
    Path((project, version)): Path<(String, String)>,
) -> WebResult<Json<BuildListResponse>> {
    let builds = list_ready_builds(&state.db, &project, &version).await?;

    let latest = match builds.last() {
        Some(latest) => BuildRecord::from_model(&project, &version, latest.clone()),
        None => return Err(WebError::not_found("Version")),
    };

    let all = builds
        .into_iter()
        .map(|b| BuildRecord::from_model(&project, &version, b))
        .collect();

    Ok(Json(BuildListResponse {
        project,
        version,
        builds: BuildList { latest, all },
    }))
}

pub async fn get(
    state: State<Arc<ServerState>>,
    Path((project, version, build)): Path<(String, String, String)>,
) -> WebResult<Json<BuildRecord>> {
    let build = get_build(&state.db, &project, &version, &build)
        .await?
        .ok_or_else(|| WebError::not_found("Build"))?;

    Ok(Json(BuildRecord::from_model(&project, &version, build)))
}

pub async fn put_metadata(
    state: State<Arc<ServerState>>,
    Path((project, version, build)): Path<(String, String, String)>,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> WebResult<Json<MetadataUpdateResponse>> {
    // The sentinel is deliberately not resolved here; metadata is only
    // replaceable through the exact label.
    let build = get_build_by_label(&state.db, &project, &version, &build)
        .await?
        .ok_or_else(|| WebError::not_found("Build"))?;

    let Json(metadata) = payload?;
    update_metadata(&state.db, build.id, metadata).await?;

    Ok(Json(MetadataUpdateResponse { success: true }))
}
