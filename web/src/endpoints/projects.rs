/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use axum::extract::{Path, State};
use axum::Json;
use depot_core::database::{list_projects, list_versions};
use depot_core::types::ServerState;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::WebResult;

#[derive(Serialize, Deserialize, Debug)]
pub struct ProjectListResponse {
    pub projects: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct VersionListResponse {
    pub project: String,
    pub versions: Vec<String>,
}

pub async fn get(state: State<Arc<ServerState>>) -> WebResult<Json<ProjectListResponse>> {
    let projects = list_projects(&state.db).await?;

    Ok(Json(ProjectListResponse { projects }))
}

pub async fn get_versions(
    state: State<Arc<ServerState>>,
    Path(project): Path<String>,
) -> WebResult<Json<VersionListResponse>> {
    let versions = list_versions(&state.db, &project).await?;

    Ok(Json(VersionListResponse { project, versions }))
}
