/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod artifacts;
pub mod builds;
pub mod projects;

use crate::error::{WebError, WebResult};
use axum::extract::Json;
use serde_json::{Value as JsonValue, json};

pub async fn handle_404() -> WebError {
    WebError::NotFound("Not Found".to_string())
}

pub async fn get_health() -> WebResult<Json<JsonValue>> {
    Ok(Json(json!({"status": "ok"})))
}
