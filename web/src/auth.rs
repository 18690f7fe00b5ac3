/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use depot_core::types::ServerState;
use std::sync::Arc;

use crate::error::{WebError, WebResult};

/// Gate for write endpoints: the `Authorization` header must match the
/// configured key byte-for-byte. No mutation happens on a mismatch because
/// the handler is never reached.
pub async fn require_key(
    state: State<Arc<ServerState>>,
    req: Request,
    next: Next,
) -> WebResult<Response> {
    let supplied = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match supplied {
        Some(key) if key == state.auth_key => Ok(next.run(req).await),
        _ => Err(WebError::unauthorized()),
    }
}
