/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use anyhow::Error as AnyhowError;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable error body shape shared by every failing endpoint.
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub enum WebError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    InternalServerError(String),
    JsonParsing(JsonRejection),
    Internal(AnyhowError),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            WebError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            WebError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            WebError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            WebError::JsonParsing(err) => write!(f, "JSON parsing error: {}", err),
            WebError::Internal(err) => write!(f, "Internal error: {}", err),
        }
    }
}

impl std::error::Error for WebError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WebError::JsonParsing(err) => Some(err),
            WebError::Internal(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<JsonRejection> for WebError {
    fn from(err: JsonRejection) -> Self {
        WebError::JsonParsing(err)
    }
}

impl From<AnyhowError> for WebError {
    fn from(err: AnyhowError) -> Self {
        WebError::Internal(err)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            WebError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            WebError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            WebError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            WebError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            WebError::JsonParsing(err) => {
                tracing::debug!("JSON rejection: {}", err);
                (StatusCode::BAD_REQUEST, "Invalid JSON".to_string())
            }
            WebError::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}

pub type WebResult<T> = Result<T, WebError>;

// Helper constructors keeping response messages consistent across endpoints
impl WebError {
    pub fn not_found(resource: &str) -> Self {
        WebError::NotFound(format!("{} Not Found", resource))
    }

    pub fn already_exists(resource: &str) -> Self {
        WebError::BadRequest(format!("{} Already Exists", resource))
    }

    pub fn invalid(subject: &str) -> Self {
        WebError::BadRequest(format!("Invalid {}", subject))
    }

    pub fn missing_fields() -> Self {
        WebError::BadRequest("Missing Required Fields".to_string())
    }

    pub fn unauthorized() -> Self {
        WebError::Unauthorized("Unauthorized".to_string())
    }

    pub fn failed_to_store() -> Self {
        WebError::InternalServerError("Failed to Store Build".to_string())
    }

    pub fn failed_to_retrieve() -> Self {
        WebError::InternalServerError("Failed to Retrieve Build".to_string())
    }
}
