/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod auth;
pub mod endpoints;
pub mod error;

use axum::routing::{get, post, put};
use axum::{Router, middleware};
use depot_core::types::ServerState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/create", post(endpoints::builds::post))
        .route(
            "/create/upload/{build}",
            post(endpoints::artifacts::post_upload),
        )
        .route(
            "/v2/{project}/{version}/{build}/metadata",
            put(endpoints::builds::put_metadata),
        )
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth::require_key,
        ))
        .route("/v2", get(endpoints::projects::get))
        .route("/v2/{project}", get(endpoints::projects::get_versions))
        .route(
            "/v2/{project}/{version}",
            get(endpoints::builds::get_all),
        )
        .route(
            "/v2/{project}/{version}/{build}",
            get(endpoints::builds::get),
        )
        .route(
            "/v2/{project}/{version}/{build}/download",
            get(endpoints::artifacts::get_download),
        )
        .route("/health", get(endpoints::get_health))
        .fallback(endpoints::handle_404)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve_web(state: Arc<ServerState>) -> std::io::Result<()> {
    let server_url = format!("{}:{}", state.cli.ip, state.cli.port);
    let app = create_router(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind(&server_url).await?;
    tracing::info!("Listening on {}", server_url);
    axum::serve(listener, app).await
}
