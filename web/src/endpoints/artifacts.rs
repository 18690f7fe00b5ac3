/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use async_stream::stream;
use async_trait::async_trait;
use axum::Json;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::Response;
use bytes::Bytes;
use depot_core::database::{get_build, get_build_digest, mark_ready};
use depot_core::input::parse_build_id;
use depot_core::types::ServerState;
use http_body_util::BodyExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storage::transfer::{ChunkSink, TransferError, TransferOutcome, send_blob};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::{WebError, WebResult};

/// Chunks buffered between the transfer loop and the response body before
/// the loop has to pause.
const DOWNLOAD_QUEUE_DEPTH: usize = 8;

#[derive(Serialize, Deserialize, Debug)]
pub struct UploadResponse {
    pub md5: String,
    pub sha256: String,
    pub sha512: String,
}

pub async fn post_upload(
    state: State<Arc<ServerState>>,
    Path(build): Path<String>,
    body: Body,
) -> WebResult<Json<UploadResponse>> {
    let build_id = parse_build_id(&build).map_err(|_| WebError::invalid("Build"))?;

    let digest = get_build_digest(&state.db, build_id)
        .await?
        .ok_or_else(|| WebError::not_found("Build"))?;

    // Held until the response is built; a second upload for the same build
    // cannot touch the staging file in the meantime.
    let _upload_lock = state
        .uploads
        .try_acquire(build_id)
        .ok_or_else(|| WebError::BadRequest("Upload Already In Progress".to_string()))?;

    // A repeated upload replaces the previous artifact, so its blob goes
    // first. Nothing else holds a reference by this name.
    if !digest.is_empty() {
        state.storage.remove(&digest).await.map_err(|e| {
            tracing::error!("Failed to remove stale blob {}: {}", digest, e);
            WebError::failed_to_store()
        })?;
    }

    let mut staged = state.storage.stage(build_id).await.map_err(|e| {
        tracing::error!("Failed to open staging file for build {}: {}", build_id, e);
        WebError::failed_to_store()
    })?;

    let mut body = body;
    while let Some(frame) = body.frame().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                // The client went away mid-stream; the partial staging file
                // stays behind and the next upload truncates it.
                tracing::debug!("Upload for build {} aborted: {}", build_id, e);
                drop(staged);
                return Err(WebError::BadRequest("Upload Aborted".to_string()));
            }
        };

        if let Some(chunk) = frame.data_ref() {
            staged.write_all(chunk).await.map_err(|e| {
                tracing::error!("Failed to write staging file for build {}: {}", build_id, e);
                WebError::failed_to_store()
            })?;
        }
    }

    staged.flush().await.map_err(|e| {
        tracing::error!("Failed to flush staging file for build {}: {}", build_id, e);
        WebError::failed_to_store()
    })?;
    drop(staged);

    let digests = state.storage.finalize(build_id).await.map_err(|e| {
        tracing::error!("Failed to finalize build {}: {}", build_id, e);
        WebError::failed_to_store()
    })?;

    mark_ready(&state.db, build_id, &digests).await?;

    Ok(Json(UploadResponse {
        md5: digests.md5,
        sha256: digests.sha256,
        sha512: digests.sha512,
    }))
}

/// Bounded-channel sink feeding the streaming response body. A full channel
/// pauses the transfer loop; a dropped receiver (client disconnect) cancels
/// it.
struct BodySink {
    tx: mpsc::Sender<Bytes>,
    transmitted: u64,
    cancel: CancellationToken,
}

#[async_trait]
impl ChunkSink for BodySink {
    async fn try_write(&mut self, chunk: &[u8]) -> Result<usize, TransferError> {
        match self.tx.try_reserve() {
            Ok(permit) => {
                permit.send(Bytes::copy_from_slice(chunk));
                self.transmitted += chunk.len() as u64;
                Ok(chunk.len())
            }
            Err(mpsc::error::TrySendError::Full(())) => Ok(0),
            Err(mpsc::error::TrySendError::Closed(())) => {
                self.cancel.cancel();
                Err(TransferError::Disconnected)
            }
        }
    }

    async fn writable(&mut self) -> Result<u64, TransferError> {
        match self.tx.reserve().await {
            Ok(permit) => {
                drop(permit);
                Ok(self.transmitted)
            }
            Err(_) => {
                self.cancel.cancel();
                Err(TransferError::Disconnected)
            }
        }
    }
}

pub async fn get_download(
    state: State<Arc<ServerState>>,
    Path((project, version, build)): Path<(String, String, String)>,
) -> WebResult<Response> {
    let build = get_build(&state.db, &project, &version, &build)
        .await?
        .ok_or_else(|| WebError::not_found("Build"))?;

    let size = state.storage.size(&build.md5).await.map_err(|e| {
        tracing::error!("Failed to stat blob {}: {}", build.md5, e);
        WebError::failed_to_retrieve()
    })?;
    let mut blob = state.storage.retrieve(&build.md5).await.map_err(|e| {
        tracing::error!("Failed to open blob {}: {}", build.md5, e);
        WebError::failed_to_retrieve()
    })?;

    let (tx, mut rx) = mpsc::channel::<Bytes>(DOWNLOAD_QUEUE_DEPTH);
    let cancel = CancellationToken::new();
    let mut sink = BodySink {
        tx,
        transmitted: 0,
        cancel: cancel.clone(),
    };

    let md5 = build.md5.clone();
    tokio::spawn(async move {
        match send_blob(&mut blob, size, &mut sink, &cancel).await {
            Ok(TransferOutcome::Completed) => {}
            Ok(TransferOutcome::Aborted) => {
                tracing::debug!("Download of blob {} aborted by client", md5);
            }
            Err(e) => {
                tracing::error!("Download of blob {} failed: {}", md5, e);
            }
        }
    });

    let body_stream = stream! {
        while let Some(chunk) = rx.recv().await {
            yield Ok::<Bytes, std::convert::Infallible>(chunk);
        }
    };

    let disposition = format!(
        "attachment; filename=\"{}-{}-{}.{}\"",
        project, version, build.build, build.file_extension
    );

    Response::builder()
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_LENGTH, size)
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from_stream(body_stream))
        .map_err(|e| WebError::InternalServerError(format!("Failed to build response: {}", e)))
}
