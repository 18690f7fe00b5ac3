/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod consts;
pub mod database;
pub mod input;
pub mod types;

use anyhow::{Context, Result, bail};
use database::connect_db;
use input::load_secret;
use std::sync::Arc;
use storage::blob::BlobStore;
use types::*;

pub async fn init_state(cli: Cli) -> Result<Arc<ServerState>> {
    let auth_key = if let Some(file) = &cli.auth_key_file {
        load_secret(file)
    } else {
        cli.auth_key.clone().unwrap_or_default()
    };

    if auth_key.is_empty() {
        bail!("No authentication key configured");
    }

    let db = connect_db(&cli).await?;
    let storage = BlobStore::new(cli.storage_path.clone())
        .await
        .context("Failed to open storage directory")?;

    Ok(Arc::new(ServerState {
        db,
        storage,
        uploads: UploadLocks::default(),
        auth_key,
        cli,
    }))
}
