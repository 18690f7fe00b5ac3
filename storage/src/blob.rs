/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;

use super::digest::{FileDigests, digest_file};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("blob not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Content-addressed file store backed by a single flat directory.
///
/// Finished blobs are named by the MD5 hex digest of their contents; while an
/// upload is in flight the file is named by the numeric build id instead.
/// There is no reference counting: replacing a build's artifact deletes the
/// previous blob by name even if a byte-identical sibling build still points
/// at it.
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn entry_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn staging_path(&self, build_id: i32) -> PathBuf {
        self.root.join(build_id.to_string())
    }

    /// Opens a fresh staging file for the given build, truncating any
    /// leftover partial from an aborted upload.
    pub async fn stage(&self, build_id: i32) -> Result<fs::File, StorageError> {
        Ok(fs::File::create(self.staging_path(build_id)).await?)
    }

    /// Closes out a staged upload: re-reads the staged file through the
    /// digest pass, then moves it to its content address. An existing blob
    /// under that digest is deleted before the rename.
    pub async fn finalize(&self, build_id: i32) -> Result<FileDigests, StorageError> {
        let staged = self.staging_path(build_id);
        let digests = digest_file(&staged).await?;

        let target = self.entry_path(&digests.md5);
        match fs::remove_file(&target).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        fs::rename(&staged, &target).await?;

        Ok(digests)
    }

    /// Deletes the blob if present; absent blobs are not an error.
    pub async fn remove(&self, digest: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.entry_path(digest)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn retrieve(&self, digest: &str) -> Result<fs::File, StorageError> {
        match fs::File::open(self.entry_path(digest)).await {
            Ok(file) => Ok(file),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(digest.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn size(&self, digest: &str) -> Result<u64, StorageError> {
        match fs::metadata(self.entry_path(digest)).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(digest.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
