/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::input::port_in_range;
use clap::Parser;
use entity::*;
use sea_orm::DatabaseConnection;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use storage::blob::BlobStore;

#[derive(Parser, Debug)]
#[command(name = "Depot", display_name = "Depot", bin_name = "depot-server", author = "Wavelens", version, about, long_about = None)]
pub struct Cli {
    #[arg(long, env = "DEPOT_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
    #[arg(long, env = "DEPOT_IP", default_value = "127.0.0.1")]
    pub ip: String,
    #[arg(long, env = "DEPOT_PORT", value_parser = port_in_range, default_value_t = 3000)]
    pub port: u16,
    #[arg(long, env = "DEPOT_DATABASE_URL")]
    pub database_url: Option<String>,
    #[arg(long, env = "DEPOT_DATABASE_URL_FILE")]
    pub database_url_file: Option<String>,
    #[arg(long, env = "DEPOT_STORAGE_PATH", default_value = "storage")]
    pub storage_path: String,
    #[arg(long, env = "DEPOT_AUTH_KEY")]
    pub auth_key: Option<String>,
    #[arg(long, env = "DEPOT_AUTH_KEY_FILE")]
    pub auth_key_file: Option<String>,
    #[arg(long, env = "DEPOT_REPORT_ERRORS", default_value = "false")]
    pub report_errors: bool,
}

#[derive(Debug)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub storage: BlobStore,
    pub uploads: UploadLocks,
    pub auth_key: String,
    pub cli: Cli,
}

/// Per-build exclusive upload locks. Only one upload may hold the staging
/// file of a given build at a time; the registry hands out RAII guards.
#[derive(Debug, Clone, Default)]
pub struct UploadLocks {
    active: Arc<Mutex<HashSet<i32>>>,
}

#[derive(Debug)]
pub struct UploadGuard {
    active: Arc<Mutex<HashSet<i32>>>,
    build_id: i32,
}

impl UploadLocks {
    pub fn try_acquire(&self, build_id: i32) -> Option<UploadGuard> {
        let mut active = self
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if !active.insert(build_id) {
            return None;
        }

        Some(UploadGuard {
            active: Arc::clone(&self.active),
            build_id,
        })
    }
}

impl Drop for UploadGuard {
    fn drop(&mut self) {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.build_id);
    }
}

pub type EBuild = build::Entity;
pub type EProject = project::Entity;
pub type EVersion = version::Entity;

pub type MBuild = build::Model;
pub type MProject = project::Model;
pub type MVersion = version::Model;

pub type ABuild = build::ActiveModel;
pub type AProject = project::ActiveModel;
pub type AVersion = version::ActiveModel;

pub type CBuild = build::Column;
pub type CProject = project::Column;
pub type CVersion = version::Column;
