/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use anyhow::{Context, Result};
use migration::Migrator;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectOptions, ConnectionTrait,
    Database, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use sea_orm_migration::prelude::*;
use serde_json::Value as JsonValue;
use std::time::Duration;
use storage::digest::FileDigests;
use tracing::log::LevelFilter;

use super::consts::{DEFAULT_DATABASE_URL, LATEST_LABEL};
use super::types::*;

pub async fn connect_db(cli: &Cli) -> Result<DatabaseConnection> {
    let db_url = if let Some(file) = &cli.database_url_file {
        std::fs::read_to_string(file)
            .context("Failed to read database url from file")?
            .trim()
            .to_string()
    } else if let Some(url) = &cli.database_url {
        url.clone()
    } else {
        DEFAULT_DATABASE_URL.to_string()
    };

    let mut opt = ConnectOptions::new(db_url);

    if cli.log_level == "debug" {
        opt.sqlx_logging(true)
            .sqlx_logging_level(LevelFilter::Debug);
    } else {
        opt.sqlx_logging(false);
    }

    opt.max_connections(16)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8));

    let db = Database::connect(opt)
        .await
        .context("Failed to connect to database")?;
    Migrator::up(&db, None)
        .await
        .context("Failed to run database migrations")?;

    Ok(db)
}

/// Fields for a new build row; digests start empty and `ready` false.
#[derive(Debug, Clone)]
pub struct NewBuild {
    pub project: String,
    pub version: String,
    pub file_extension: String,
    pub label: String,
    pub result: String,
    pub timestamp: i64,
    pub duration: i32,
    pub commits: JsonValue,
    pub metadata: JsonValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(i32),
    /// The label is already taken within the version; nothing was written.
    AlreadyExists,
}

async fn ensure_project<C: ConnectionTrait>(db: &C, name: &str) -> Result<MProject> {
    let aproject = AProject {
        name: Set(name.to_string()),
        ..Default::default()
    };

    EProject::insert(aproject)
        .on_conflict(OnConflict::column(CProject::Name).do_nothing().to_owned())
        .exec_without_returning(db)
        .await
        .context("Failed to insert project")?;

    EProject::find()
        .filter(CProject::Name.eq(name))
        .one(db)
        .await
        .context("Failed to query project")?
        .context("Project missing after insert")
}

async fn ensure_version<C: ConnectionTrait>(
    db: &C,
    project_id: i32,
    name: &str,
) -> Result<MVersion> {
    let aversion = AVersion {
        project_id: Set(project_id),
        name: Set(name.to_string()),
        ..Default::default()
    };

    EVersion::insert(aversion)
        .on_conflict(
            OnConflict::columns([CVersion::ProjectId, CVersion::Name])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await
        .context("Failed to insert version")?;

    EVersion::find()
        .filter(
            Condition::all()
                .add(CVersion::ProjectId.eq(project_id))
                .add(CVersion::Name.eq(name)),
        )
        .one(db)
        .await
        .context("Failed to query version")?
        .context("Version missing after insert")
}

/// Registers a build, creating its project and version on first reference.
/// The whole sequence runs in one transaction so a concurrent create cannot
/// observe a half-built hierarchy or slip in a duplicate label.
pub async fn create_build(db: &DatabaseConnection, input: NewBuild) -> Result<CreateOutcome> {
    let txn = db.begin().await.context("Failed to open transaction")?;

    let project = ensure_project(&txn, &input.project).await?;
    let version = ensure_version(&txn, project.id, &input.version).await?;

    let existing = EBuild::find()
        .filter(
            Condition::all()
                .add(CBuild::VersionId.eq(version.id))
                .add(CBuild::Build.eq(input.label.clone())),
        )
        .one(&txn)
        .await
        .context("Failed to query build")?;

    if existing.is_some() {
        txn.rollback().await.context("Failed to roll back")?;
        return Ok(CreateOutcome::AlreadyExists);
    }

    let abuild = ABuild {
        version_id: Set(version.id),
        ready: Set(false),
        file_extension: Set(input.file_extension),
        build: Set(input.label),
        result: Set(input.result),
        timestamp: Set(input.timestamp),
        duration: Set(input.duration),
        commits: Set(input.commits),
        metadata: Set(input.metadata),
        md5: Set(String::new()),
        sha256: Set(String::new()),
        sha512: Set(String::new()),
        ..Default::default()
    };

    let inserted = EBuild::insert(abuild)
        .exec(&txn)
        .await
        .context("Failed to insert build")?;

    txn.commit().await.context("Failed to commit build")?;

    Ok(CreateOutcome::Created(inserted.last_insert_id))
}

pub async fn get_project_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<MProject>> {
    EProject::find()
        .filter(CProject::Name.eq(name))
        .one(db)
        .await
        .context("Failed to query project")
}

pub async fn get_version_by_name(
    db: &DatabaseConnection,
    project: &str,
    version: &str,
) -> Result<Option<MVersion>> {
    match get_project_by_name(db, project).await? {
        Some(p) => EVersion::find()
            .filter(
                Condition::all()
                    .add(CVersion::ProjectId.eq(p.id))
                    .add(CVersion::Name.eq(version)),
            )
            .one(db)
            .await
            .context("Failed to query version"),
        None => Ok(None),
    }
}

pub async fn list_projects(db: &DatabaseConnection) -> Result<Vec<String>> {
    let projects = EProject::find()
        .order_by_asc(CProject::Id)
        .all(db)
        .await
        .context("Failed to query projects")?;

    Ok(projects.into_iter().map(|p| p.name).collect())
}

pub async fn list_versions(db: &DatabaseConnection, project: &str) -> Result<Vec<String>> {
    let project = match get_project_by_name(db, project).await? {
        Some(p) => p,
        None => return Ok(Vec::new()),
    };

    let versions = EVersion::find()
        .filter(CVersion::ProjectId.eq(project.id))
        .order_by_asc(CVersion::Id)
        .all(db)
        .await
        .context("Failed to query versions")?;

    Ok(versions.into_iter().map(|v| v.name).collect())
}

/// Ready builds of a version, creation order; the last entry is "latest".
pub async fn list_ready_builds(
    db: &DatabaseConnection,
    project: &str,
    version: &str,
) -> Result<Vec<MBuild>> {
    let version = match get_version_by_name(db, project, version).await? {
        Some(v) => v,
        None => return Ok(Vec::new()),
    };

    EBuild::find()
        .filter(
            Condition::all()
                .add(CBuild::VersionId.eq(version.id))
                .add(CBuild::Ready.eq(true)),
        )
        .order_by_asc(CBuild::Id)
        .all(db)
        .await
        .context("Failed to query builds")
}

pub async fn get_build_by_label(
    db: &DatabaseConnection,
    project: &str,
    version: &str,
    label: &str,
) -> Result<Option<MBuild>> {
    let version = match get_version_by_name(db, project, version).await? {
        Some(v) => v,
        None => return Ok(None),
    };

    EBuild::find()
        .filter(
            Condition::all()
                .add(CBuild::VersionId.eq(version.id))
                .add(CBuild::Build.eq(label))
                .add(CBuild::Ready.eq(true)),
        )
        .one(db)
        .await
        .context("Failed to query build")
}

pub async fn get_latest_build(
    db: &DatabaseConnection,
    project: &str,
    version: &str,
) -> Result<Option<MBuild>> {
    let version = match get_version_by_name(db, project, version).await? {
        Some(v) => v,
        None => return Ok(None),
    };

    EBuild::find()
        .filter(
            Condition::all()
                .add(CBuild::VersionId.eq(version.id))
                .add(CBuild::Ready.eq(true)),
        )
        .order_by_desc(CBuild::Id)
        .one(db)
        .await
        .context("Failed to query build")
}

/// Resolves a build selector; the reserved label `"latest"` picks the most
/// recently created ready build.
pub async fn get_build(
    db: &DatabaseConnection,
    project: &str,
    version: &str,
    selector: &str,
) -> Result<Option<MBuild>> {
    if selector == LATEST_LABEL {
        get_latest_build(db, project, version).await
    } else {
        get_build_by_label(db, project, version, selector).await
    }
}

pub async fn get_build_digest(db: &DatabaseConnection, build_id: i32) -> Result<Option<String>> {
    EBuild::find_by_id(build_id)
        .select_only()
        .column(CBuild::Md5)
        .into_tuple::<String>()
        .one(db)
        .await
        .context("Failed to query build digest")
}

/// Flips a build to ready and records its digests. The transition is
/// one-way; nothing ever resets `ready`.
pub async fn mark_ready(
    db: &DatabaseConnection,
    build_id: i32,
    digests: &FileDigests,
) -> Result<()> {
    let abuild = ABuild {
        id: Set(build_id),
        ready: Set(true),
        md5: Set(digests.md5.clone()),
        sha256: Set(digests.sha256.clone()),
        sha512: Set(digests.sha512.clone()),
        ..Default::default()
    };

    abuild
        .update(db)
        .await
        .context("Failed to mark build ready")?;

    Ok(())
}

pub async fn update_metadata(
    db: &DatabaseConnection,
    build_id: i32,
    metadata: JsonValue,
) -> Result<()> {
    let abuild = ABuild {
        id: Set(build_id),
        metadata: Set(metadata),
        ..Default::default()
    };

    abuild
        .update(db)
        .await
        .context("Failed to update build metadata")?;

    Ok(())
}
