/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Build::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Build::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Build::VersionId).integer().not_null())
                    .col(ColumnDef::new(Build::Ready).boolean().not_null())
                    .col(ColumnDef::new(Build::FileExtension).string().not_null())
                    .col(ColumnDef::new(Build::Build).string().not_null())
                    .col(ColumnDef::new(Build::Result).string().not_null())
                    .col(ColumnDef::new(Build::Timestamp).big_integer().not_null())
                    .col(ColumnDef::new(Build::Duration).integer().not_null())
                    .col(ColumnDef::new(Build::Commits).json().not_null())
                    .col(ColumnDef::new(Build::Metadata).json().not_null())
                    .col(ColumnDef::new(Build::Md5).string_len(32).not_null())
                    .col(ColumnDef::new(Build::Sha256).string_len(64).not_null())
                    .col(ColumnDef::new(Build::Sha512).string_len(128).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-build-version_id")
                            .from(Build::Table, Build::VersionId)
                            .to(Version::Table, Version::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Build::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Build {
    Table,
    Id,
    VersionId,
    Ready,
    FileExtension,
    Build,
    Result,
    Timestamp,
    Duration,
    Commits,
    Metadata,
    Md5,
    Sha256,
    Sha512,
}

#[derive(DeriveIden)]
enum Version {
    Table,
    Id,
}
