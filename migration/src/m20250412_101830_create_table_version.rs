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
                    .table(Version::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Version::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Version::ProjectId).integer().not_null())
                    .col(ColumnDef::new(Version::Name).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-version-project_id")
                            .from(Version::Table, Version::ProjectId)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-version-project_id-name-unique")
                    .table(Version::Table)
                    .col(Version::ProjectId)
                    .col(Version::Name)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Version::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Version {
    Table,
    Id,
    ProjectId,
    Name,
}

#[derive(DeriveIden)]
enum Project {
    Table,
    Id,
}
