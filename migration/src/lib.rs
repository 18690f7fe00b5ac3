/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub use sea_orm_migration::prelude::*;

mod m20250412_101500_create_table_project;
mod m20250412_101830_create_table_version;
mod m20250412_102200_create_table_build;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250412_101500_create_table_project::Migration),
            Box::new(m20250412_101830_create_table_version::Migration),
            Box::new(m20250412_102200_create_table_build::Migration),
        ]
    }
}
