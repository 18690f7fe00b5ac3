/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use clap::Parser;
use depot_core::types::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let _sentry_guard = if cli.report_errors {
        Some(sentry::init(
            "https://19c7e4bd33a447f2a8911a1b04d7e442@reports.wavelens.io/4",
        ))
    } else {
        None
    };

    let state = match depot_core::init_state(cli).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("{:#}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Starting Depot Server on {}:{}",
        state.cli.ip,
        state.cli.port
    );

    web::serve_web(state).await
}
