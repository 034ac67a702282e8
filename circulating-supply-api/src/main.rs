// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use crate::support::cli::Cli;
use crate::support::logging::setup_tracing_logger;
use clap::Parser;
use tracing::info;

mod accounts;
mod circulating_supply_api;
mod node_client;
mod status;
mod support;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing_logger()?;

    let args = Cli::parse();
    info!(
        "starting circulating supply api v{}",
        env!("CARGO_PKG_VERSION")
    );
    args.execute().await
}
