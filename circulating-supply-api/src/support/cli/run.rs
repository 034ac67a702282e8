// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use crate::circulating_supply_api::SupplyService;
use crate::node_client::AlgodClient;
use crate::support::cli::{ConfigOverridableArgs, ConfigPathArgs};
use crate::support::config::Config;
use crate::support::http::state::AppState;
use crate::support::http::RouterBuilder;
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[derive(Debug, clap::Args)]
pub(crate) struct Args {
    #[command(flatten)]
    pub(crate) config: ConfigPathArgs,

    #[command(flatten)]
    pub(crate) config_override: ConfigOverridableArgs,

    /// How long the computed supply figures are served before the balances are queried again,
    /// e.g. `60s` or `5m`.
    #[clap(
        long,
        env = "CIRCULATING_SUPPLY_API_CACHE_TTL",
        value_parser = humantime_serde::re::humantime::parse_duration
    )]
    pub(crate) cache_ttl: Option<Duration>,
}

fn load_config(args: Args) -> anyhow::Result<Config> {
    let path = args.config.resolve();
    let mut config = Config::read_from_toml_file(&path)?;
    args.config_override.override_config(&mut config);
    if let Some(cache_ttl) = args.cache_ttl {
        config.supply.cache_ttl = cache_ttl
    }
    config.validate()?;
    Ok(config)
}

pub(crate) async fn execute(args: Args) -> anyhow::Result<()> {
    let config = load_config(args)?;
    info!(
        "tracking {} locked and {} distributing accounts using {}",
        config.accounts.locked.len(),
        config.accounts.distributing.len(),
        config.node.url
    );

    let node_client =
        AlgodClient::from_config(&config.node).context("failed to build the node client")?;
    let supply_service = SupplyService::from_config(&config, Arc::new(node_client));

    // prime the cache so that the first request doesn't have to wait for the node
    if let Err(err) = supply_service.refresh().await {
        warn!("failed to compute the initial supply snapshot: {err}");
    }

    let shutdown = CancellationToken::new();
    spawn_cache_invalidation_listener(supply_service.clone(), shutdown.clone())?;

    let server = RouterBuilder::with_default_routes()
        .with_state(AppState::new(supply_service))
        .build_server(&config.http.bind_address)
        .await?;
    info!("started the http server on http://{}", server.local_addr()?);

    let server_shutdown = shutdown.clone();
    let server_handle = tokio::spawn(server.run(server_shutdown.cancelled_owned()));

    wait_for_shutdown_signal().await;
    info!("shutting down the circulating supply api");
    shutdown.cancel();

    if let Err(err) = server_handle.await {
        error!("the http server task has panicked: {err}");
    }
    Ok(())
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(err) => {
            error!("failed to install the SIGTERM handler: {err}");
            wait_for_ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = wait_for_ctrl_c() => {},
        _ = sigterm.recv() => info!("received SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    wait_for_ctrl_c().await
}

async fn wait_for_ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(_) => info!("received SIGINT"),
        Err(err) => error!("failed to listen for ctrl-c: {err}"),
    }
}

// SIGHUP drops the cached snapshot so that the next request queries the node again
#[cfg(unix)]
fn spawn_cache_invalidation_listener(
    supply_service: SupplyService,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sighup =
        signal(SignalKind::hangup()).context("failed to install the SIGHUP handler")?;

    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                received = sighup.recv() => {
                    if received.is_none() {
                        break;
                    }
                    info!("received SIGHUP, invalidating the cached supply snapshot");
                    supply_service.invalidate().await;
                }
            }
        }
    });
    Ok(())
}

#[cfg(not(unix))]
fn spawn_cache_invalidation_listener(
    _supply_service: SupplyService,
    _shutdown: CancellationToken,
) -> anyhow::Result<()> {
    Ok(())
}
