// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use crate::support::config::{default_config_filepath, Config};
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use url::Url;

pub(crate) mod init;
pub(crate) mod run;

#[derive(Parser, Debug)]
#[clap(author = "Nymtech", version, about)]
pub(crate) struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

impl Cli {
    pub(crate) async fn execute(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Init(args) => init::execute(args)?,
            Commands::Run(args) => run::execute(args).await?,
        }
        Ok(())
    }
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Initialise the circulating supply api with a default config file.
    Init(init::Args),

    /// Run the circulating supply api with the provided configuration.
    Run(run::Args),
}

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct ConfigOverridableArgs {
    /// Url of the algod node used for querying account balances.
    #[clap(long, env = "CIRCULATING_SUPPLY_API_NODE_URL")]
    pub(crate) node_url: Option<Url>,

    /// Socket address the http server will bind to.
    /// default: `0.0.0.0:8080`
    #[clap(long, env = "CIRCULATING_SUPPLY_API_BIND_ADDRESS")]
    pub(crate) bind_address: Option<SocketAddr>,
}

impl ConfigOverridableArgs {
    pub(crate) fn override_config(self, config: &mut Config) {
        if let Some(node_url) = self.node_url {
            config.node.url = node_url
        }

        if let Some(bind_address) = self.bind_address {
            config.http.bind_address = bind_address
        }
    }
}

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct ConfigPathArgs {
    /// Path to the config file of the api.
    /// default: `$HOME/.circulating-supply-api/config/config.toml`
    #[clap(long, env = "CIRCULATING_SUPPLY_API_CONFIG_PATH")]
    pub(crate) config_path: Option<PathBuf>,
}

impl ConfigPathArgs {
    pub(crate) fn resolve(&self) -> PathBuf {
        self.config_path
            .clone()
            .unwrap_or_else(default_config_filepath)
    }
}
