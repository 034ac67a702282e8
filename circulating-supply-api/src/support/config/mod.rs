// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use crate::accounts::{AccountSetKind, Address, AddressSet};
use crate::circulating_supply_api::aggregator::PartialFailurePolicy;
use crate::circulating_supply_api::calculator::Issuance;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fs, io};
use thiserror::Error;
use tracing::debug;
use url::Url;

const DEFAULT_API_DIR: &str = ".circulating-supply-api";
const DEFAULT_CONFIG_DIR: &str = "config";
const DEFAULT_CONFIG_FILENAME: &str = "config.toml";

pub(crate) const DEFAULT_HTTP_PORT: u16 = 8080;
pub(crate) const DEFAULT_NODE_URL: &str = "https://mainnet-api.voi.nodely.dev";
const DEFAULT_NODE_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// 10bn tokens with 6 decimals
pub(crate) const DEFAULT_TOTAL_ISSUANCE: u64 = 10_000_000_000 * 1_000_000;
pub(crate) const DEFAULT_DECIMALS: u32 = 6;
pub(crate) const MAX_DECIMALS: u32 = 18;
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);
const DEFAULT_FETCH_CONCURRENCY: usize = 8;
const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Derive default path to the api's config file.
/// It should get resolved to `$HOME/.circulating-supply-api/config/config.toml`
pub(crate) fn default_config_filepath() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_API_DIR)
        .join(DEFAULT_CONFIG_DIR)
        .join(DEFAULT_CONFIG_FILENAME)
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to load config file using path '{}'. detailed message: {source}", path.display())]
    ConfigLoadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file at '{}'. detailed message: {source}", path.display())]
    ConfigParseFailure {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to save config file using path '{}'. detailed message: {source}", path.display())]
    ConfigSaveFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialise the config: {0}")]
    SerializationFailure(#[from] toml::ser::Error),

    #[error("there already exists a config file at: {}. if you want to overwrite its content, use --force flag", path.display())]
    ExistingConfig { path: PathBuf },

    #[error("the total issuance must be greater than zero")]
    ZeroIssuance,

    #[error("{decimals} decimals are not supported. the maximum is {max}", max = MAX_DECIMALS)]
    UnsupportedDecimals { decimals: u32 },

    #[error("'{field}' must be greater than zero")]
    ZeroValue { field: &'static str },

    #[error("the {set} account set contains an empty address")]
    EmptyAddress { set: AccountSetKind },

    #[error("address {address} appears more than once in the {set} account set")]
    DuplicateAddress { set: AccountSetKind, address: Address },

    #[error("address {address} is present in both the locked and distributing account sets")]
    OverlappingAddress { address: Address },
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    // additional metadata holding on-disk location of this config file
    #[serde(skip)]
    pub(crate) save_path: Option<PathBuf>,

    #[serde(default)]
    pub(crate) http: Http,

    #[serde(default)]
    pub(crate) node: Node,

    #[serde(default)]
    pub(crate) supply: Supply,

    #[serde(default)]
    pub(crate) accounts: Accounts,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Http {
    /// Socket address this api will use for binding its http server.
    pub(crate) bind_address: SocketAddr,
}

impl Default for Http {
    fn default() -> Self {
        Http {
            bind_address: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_HTTP_PORT),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Node {
    /// Url of the algod node used for querying account balances.
    pub(crate) url: Url,

    /// Optional token sent in the `X-Algo-API-Token` header.
    pub(crate) api_token: Option<String>,

    /// Timeout applied to every http request made to the node.
    #[serde(with = "humantime_serde")]
    pub(crate) request_timeout: Duration,
}

impl Default for Node {
    fn default() -> Self {
        Node {
            // SAFETY: the default url is a valid, hardcoded value
            #[allow(clippy::unwrap_used)]
            url: DEFAULT_NODE_URL.parse().unwrap(),
            api_token: None,
            request_timeout: DEFAULT_NODE_REQUEST_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Supply {
    /// Total issuance of the token, in atomic units.
    pub(crate) total_issuance: u64,

    /// Number of decimal places separating atomic units from display units.
    pub(crate) decimals: u32,

    /// How long a computed snapshot is served before the balances are queried again.
    #[serde(with = "humantime_serde")]
    pub(crate) cache_ttl: Duration,

    /// Maximum number of balance queries in flight for a single account set.
    pub(crate) fetch_concurrency: usize,

    /// Upper bound on the duration of a single balance query.
    #[serde(with = "humantime_serde")]
    pub(crate) fetch_timeout: Duration,

    /// What to do when some, but not all, balances of an account set could not be fetched.
    pub(crate) partial_failure_policy: PartialFailurePolicy,
}

impl Default for Supply {
    fn default() -> Self {
        Supply {
            total_issuance: DEFAULT_TOTAL_ISSUANCE,
            decimals: DEFAULT_DECIMALS,
            cache_ttl: DEFAULT_CACHE_TTL,
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            partial_failure_policy: PartialFailurePolicy::default(),
        }
    }
}

impl Supply {
    pub(crate) fn issuance(&self) -> Issuance {
        Issuance::new(self.total_issuance.into(), self.decimals)
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Accounts {
    /// Accounts whose balances are never part of the circulating supply.
    pub(crate) locked: Vec<String>,

    /// Accounts that still hold tokens waiting to be distributed.
    pub(crate) distributing: Vec<String>,
}

impl Accounts {
    pub(crate) fn locked_set(&self) -> AddressSet {
        AddressSet::locked(self.locked.iter().map(String::as_str))
    }

    pub(crate) fn distributing_set(&self) -> AddressSet {
        AddressSet::distributing(self.distributing.iter().map(String::as_str))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        validate_set(AccountSetKind::Locked, &self.locked)?;
        let distributing = validate_set(AccountSetKind::Distributing, &self.distributing)?;

        // preserve the configured order in the error
        if let Some(overlap) = self.locked.iter().find(|a| distributing.contains(a.as_str())) {
            return Err(ConfigError::OverlappingAddress {
                address: overlap.as_str().into(),
            });
        }
        Ok(())
    }
}

fn validate_set(set: AccountSetKind, addresses: &[String]) -> Result<HashSet<&str>, ConfigError> {
    let mut seen = HashSet::with_capacity(addresses.len());
    for address in addresses {
        if address.trim().is_empty() {
            return Err(ConfigError::EmptyAddress { set });
        }
        if !seen.insert(address.as_str()) {
            return Err(ConfigError::DuplicateAddress {
                set,
                address: address.as_str().into(),
            });
        }
    }
    Ok(seen)
}

impl Config {
    pub(crate) fn new<P: AsRef<Path>>(save_path: P) -> Self {
        Config {
            save_path: Some(save_path.as_ref().to_path_buf()),
            ..Default::default()
        }
    }

    pub(crate) fn read_from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).map_err(|source| ConfigError::ConfigLoadFailure {
                path: path.to_path_buf(),
                source,
            })?;

        let mut loaded: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseFailure {
                path: path.to_path_buf(),
                source,
            })?;
        loaded.save_path = Some(path.to_path_buf());
        debug!("loaded config file from {}", path.display());
        Ok(loaded)
    }

    pub(crate) fn save_location(&self) -> PathBuf {
        self.save_path
            .clone()
            .unwrap_or_else(default_config_filepath)
    }

    pub(crate) fn save(&self) -> Result<(), ConfigError> {
        let save_location = self.save_location();
        debug!(
            "attempting to save config file to '{}'",
            save_location.display()
        );

        if let Some(parent) = save_location.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::ConfigSaveFailure {
                path: save_location.clone(),
                source,
            })?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&save_location, content).map_err(|source| ConfigError::ConfigSaveFailure {
            path: save_location,
            source,
        })
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.supply.total_issuance == 0 {
            return Err(ConfigError::ZeroIssuance);
        }
        if self.supply.decimals > MAX_DECIMALS {
            return Err(ConfigError::UnsupportedDecimals {
                decimals: self.supply.decimals,
            });
        }
        if self.supply.cache_ttl.is_zero() {
            return Err(ConfigError::ZeroValue {
                field: "supply.cache_ttl",
            });
        }
        if self.supply.fetch_timeout.is_zero() {
            return Err(ConfigError::ZeroValue {
                field: "supply.fetch_timeout",
            });
        }
        if self.supply.fetch_concurrency == 0 {
            return Err(ConfigError::ZeroValue {
                field: "supply.fetch_concurrency",
            });
        }
        if self.node.request_timeout.is_zero() {
            return Err(ConfigError::ZeroValue {
                field: "node.request_timeout",
            });
        }

        self.accounts.validate()
    }
}
