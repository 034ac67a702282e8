// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use crate::support::cli::{ConfigOverridableArgs, ConfigPathArgs};
use crate::support::config::{Config, ConfigError};
use tracing::info;

#[derive(Debug, clap::Args)]
pub(crate) struct Args {
    #[command(flatten)]
    pub(crate) config: ConfigPathArgs,

    #[command(flatten)]
    pub(crate) config_override: ConfigOverridableArgs,

    /// Overwrite existing configuration file.
    #[clap(long, short)]
    pub(crate) force: bool,
}

pub(crate) fn execute(args: Args) -> Result<(), ConfigError> {
    let path = args.config.resolve();

    if path.exists() && !args.force {
        return Err(ConfigError::ExistingConfig { path });
    }

    let mut config = Config::new(&path);
    args.config_override.override_config(&mut config);
    config.validate()?;
    config.save()?;

    info!("saved the default configuration to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_for(path: &std::path::Path, force: bool) -> Args {
        Args {
            config: ConfigPathArgs {
                config_path: Some(path.to_path_buf()),
            },
            config_override: ConfigOverridableArgs {
                node_url: Some("http://localhost:4001".parse().unwrap()),
                bind_address: None,
            },
            force,
        }
    }

    #[test]
    fn writes_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        execute(args_for(&path, false)).unwrap();

        let loaded = Config::read_from_toml_file(&path).unwrap();
        assert_eq!(loaded.node.url.as_str(), "http://localhost:4001/");
        assert_eq!(loaded.supply, Config::default().supply);
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        let err = execute(args_for(&path, false)).unwrap_err();
        assert!(matches!(err, ConfigError::ExistingConfig { .. }));

        execute(args_for(&path, true)).unwrap();
        assert!(Config::read_from_toml_file(&path).is_ok());
    }
}
