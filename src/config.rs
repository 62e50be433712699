use std::{
    net::{IpAddr, Ipv4Addr},
    path::PathBuf,
};

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub database_location: PathBuf,
    pub listen_address:    IpAddr,
    pub port:              u16,
    pub log_level:         String,
}

impl Config {
    pub fn default_as_string() -> Result<String> {
        Ok(toml::to_string(&Self::default())?)
    }

    pub fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("TUNR_"))
    }

    pub fn read_config() -> Result<Self> {
        Ok(Self::figment().extract()?)
    }

    /// [Config::database_location] with a leading `~` expanded.
    pub fn database_path(&self) -> PathBuf {
        shellexpand::path::tilde(&self.database_location).into_owned()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_location: PathBuf::from("~/.local/share/tunr/catalog.db"),
            listen_address:    IpAddr::V4(Ipv4Addr::LOCALHOST),
            port:              3000,
            log_level:         "info".into(),
        }
    }
}
