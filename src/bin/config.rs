use countries::{ApiSettings, LookupSettings, MapSettings};
use once_cell::sync::Lazy;
use serde_derive::Deserialize;

pub static CONFIG: Lazy<Config> = Lazy::new(|| Config::new().expect("Config could not be loaded."));

#[derive(Debug, Deserialize)]
pub struct General {
    pub log_level: log::Level,
    pub print_map: bool,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub general: General,
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub map: MapSettings,
    #[serde(default)]
    pub lookup: LookupSettings,
}

impl Config {
    pub fn new() -> Result<Self, config::ConfigError> {
        let mut s = config::Config::new();

        // Start off by merging in the "default" configuration file
        s.merge(config::File::with_name("config/default"))?;

        // Add in a local configuration file
        // This file shouldn't be checked in to git
        s.merge(config::File::with_name("config/local").required(false))?;

        // COUNTRY_FINDER_API__BASE_URL=... overrides api.base_url
        s.merge(config::Environment::with_prefix("COUNTRY_FINDER").separator("__"))?;

        s.try_into()
    }
}
