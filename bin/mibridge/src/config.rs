use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;

use crate::settings::PLATFORM_NAME;
use crate::{Error, Result};

const DEFAULT_CONFIG: &str = "config.json";
const DEFAULT_CACHE: &str = "cached_accessories.json";

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum HumidityThreshold {
    /// Snaps the requested threshold to 40, 50, 60 or 70.
    #[default]
    Banded,
    Passthrough,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PlatformConfig {
    pub login: String,
    pub password: String,

    #[serde(default = "default_country")]
    pub country: String,

    #[serde(default)]
    pub humidity_threshold: HumidityThreshold,

    #[serde(default)]
    pub prune_stale_accessories: bool,
}

fn default_country() -> String {
    "cn".to_string()
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    platforms: Vec<Value>,
}

impl PlatformConfig {
    /// Picks our block out of a Homebridge-style `{"platforms": [...]}` file.
    pub fn parse(bytes: &[u8]) -> Result<PlatformConfig> {
        let file: ConfigFile = serde_json::from_slice(bytes)?;

        let platform = file
            .platforms
            .into_iter()
            .find(|platform| platform["platform"] == PLATFORM_NAME)
            .ok_or_else(|| Error::Config(format!("no {PLATFORM_NAME} platform configured")))?;

        Ok(serde_json::from_value(platform)?)
    }
}

#[derive(Debug)]
pub struct Config {
    pub platform: PlatformConfig,
    pub mqtt_address: String,
    pub mqtt_user: String,
    pub mqtt_pass: String,
    pub accessory_cache: PathBuf,
}

impl Config {
    pub async fn load() -> Result<Config> {
        Self::load_with(|name| std::env::var(name).ok()).await
    }

    async fn load_with(var: impl Fn(&str) -> Option<String>) -> Result<Config> {
        let required = |name: &'static str| var(name).ok_or(Error::MissingVariable(name));

        let path = var("MIBRIDGE_CONFIG").unwrap_or_else(|| DEFAULT_CONFIG.to_string());
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|err| Error::Config(format!("unable to read {path}: {err}")))?;

        Ok(Config {
            platform: PlatformConfig::parse(&bytes)?,
            mqtt_address: required("MQTT_ADDRESS")?,
            mqtt_user: required("MQTT_USER")?,
            mqtt_pass: required("MQTT_PASS")?,
            accessory_cache: var("ACCESSORY_CACHE")
                .unwrap_or_else(|| DEFAULT_CACHE.to_string())
                .into(),
        })
    }
}
