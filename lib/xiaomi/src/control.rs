use async_trait::async_trait;

use crate::Result;

/// Control handle of a single air purifier or humidifier.
///
/// Every call is a fresh round trip to the device, nothing is cached.
#[async_trait]
pub trait DeviceControl: Send + Sync {
    async fn power(&self) -> Result<bool>;
    async fn set_power(&self, on: bool) -> Result<()>;

    /// Operation mode name, e.g. `auto`, `sleep`, `favorite`.
    async fn mode(&self) -> Result<String>;

    async fn fan_level(&self) -> Result<u8>;
    async fn set_fan_level(&self, level: u8) -> Result<()>;

    async fn humidity(&self) -> Result<f64>;
    async fn target_humidity(&self) -> Result<f64>;
    async fn set_target_humidity(&self, humidity: u8) -> Result<()>;

    async fn temperature(&self) -> Result<f64>;
    async fn pm2_5(&self) -> Result<f64>;
    async fn water_level(&self) -> Result<f64>;

    /// Remaining filter life in percent, `None` when the device does not report it.
    async fn filter_remaining(&self) -> Result<Option<u8>>;

    async fn controls_locked(&self) -> Result<bool>;
    async fn set_controls_locked(&self, locked: bool) -> Result<()>;
}
