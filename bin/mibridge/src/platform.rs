use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use homekit::{uuid::generate, Accessory, Bridge, Uuid};
use log::{debug, error, info};
use xiaomi::{cloud::Cloud, cloud::DeviceRecord, miot::Category, Device, DeviceControl};

use crate::accessory::configure;
use crate::config::{HumidityThreshold, PlatformConfig};
use crate::settings::{PLATFORM_NAME, PLUGIN_NAME};
use crate::Result;

/// Source of the account's devices and their control handles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Discovery: Send + Sync {
    async fn devices(&mut self) -> xiaomi::Result<Vec<DeviceRecord>>;

    async fn connect(&self, record: &DeviceRecord) -> xiaomi::Result<Arc<dyn DeviceControl>>;
}

pub struct CloudDiscovery {
    cloud: Cloud,
    login: String,
    password: String,
}

impl CloudDiscovery {
    pub fn new(config: &PlatformConfig) -> xiaomi::Result<CloudDiscovery> {
        Ok(CloudDiscovery {
            cloud: Cloud::new(&config.country)?,
            login: config.login.clone(),
            password: config.password.clone(),
        })
    }
}

#[async_trait]
impl Discovery for CloudDiscovery {
    async fn devices(&mut self) -> xiaomi::Result<Vec<DeviceRecord>> {
        self.cloud.login(&self.login, &self.password).await?;
        self.cloud.devices().await
    }

    async fn connect(&self, record: &DeviceRecord) -> xiaomi::Result<Arc<dyn DeviceControl>> {
        let device = Device::from_record(record)?;
        device.init().await?;
        debug!("handshake with {} ({}) done", device.did(), device.model());

        Ok(Arc::new(device))
    }
}

pub struct Platform<D> {
    discovery: D,
    bridge: Arc<Bridge>,
    threshold: HumidityThreshold,
    prune_stale_accessories: bool,
}

impl<D: Discovery> Platform<D> {
    pub fn new(discovery: D, bridge: Arc<Bridge>, config: &PlatformConfig) -> Platform<D> {
        Platform {
            discovery,
            bridge,
            threshold: config.humidity_threshold,
            prune_stale_accessories: config.prune_stale_accessories,
        }
    }

    /// Runs one discovery pass. A failure is logged and ends the pass.
    pub async fn discover(&mut self) {
        if let Err(err) = self.reconcile().await {
            error!("{err}");
        }
    }

    async fn reconcile(&mut self) -> Result<()> {
        let devices = self.discovery.devices().await?;
        let mut seen = HashSet::new();

        for record in devices {
            info!("Get device with model = {}", record.model);

            let Some(category) = Category::from_model(&record.model) else {
                debug!("skipping unsupported model {}", record.model);
                continue;
            };

            let uuid = generate(&record.mac);
            seen.insert(uuid);

            let device = self.discovery.connect(&record).await?;

            match self.bridge.cached(uuid).await {
                Some(mut accessory) => {
                    let handler =
                        configure(&mut accessory, category, &record, device, self.threshold);
                    self.bridge.update(accessory, handler).await?;
                }
                None => {
                    let mut accessory = Accessory::new(record.mac.clone(), uuid);
                    accessory.plugin = PLUGIN_NAME.to_string();
                    accessory.platform = PLATFORM_NAME.to_string();
                    accessory.context = serde_json::json!({ "device": record });

                    let handler =
                        configure(&mut accessory, category, &record, device, self.threshold);
                    self.bridge.register(accessory, handler).await?;
                }
            }
        }

        if self.prune_stale_accessories {
            self.prune(&seen).await?;
        }

        Ok(())
    }

    async fn prune(&self, seen: &HashSet<Uuid>) -> Result<()> {
        let stale = self
            .bridge
            .accessories()
            .await
            .into_iter()
            .filter(|accessory| !seen.contains(&accessory.uuid));

        for accessory in stale {
            info!(
                "removing stale accessory {} ({})",
                accessory.display_name, accessory.uuid
            );
            self.bridge.unregister(accessory.uuid).await?;
        }

        Ok(())
    }
}
