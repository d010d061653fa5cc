use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info};
use tokio::sync::RwLock;

use crate::{
    Accessory, AccessoryCache, AccessoryHandler, Characteristic, Error, Result, ServiceType, Uuid,
    Value,
};

struct Registry {
    accessories: Vec<Accessory>,
    handlers: HashMap<Uuid, Arc<dyn AccessoryHandler>>,
}

impl Registry {
    fn position(&self, uuid: Uuid) -> Option<usize> {
        self.accessories
            .iter()
            .position(|accessory| accessory.uuid == uuid)
    }
}

/// Accessory registry: persists accessories and routes characteristic
/// requests to their handlers.
pub struct Bridge {
    cache: AccessoryCache,
    registry: RwLock<Registry>,
}

impl Bridge {
    /// Restores the accessories saved by a previous run. They have no
    /// handler until they are updated.
    pub async fn restore(cache: AccessoryCache) -> Result<Bridge> {
        debug!("restoring accessories from {}", cache.path().display());
        let accessories = cache.load().await?;

        for accessory in &accessories {
            info!(
                "loading accessory from cache: {} ({})",
                accessory.display_name, accessory.uuid
            );
        }

        Ok(Bridge {
            cache,
            registry: RwLock::new(Registry {
                accessories,
                handlers: HashMap::new(),
            }),
        })
    }

    pub async fn cached(&self, uuid: Uuid) -> Option<Accessory> {
        let registry = self.registry.read().await;
        registry
            .position(uuid)
            .map(|index| registry.accessories[index].clone())
    }

    pub async fn accessories(&self) -> Vec<Accessory> {
        self.registry.read().await.accessories.clone()
    }

    pub async fn register(
        &self,
        accessory: Accessory,
        handler: Arc<dyn AccessoryHandler>,
    ) -> Result<()> {
        info!(
            "registering accessory {} ({}) for {}/{}",
            accessory.display_name, accessory.uuid, accessory.plugin, accessory.platform
        );
        self.upsert(accessory, handler).await
    }

    pub async fn update(&self, accessory: Accessory, handler: Arc<dyn AccessoryHandler>) -> Result<()> {
        info!(
            "updating accessory {} ({})",
            accessory.display_name, accessory.uuid
        );
        self.upsert(accessory, handler).await
    }

    pub async fn unregister(&self, uuid: Uuid) -> Result<()> {
        let mut registry = self.registry.write().await;

        let index = registry.position(uuid).ok_or(Error::UnknownAccessory(uuid))?;

        let mut accessories = registry.accessories.clone();
        let accessory = accessories.remove(index);
        self.cache.save(&accessories).await?;

        registry.accessories = accessories;
        registry.handlers.remove(&uuid);

        info!(
            "unregistered accessory {} ({})",
            accessory.display_name, accessory.uuid
        );

        Ok(())
    }

    async fn upsert(&self, accessory: Accessory, handler: Arc<dyn AccessoryHandler>) -> Result<()> {
        let mut registry = self.registry.write().await;
        let uuid = accessory.uuid;

        // the registry only changes once the cache has accepted the new list
        let mut accessories = registry.accessories.clone();
        match registry.position(uuid) {
            Some(index) => accessories[index] = accessory,
            None => accessories.push(accessory),
        }
        self.cache.save(&accessories).await?;

        registry.accessories = accessories;
        registry.handlers.insert(uuid, handler);

        Ok(())
    }

    async fn handler(
        &self,
        uuid: Uuid,
        service: ServiceType,
        characteristic: Characteristic,
    ) -> Result<Arc<dyn AccessoryHandler>> {
        let registry = self.registry.read().await;

        let index = registry.position(uuid).ok_or(Error::UnknownAccessory(uuid))?;
        let exposed = registry.accessories[index]
            .service(service)
            .map(|service| service.has(characteristic))
            .unwrap_or(false);

        if !exposed {
            return Err(Error::UnsupportedCharacteristic(service, characteristic));
        }

        registry
            .handlers
            .get(&uuid)
            .cloned()
            .ok_or(Error::UnknownAccessory(uuid))
    }

    pub async fn get(
        &self,
        uuid: Uuid,
        service: ServiceType,
        characteristic: Characteristic,
    ) -> Result<Value> {
        let handler = self.handler(uuid, service, characteristic).await?;

        let value = handler.get(service, characteristic).await?;
        debug!("{uuid} {service}.{characteristic} -> {value}");

        Ok(value)
    }

    pub async fn set(
        &self,
        uuid: Uuid,
        service: ServiceType,
        characteristic: Characteristic,
        value: Value,
    ) -> Result<()> {
        if !characteristic.is_writable() {
            return Err(Error::ReadOnly(characteristic));
        }

        let handler = self.handler(uuid, service, characteristic).await?;

        debug!("{uuid} {service}.{characteristic} <- {value}");
        handler.set(service, characteristic, value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{uuid::generate, Service};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        writes: Mutex<Vec<(Characteristic, Value)>>,
    }

    #[async_trait]
    impl AccessoryHandler for Recorder {
        async fn get(&self, _: ServiceType, characteristic: Characteristic) -> Result<Value> {
            match characteristic {
                Characteristic::CurrentTemperature => Ok(Value::Float(21.5)),
                _ => Err(Error::device(std::io::Error::other("device offline"))),
            }
        }

        async fn set(&self, _: ServiceType, characteristic: Characteristic, value: Value) -> Result<()> {
            self.writes.lock().unwrap().push((characteristic, value));
            Ok(())
        }
    }

    fn accessory(mac: &str) -> Accessory {
        let mut accessory = Accessory::new(mac, generate(mac));
        accessory.ensure_service(
            Service::new(ServiceType::TemperatureSensor, "Temperature")
                .with(Characteristic::CurrentTemperature),
        );
        accessory.ensure_service(
            Service::new(ServiceType::AirPurifier, "Purifier")
                .with(Characteristic::Active)
                .with(Characteristic::CurrentAirPurifierState),
        );
        accessory
    }

    async fn bridge(dir: &tempfile::TempDir) -> Bridge {
        let cache = AccessoryCache::new(dir.path().join("cache.json"));
        Bridge::restore(cache).await.unwrap()
    }

    #[tokio::test]
    async fn test_register_persists() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = bridge(&dir).await;

        bridge
            .register(accessory("AA:BB:CC:DD:EE:FF"), Arc::new(Recorder::default()))
            .await
            .unwrap();

        let restored = Bridge::restore(AccessoryCache::new(dir.path().join("cache.json")))
            .await
            .unwrap();
        let uuid = generate("AA:BB:CC:DD:EE:FF");

        assert!(restored.cached(uuid).await.is_some());

        // restored accessories wait for a handler
        let error = restored
            .get(uuid, ServiceType::TemperatureSensor, Characteristic::CurrentTemperature)
            .await
            .unwrap_err();
        assert!(matches!(error, Error::UnknownAccessory(_)));
    }

    #[tokio::test]
    async fn test_update_does_not_duplicate() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = bridge(&dir).await;

        let handler = Arc::new(Recorder::default());
        bridge
            .register(accessory("AA:BB:CC:DD:EE:FF"), handler.clone())
            .await
            .unwrap();

        let mut updated = accessory("AA:BB:CC:DD:EE:FF");
        updated.information.model = "zhimi.airpurifier.ma4".to_string();
        bridge.update(updated, handler).await.unwrap();

        let accessories = bridge.accessories().await;
        assert_eq!(accessories.len(), 1);
        assert_eq!(accessories[0].information.model, "zhimi.airpurifier.ma4");
    }

    #[tokio::test]
    async fn test_failed_save_keeps_registry() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AccessoryCache::new(dir.path().join("missing").join("cache.json"));
        let bridge = Bridge::restore(cache).await.unwrap();
        let uuid = generate("AA:BB:CC:DD:EE:FF");

        let error = bridge
            .register(accessory("AA:BB:CC:DD:EE:FF"), Arc::new(Recorder::default()))
            .await
            .unwrap_err();
        assert!(matches!(error, Error::Io(_)));

        assert!(bridge.accessories().await.is_empty());
        assert!(matches!(
            bridge
                .get(uuid, ServiceType::TemperatureSensor, Characteristic::CurrentTemperature)
                .await
                .unwrap_err(),
            Error::UnknownAccessory(_)
        ));
    }

    #[tokio::test]
    async fn test_unregister() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = bridge(&dir).await;
        let uuid = generate("AA:BB:CC:DD:EE:FF");

        bridge
            .register(accessory("AA:BB:CC:DD:EE:FF"), Arc::new(Recorder::default()))
            .await
            .unwrap();
        bridge.unregister(uuid).await.unwrap();

        assert!(bridge.accessories().await.is_empty());
        assert!(matches!(
            bridge.unregister(uuid).await.unwrap_err(),
            Error::UnknownAccessory(_)
        ));
    }

    #[tokio::test]
    async fn test_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = bridge(&dir).await;
        let uuid = generate("AA:BB:CC:DD:EE:FF");
        let handler = Arc::new(Recorder::default());

        bridge
            .register(accessory("AA:BB:CC:DD:EE:FF"), handler.clone())
            .await
            .unwrap();

        let value = bridge
            .get(uuid, ServiceType::TemperatureSensor, Characteristic::CurrentTemperature)
            .await
            .unwrap();
        assert_eq!(value, Value::Float(21.5));

        bridge
            .set(uuid, ServiceType::AirPurifier, Characteristic::Active, Value::Int(1))
            .await
            .unwrap();
        assert_eq!(
            *handler.writes.lock().unwrap(),
            vec![(Characteristic::Active, Value::Int(1))]
        );
    }

    #[tokio::test]
    async fn test_dispatch_errors() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = bridge(&dir).await;
        let uuid = generate("AA:BB:CC:DD:EE:FF");

        bridge
            .register(accessory("AA:BB:CC:DD:EE:FF"), Arc::new(Recorder::default()))
            .await
            .unwrap();

        let error = bridge
            .get(generate("other"), ServiceType::AirPurifier, Characteristic::Active)
            .await
            .unwrap_err();
        assert!(matches!(error, Error::UnknownAccessory(_)));

        let error = bridge
            .get(uuid, ServiceType::AirPurifier, Characteristic::RotationSpeed)
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            Error::UnsupportedCharacteristic(ServiceType::AirPurifier, Characteristic::RotationSpeed)
        ));

        let error = bridge
            .set(
                uuid,
                ServiceType::AirPurifier,
                Characteristic::CurrentAirPurifierState,
                Value::Int(2),
            )
            .await
            .unwrap_err();
        assert!(matches!(error, Error::ReadOnly(_)));

        let error = bridge
            .get(uuid, ServiceType::AirPurifier, Characteristic::Active)
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), "device error: device offline");
    }
}
