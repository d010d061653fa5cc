use async_trait::async_trait;

use crate::{Characteristic, Result, ServiceType, Value};

/// Serves characteristic reads and writes of one accessory.
#[async_trait]
pub trait AccessoryHandler: Send + Sync {
    async fn get(&self, service: ServiceType, characteristic: Characteristic) -> Result<Value>;

    async fn set(
        &self,
        service: ServiceType,
        characteristic: Characteristic,
        value: Value,
    ) -> Result<()>;
}
