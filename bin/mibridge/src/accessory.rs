mod air_humidifier;
mod air_purifier;

pub use air_humidifier::AirHumidifier;
pub use air_purifier::AirPurifier;

use std::sync::Arc;

use homekit::{
    Accessory, AccessoryHandler, AccessoryInformation, Active, Characteristic, Error,
    LockPhysicalControls, Service, ServiceType, Value,
};
use xiaomi::{cloud::DeviceRecord, miot::Category, DeviceControl};

use crate::config::HumidityThreshold;
use crate::settings::MANUFACTURER;

/// Attaches the category's services and returns its characteristic handler.
pub fn configure(
    accessory: &mut Accessory,
    category: Category,
    record: &DeviceRecord,
    device: Arc<dyn DeviceControl>,
    threshold: HumidityThreshold,
) -> Arc<dyn AccessoryHandler> {
    accessory.information = AccessoryInformation {
        manufacturer: MANUFACTURER.to_string(),
        model: record.model.clone(),
        serial_number: record.mac.clone(),
        name: record.name.clone(),
    };

    match category {
        Category::AirPurifier => {
            for service in AirPurifier::services(&record.name) {
                accessory.ensure_service(service);
            }
            Arc::new(AirPurifier::new(device))
        }
        Category::AirHumidifier => {
            for service in AirHumidifier::services(&record.name) {
                accessory.ensure_service(service);
            }
            Arc::new(AirHumidifier::new(device, threshold))
        }
    }
}

fn device_error(err: xiaomi::Error) -> Error {
    Error::device(err)
}

fn active(on: bool) -> Value {
    if on {
        Active::Active.into()
    } else {
        Active::Inactive.into()
    }
}

fn is_active(value: Value) -> Result<bool, Error> {
    match Active::from_value(value) {
        Some(active) => Ok(active == Active::Active),
        None => Err(Error::InvalidValue(Characteristic::Active, value)),
    }
}

fn lock_physical_controls(locked: bool) -> Value {
    if locked {
        LockPhysicalControls::Enabled.into()
    } else {
        LockPhysicalControls::Disabled.into()
    }
}

fn is_locked(value: Value) -> Result<bool, Error> {
    match LockPhysicalControls::from_value(value) {
        Some(lock) => Ok(lock == LockPhysicalControls::Enabled),
        None => Err(Error::InvalidValue(Characteristic::LockPhysicalControls, value)),
    }
}

fn number(characteristic: Characteristic, value: Value) -> Result<f64, Error> {
    value
        .as_f64()
        .ok_or(Error::InvalidValue(characteristic, value))
}

fn service(service_type: ServiceType, name: &str, characteristics: &[Characteristic]) -> Service {
    characteristics
        .iter()
        .fold(Service::new(service_type, name), |service, characteristic| {
            service.with(*characteristic)
        })
}
