mod accessory;
mod bridge;
mod cache;
mod characteristic;
mod error;
mod handler;
mod service;
pub mod uuid;
mod value;

pub use accessory::{Accessory, AccessoryInformation};
pub use bridge::Bridge;
pub use cache::AccessoryCache;
pub use characteristic::Characteristic;
pub use error::{DeviceError, Error};
pub use handler::AccessoryHandler;
pub use service::{Service, ServiceType};
pub use value::{
    Active, AirQuality, CurrentAirPurifierState, CurrentHumidifierDehumidifierState,
    FilterChangeIndication, LockPhysicalControls, TargetAirPurifierState,
    TargetHumidifierDehumidifierState, Value,
};

pub use ::uuid::Uuid;

pub type Result<T> = std::result::Result<T, Error>;
