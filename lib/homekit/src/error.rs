use std::fmt;

use crate::{Characteristic, ServiceType, Uuid, Value};

pub type DeviceError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug)]
pub enum Error {
    UnknownAccessory(Uuid),
    UnsupportedCharacteristic(ServiceType, Characteristic),
    ReadOnly(Characteristic),
    InvalidValue(Characteristic, Value),
    Device(DeviceError),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl Error {
    pub fn device(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Device(Box::new(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAccessory(uuid) => write!(f, "unknown accessory {uuid}"),
            Self::UnsupportedCharacteristic(service, characteristic) => {
                write!(f, "{service} has no characteristic {characteristic}")
            }
            Self::ReadOnly(characteristic) => write!(f, "{characteristic} is read-only"),
            Self::InvalidValue(characteristic, value) => {
                write!(f, "invalid value {value} for {characteristic}")
            }
            Self::Device(err) => write!(f, "device error: {err}"),
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Json(err) => write!(f, "json error: {err}"),
        }
    }
}

impl std::error::Error for Error {}
