use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Characteristic;

#[derive(Copy, Clone, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub enum ServiceType {
    AirPurifier,
    AirQualitySensor,
    TemperatureSensor,
    HumiditySensor,
    HumidifierDehumidifier,
    FilterMaintenance,
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Service {
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    pub name: String,
    pub characteristics: Vec<Characteristic>,
}

impl Service {
    pub fn new(service_type: ServiceType, name: impl Into<String>) -> Service {
        Service {
            service_type,
            name: name.into(),
            characteristics: vec![],
        }
    }

    pub fn with(mut self, characteristic: Characteristic) -> Service {
        if !self.characteristics.contains(&characteristic) {
            self.characteristics.push(characteristic);
        }
        self
    }

    pub fn has(&self, characteristic: Characteristic) -> bool {
        self.characteristics.contains(&characteristic)
    }
}
