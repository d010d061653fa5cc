use serde::{Deserialize, Serialize};

use crate::{Service, ServiceType, Uuid};

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct AccessoryInformation {
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
    pub name: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Accessory {
    pub uuid: Uuid,
    pub display_name: String,
    pub plugin: String,
    pub platform: String,

    #[serde(default)]
    pub information: AccessoryInformation,

    #[serde(default)]
    pub services: Vec<Service>,

    /// Opaque data kept across restarts.
    #[serde(default)]
    pub context: serde_json::Value,
}

impl Accessory {
    pub fn new(display_name: impl Into<String>, uuid: Uuid) -> Accessory {
        Accessory {
            uuid,
            display_name: display_name.into(),
            plugin: String::new(),
            platform: String::new(),
            information: AccessoryInformation::default(),
            services: vec![],
            context: serde_json::Value::Null,
        }
    }

    pub fn service(&self, service_type: ServiceType) -> Option<&Service> {
        self.services
            .iter()
            .find(|service| service.service_type == service_type)
    }

    /// Adds the service unless one of that type is attached already, in
    /// which case its characteristics are merged in.
    pub fn ensure_service(&mut self, service: Service) {
        match self
            .services
            .iter_mut()
            .find(|existing| existing.service_type == service.service_type)
        {
            Some(existing) => {
                for characteristic in service.characteristics {
                    if !existing.has(characteristic) {
                        existing.characteristics.push(characteristic);
                    }
                }
            }
            None => self.services.push(service),
        }
    }
}
