use serde::{Deserialize, Serialize};
use serde_json::Value;

/// MIoT property address: service id and property id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Property {
    pub name: &'static str,
    pub siid: u8,
    pub piid: u8,
}

const fn property(name: &'static str, siid: u8, piid: u8) -> Property {
    Property { name, siid, piid }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    AirPurifier,
    AirHumidifier,
}

impl Category {
    pub fn from_model(model: &str) -> Option<Category> {
        if model.contains("airpurifier") {
            Some(Category::AirPurifier)
        } else if model.contains("humidifier") {
            Some(Category::AirHumidifier)
        } else {
            None
        }
    }

    pub fn spec(self) -> &'static ModelSpec {
        match self {
            Category::AirPurifier => &AIR_PURIFIER,
            Category::AirHumidifier => &AIR_HUMIDIFIER,
        }
    }
}

/// Per-category property table. Missing entries are not supported by the
/// category.
#[derive(Debug)]
pub struct ModelSpec {
    pub power: Property,
    pub mode: Option<Property>,
    pub modes: &'static [(u8, &'static str)],
    pub fan_level: Property,
    pub humidity: Property,
    pub target_humidity: Option<Property>,
    pub temperature: Property,
    pub pm2_5: Option<Property>,
    pub water_level: Option<Property>,
    pub filter_remaining: Option<Property>,
    pub child_lock: Property,
}

impl ModelSpec {
    pub fn mode_name(&self, value: u8) -> Option<&'static str> {
        self.modes
            .iter()
            .find(|(code, _)| *code == value)
            .map(|(_, name)| *name)
    }
}

pub static AIR_PURIFIER: ModelSpec = ModelSpec {
    power: property("power", 2, 2),
    mode: Some(property("mode", 2, 5)),
    modes: &[(0, "auto"), (1, "sleep"), (2, "favorite"), (3, "fan")],
    fan_level: property("fan_level", 2, 4),
    humidity: property("humidity", 3, 7),
    target_humidity: None,
    temperature: property("temperature", 3, 8),
    pm2_5: Some(property("pm2_5", 3, 6)),
    water_level: None,
    filter_remaining: Some(property("filter_remaining", 4, 3)),
    child_lock: property("child_lock", 7, 1),
};

pub static AIR_HUMIDIFIER: ModelSpec = ModelSpec {
    power: property("power", 2, 1),
    mode: None,
    modes: &[],
    fan_level: property("fan_level", 2, 5),
    humidity: property("humidity", 3, 9),
    target_humidity: Some(property("target_humidity", 2, 6)),
    temperature: property("temperature", 3, 7),
    pm2_5: None,
    water_level: Some(property("water_level", 2, 7)),
    filter_remaining: None,
    child_lock: property("child_lock", 6, 1),
};

#[derive(Debug, Serialize)]
pub struct GetProperty<'a> {
    pub did: &'a str,
    pub siid: u8,
    pub piid: u8,
}

#[derive(Debug, Serialize)]
pub struct SetProperty<'a> {
    pub did: &'a str,
    pub siid: u8,
    pub piid: u8,
    pub value: Value,
}

#[derive(Debug, Deserialize)]
pub struct PropertyResult {
    pub siid: u8,
    pub piid: u8,
    pub code: i64,
    #[serde(default)]
    pub value: Option<Value>,
}
