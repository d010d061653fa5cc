use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub enum Characteristic {
    Active,
    CurrentAirPurifierState,
    TargetAirPurifierState,
    RotationSpeed,
    LockPhysicalControls,
    AirQuality,
    #[serde(rename = "PM2_5Density")]
    Pm25Density,
    CurrentTemperature,
    CurrentRelativeHumidity,
    CurrentHumidifierDehumidifierState,
    TargetHumidifierDehumidifierState,
    RelativeHumidityHumidifierThreshold,
    WaterLevel,
    FilterLifeLevel,
    FilterChangeIndication,
}

impl Characteristic {
    pub fn is_writable(self) -> bool {
        matches!(
            self,
            Characteristic::Active
                | Characteristic::TargetAirPurifierState
                | Characteristic::RotationSpeed
                | Characteristic::LockPhysicalControls
                | Characteristic::TargetHumidifierDehumidifierState
                | Characteristic::RelativeHumidityHumidifierThreshold
        )
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Characteristic::Pm25Density => write!(f, "PM2_5Density"),
            other => write!(f, "{other:?}"),
        }
    }
}
