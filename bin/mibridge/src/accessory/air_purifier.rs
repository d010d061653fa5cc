use std::sync::Arc;

use async_trait::async_trait;
use homekit::{
    AccessoryHandler, Characteristic, CurrentAirPurifierState, Error, Result, Service,
    ServiceType, TargetAirPurifierState, Value,
};
use log::debug;
use xiaomi::DeviceControl;

use super::{active, device_error, is_active, is_locked, lock_physical_controls, number, service};
use crate::conversion::{
    air_quality_from_pm2_5, fan_level_from_rotation_speed, filter_change_indication,
    filter_life_level, rotation_speed_from_fan_level,
};

pub struct AirPurifier {
    device: Arc<dyn DeviceControl>,
}

impl AirPurifier {
    pub fn new(device: Arc<dyn DeviceControl>) -> AirPurifier {
        AirPurifier { device }
    }

    pub fn services(name: &str) -> Vec<Service> {
        vec![
            service(
                ServiceType::AirPurifier,
                name,
                &[
                    Characteristic::Active,
                    Characteristic::CurrentAirPurifierState,
                    Characteristic::TargetAirPurifierState,
                    Characteristic::RotationSpeed,
                    Characteristic::LockPhysicalControls,
                ],
            ),
            service(
                ServiceType::AirQualitySensor,
                name,
                &[Characteristic::AirQuality, Characteristic::Pm25Density],
            ),
            service(
                ServiceType::TemperatureSensor,
                name,
                &[Characteristic::CurrentTemperature],
            ),
            service(
                ServiceType::HumiditySensor,
                name,
                &[Characteristic::CurrentRelativeHumidity],
            ),
            service(
                ServiceType::FilterMaintenance,
                name,
                &[
                    Characteristic::FilterLifeLevel,
                    Characteristic::FilterChangeIndication,
                ],
            ),
        ]
    }
}

#[async_trait]
impl AccessoryHandler for AirPurifier {
    async fn get(&self, service: ServiceType, characteristic: Characteristic) -> Result<Value> {
        let device = &self.device;

        let value: Value = match characteristic {
            Characteristic::Active => active(device.power().await.map_err(device_error)?),
            Characteristic::CurrentAirPurifierState => {
                if device.power().await.map_err(device_error)? {
                    CurrentAirPurifierState::PurifyingAir.into()
                } else {
                    CurrentAirPurifierState::Inactive.into()
                }
            }
            Characteristic::TargetAirPurifierState => {
                if device.mode().await.map_err(device_error)? == "auto" {
                    TargetAirPurifierState::Auto.into()
                } else {
                    TargetAirPurifierState::Manual.into()
                }
            }
            Characteristic::RotationSpeed => {
                let level = device.fan_level().await.map_err(device_error)?;
                rotation_speed_from_fan_level(level).into()
            }
            Characteristic::LockPhysicalControls => {
                lock_physical_controls(device.controls_locked().await.map_err(device_error)?)
            }
            Characteristic::AirQuality => {
                air_quality_from_pm2_5(device.pm2_5().await.map_err(device_error)?).into()
            }
            Characteristic::Pm25Density => device.pm2_5().await.map_err(device_error)?.into(),
            Characteristic::CurrentTemperature => {
                device.temperature().await.map_err(device_error)?.into()
            }
            Characteristic::CurrentRelativeHumidity => {
                device.humidity().await.map_err(device_error)?.into()
            }
            Characteristic::FilterLifeLevel => {
                let remaining = device.filter_remaining().await.map_err(device_error)?;
                filter_life_level(remaining).into()
            }
            Characteristic::FilterChangeIndication => {
                let remaining = device.filter_remaining().await.map_err(device_error)?;
                filter_change_indication(remaining).into()
            }
            other => return Err(Error::UnsupportedCharacteristic(service, other)),
        };

        Ok(value)
    }

    async fn set(
        &self,
        service: ServiceType,
        characteristic: Characteristic,
        value: Value,
    ) -> Result<()> {
        let device = &self.device;

        let result = match characteristic {
            Characteristic::Active => device.set_power(is_active(value)?).await,
            Characteristic::TargetAirPurifierState => {
                debug!("target air purifier state {value} is not forwarded to the device");
                Ok(())
            }
            Characteristic::RotationSpeed => {
                let speed = number(characteristic, value)?;
                device
                    .set_fan_level(fan_level_from_rotation_speed(speed))
                    .await
            }
            Characteristic::LockPhysicalControls => {
                device.set_controls_locked(is_locked(value)?).await
            }
            other => return Err(Error::UnsupportedCharacteristic(service, other)),
        };

        result.map_err(device_error)
    }
}
