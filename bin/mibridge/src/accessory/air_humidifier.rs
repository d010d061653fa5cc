use std::sync::Arc;

use async_trait::async_trait;
use homekit::{
    AccessoryHandler, Characteristic, CurrentHumidifierDehumidifierState, Error, Result, Service,
    ServiceType, TargetHumidifierDehumidifierState, Value,
};
use log::debug;
use xiaomi::DeviceControl;

use super::{active, device_error, is_active, number, service};
use crate::config::HumidityThreshold;
use crate::conversion::{
    banded_humidity_threshold, fan_level_from_rotation_speed, passthrough_humidity_threshold,
    rotation_speed_from_fan_level,
};

pub struct AirHumidifier {
    device: Arc<dyn DeviceControl>,
    threshold: HumidityThreshold,
}

impl AirHumidifier {
    pub fn new(device: Arc<dyn DeviceControl>, threshold: HumidityThreshold) -> AirHumidifier {
        AirHumidifier { device, threshold }
    }

    pub fn services(name: &str) -> Vec<Service> {
        vec![
            service(
                ServiceType::HumidifierDehumidifier,
                name,
                &[
                    Characteristic::Active,
                    Characteristic::CurrentHumidifierDehumidifierState,
                    Characteristic::TargetHumidifierDehumidifierState,
                    Characteristic::RelativeHumidityHumidifierThreshold,
                    Characteristic::RotationSpeed,
                    Characteristic::CurrentRelativeHumidity,
                    Characteristic::WaterLevel,
                ],
            ),
            service(
                ServiceType::TemperatureSensor,
                name,
                &[Characteristic::CurrentTemperature],
            ),
        ]
    }

    fn target_humidity(&self, threshold: f64) -> u8 {
        match self.threshold {
            HumidityThreshold::Banded => banded_humidity_threshold(threshold),
            HumidityThreshold::Passthrough => passthrough_humidity_threshold(threshold),
        }
    }
}

#[async_trait]
impl AccessoryHandler for AirHumidifier {
    async fn get(&self, service: ServiceType, characteristic: Characteristic) -> Result<Value> {
        let device = &self.device;

        let value: Value = match characteristic {
            Characteristic::Active => active(device.power().await.map_err(device_error)?),
            Characteristic::CurrentHumidifierDehumidifierState => {
                CurrentHumidifierDehumidifierState::Humidifying.into()
            }
            Characteristic::TargetHumidifierDehumidifierState => {
                TargetHumidifierDehumidifierState::Humidifier.into()
            }
            Characteristic::RelativeHumidityHumidifierThreshold => {
                device.target_humidity().await.map_err(device_error)?.into()
            }
            Characteristic::RotationSpeed => {
                let level = device.fan_level().await.map_err(device_error)?;
                rotation_speed_from_fan_level(level).into()
            }
            Characteristic::CurrentRelativeHumidity => {
                device.humidity().await.map_err(device_error)?.into()
            }
            Characteristic::WaterLevel => device.water_level().await.map_err(device_error)?.into(),
            Characteristic::CurrentTemperature => {
                device.temperature().await.map_err(device_error)?.into()
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
            Characteristic::TargetHumidifierDehumidifierState => {
                debug!("target humidifier state {value} is not forwarded to the device");
                Ok(())
            }
            Characteristic::RelativeHumidityHumidifierThreshold => {
                let threshold = number(characteristic, value)?;
                device
                    .set_target_humidity(self.target_humidity(threshold))
                    .await
            }
            Characteristic::RotationSpeed => {
                let speed = number(characteristic, value)?;
                device
                    .set_fan_level(fan_level_from_rotation_speed(speed))
                    .await
            }
            other => return Err(Error::UnsupportedCharacteristic(service, other)),
        };

        result.map_err(device_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessory::mock::MockDevice;
    use mockall::predicate::eq;

    const HUMIDIFIER: ServiceType = ServiceType::HumidifierDehumidifier;

    fn humidifier(device: MockDevice, threshold: HumidityThreshold) -> AirHumidifier {
        AirHumidifier::new(Arc::new(device), threshold)
    }

    #[tokio::test]
    async fn test_fixed_states() {
        let humidifier = humidifier(MockDevice::new(), HumidityThreshold::Banded);

        let value = humidifier
            .get(HUMIDIFIER, Characteristic::CurrentHumidifierDehumidifierState)
            .await
            .unwrap();
        assert_eq!(value, Value::Int(2));

        let value = humidifier
            .get(HUMIDIFIER, Characteristic::TargetHumidifierDehumidifierState)
            .await
            .unwrap();
        assert_eq!(value, Value::Int(1));

        humidifier
            .set(
                HUMIDIFIER,
                Characteristic::TargetHumidifierDehumidifierState,
                Value::Int(2),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_banded_threshold() {
        let mut device = MockDevice::new();
        device.expect_target_humidity().returning(|| Ok(50.0));
        device
            .expect_set_target_humidity()
            .with(eq(60))
            .times(1)
            .returning(|_| Ok(()));

        let humidifier = humidifier(device, HumidityThreshold::Banded);

        let value = humidifier
            .get(HUMIDIFIER, Characteristic::RelativeHumidityHumidifierThreshold)
            .await
            .unwrap();
        assert_eq!(value, Value::Float(50.0));

        humidifier
            .set(
                HUMIDIFIER,
                Characteristic::RelativeHumidityHumidifierThreshold,
                Value::Int(55),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_passthrough_threshold() {
        let mut device = MockDevice::new();
        device
            .expect_set_target_humidity()
            .with(eq(55))
            .times(1)
            .returning(|_| Ok(()));

        humidifier(device, HumidityThreshold::Passthrough)
            .set(
                HUMIDIFIER,
                Characteristic::RelativeHumidityHumidifierThreshold,
                Value::Float(55.0),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_active_and_speed() {
        let mut device = MockDevice::new();
        device.expect_power().returning(|| Ok(false));
        device.expect_fan_level().returning(|| Ok(1));
        device
            .expect_set_power()
            .with(eq(true))
            .times(1)
            .returning(|_| Ok(()));
        device
            .expect_set_fan_level()
            .with(eq(1))
            .times(1)
            .returning(|_| Ok(()));

        let humidifier = humidifier(device, HumidityThreshold::Banded);

        let value = humidifier
            .get(HUMIDIFIER, Characteristic::Active)
            .await
            .unwrap();
        assert_eq!(value, Value::Int(0));

        let value = humidifier
            .get(HUMIDIFIER, Characteristic::RotationSpeed)
            .await
            .unwrap();
        assert_eq!(value, Value::Float(100.0 / 3.0));

        humidifier
            .set(HUMIDIFIER, Characteristic::Active, Value::Int(1))
            .await
            .unwrap();
        humidifier
            .set(HUMIDIFIER, Characteristic::RotationSpeed, Value::Int(10))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_sensors() {
        let mut device = MockDevice::new();
        device.expect_humidity().returning(|| Ok(38.0));
        device.expect_water_level().returning(|| Ok(80.0));
        device.expect_temperature().returning(|| Ok(22.1));

        let humidifier = humidifier(device, HumidityThreshold::Banded);

        let value = humidifier
            .get(HUMIDIFIER, Characteristic::CurrentRelativeHumidity)
            .await
            .unwrap();
        assert_eq!(value, Value::Float(38.0));

        let value = humidifier
            .get(HUMIDIFIER, Characteristic::WaterLevel)
            .await
            .unwrap();
        assert_eq!(value, Value::Float(80.0));

        let value = humidifier
            .get(ServiceType::TemperatureSensor, Characteristic::CurrentTemperature)
            .await
            .unwrap();
        assert_eq!(value, Value::Float(22.1));
    }

    #[tokio::test]
    async fn test_active_writes() {
        let mut device = MockDevice::new();
        device
            .expect_set_power()
            .with(eq(true))
            .times(1)
            .returning(|_| Ok(()));

        let humidifier = humidifier(device, HumidityThreshold::Banded);

        humidifier
            .set(HUMIDIFIER, Characteristic::Active, Value::Float(1.0))
            .await
            .unwrap();

        let error = humidifier
            .set(HUMIDIFIER, Characteristic::Active, Value::Int(7))
            .await
            .unwrap_err();
        assert!(matches!(error, Error::InvalidValue(Characteristic::Active, _)));
    }

    #[tokio::test]
    async fn test_unsupported_characteristic() {
        let error = humidifier(MockDevice::new(), HumidityThreshold::Banded)
            .set(HUMIDIFIER, Characteristic::LockPhysicalControls, Value::Int(1))
            .await
            .unwrap_err();

        assert!(matches!(error, Error::UnsupportedCharacteristic(..)));
    }
}
