use homekit::{AirQuality, FilterChangeIndication};

const FILTER_CHANGE_THRESHOLD: u8 = 5;

pub fn fan_level_from_rotation_speed(speed: f64) -> u8 {
    if speed < 100.0 / 3.0 {
        1
    } else if speed < 200.0 / 3.0 {
        2
    } else {
        3
    }
}

pub fn rotation_speed_from_fan_level(level: u8) -> f64 {
    match level {
        1 => 100.0 / 3.0,
        2 => 200.0 / 3.0,
        3 => 100.0,
        _ => 0.0,
    }
}

pub fn air_quality_from_pm2_5(density: f64) -> AirQuality {
    if density < 20.0 {
        AirQuality::Excellent
    } else if density < 50.0 {
        AirQuality::Good
    } else if density < 100.0 {
        AirQuality::Fair
    } else if density < 150.0 {
        AirQuality::Inferior
    } else {
        AirQuality::Poor
    }
}

pub fn banded_humidity_threshold(threshold: f64) -> u8 {
    if threshold <= 40.0 {
        40
    } else if threshold <= 50.0 {
        50
    } else if threshold <= 60.0 {
        60
    } else {
        70
    }
}

pub fn passthrough_humidity_threshold(threshold: f64) -> u8 {
    threshold.round().clamp(0.0, 100.0) as u8
}

/// Missing readings count as a fresh filter.
pub fn filter_life_level(remaining: Option<u8>) -> f64 {
    let remaining = remaining.unwrap_or(100).min(100);
    f64::from(100 - remaining)
}

pub fn filter_change_indication(remaining: Option<u8>) -> FilterChangeIndication {
    if remaining.unwrap_or(100) < FILTER_CHANGE_THRESHOLD {
        FilterChangeIndication::ChangeFilter
    } else {
        FilterChangeIndication::FilterOk
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fan_level_from_rotation_speed() {
        assert_eq!(fan_level_from_rotation_speed(0.0), 1);
        assert_eq!(fan_level_from_rotation_speed(33.0), 1);
        assert_eq!(fan_level_from_rotation_speed(100.0 / 3.0), 2);
        assert_eq!(fan_level_from_rotation_speed(66.0), 2);
        assert_eq!(fan_level_from_rotation_speed(200.0 / 3.0), 3);
        assert_eq!(fan_level_from_rotation_speed(100.0), 3);
    }

    #[test]
    fn test_rotation_speed_from_fan_level() {
        assert!((rotation_speed_from_fan_level(1) - 33.333).abs() < 0.01);
        assert!((rotation_speed_from_fan_level(2) - 66.667).abs() < 0.01);
        assert_eq!(rotation_speed_from_fan_level(3), 100.0);
        assert_eq!(rotation_speed_from_fan_level(0), 0.0);
        assert_eq!(rotation_speed_from_fan_level(4), 0.0);
    }

    #[test]
    fn test_air_quality() {
        assert_eq!(air_quality_from_pm2_5(0.0), AirQuality::Excellent);
        assert_eq!(air_quality_from_pm2_5(19.0), AirQuality::Excellent);
        assert_eq!(air_quality_from_pm2_5(20.0), AirQuality::Good);
        assert_eq!(air_quality_from_pm2_5(49.0), AirQuality::Good);
        assert_eq!(air_quality_from_pm2_5(50.0), AirQuality::Fair);
        assert_eq!(air_quality_from_pm2_5(99.0), AirQuality::Fair);
        assert_eq!(air_quality_from_pm2_5(100.0), AirQuality::Inferior);
        assert_eq!(air_quality_from_pm2_5(149.0), AirQuality::Inferior);
        assert_eq!(air_quality_from_pm2_5(150.0), AirQuality::Poor);
        assert_eq!(air_quality_from_pm2_5(600.0), AirQuality::Poor);
    }

    #[test]
    fn test_banded_humidity_threshold() {
        assert_eq!(banded_humidity_threshold(0.0), 40);
        assert_eq!(banded_humidity_threshold(35.0), 40);
        assert_eq!(banded_humidity_threshold(40.0), 40);
        assert_eq!(banded_humidity_threshold(45.0), 50);
        assert_eq!(banded_humidity_threshold(50.0), 50);
        assert_eq!(banded_humidity_threshold(55.0), 60);
        assert_eq!(banded_humidity_threshold(60.0), 60);
        assert_eq!(banded_humidity_threshold(65.0), 70);
        assert_eq!(banded_humidity_threshold(100.0), 70);
    }

    #[test]
    fn test_passthrough_humidity_threshold() {
        assert_eq!(passthrough_humidity_threshold(45.0), 45);
        assert_eq!(passthrough_humidity_threshold(52.6), 53);
        assert_eq!(passthrough_humidity_threshold(120.0), 100);
    }

    #[test]
    fn test_filter() {
        assert_eq!(filter_life_level(Some(3)), 97.0);
        assert_eq!(filter_life_level(Some(100)), 0.0);
        assert_eq!(filter_life_level(None), 0.0);

        assert_eq!(
            filter_change_indication(Some(3)),
            FilterChangeIndication::ChangeFilter
        );
        assert_eq!(
            filter_change_indication(Some(5)),
            FilterChangeIndication::FilterOk
        );
        assert_eq!(filter_change_indication(None), FilterChangeIndication::FilterOk);
    }
}
