use std::fmt;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Characteristic value as it travels to and from HomeKit.
#[derive(Copy, Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl Value {
    pub fn as_f64(self) -> Option<f64> {
        match self {
            Value::Bool(_) => None,
            Value::Int(value) => Some(value as f64),
            Value::Float(value) => Some(value),
        }
    }

    pub fn as_u8(self) -> Option<u8> {
        match self {
            Value::Bool(value) => Some(value as u8),
            Value::Int(value) => u8::try_from(value).ok(),
            Value::Float(value) if value.fract() == 0.0 && (0.0..=255.0).contains(&value) => {
                Some(value as u8)
            }
            Value::Float(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Bool(value) => write!(f, "{value}"),
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value}"),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Int(value as i64)
    }
}

macro_rules! constants {
    ($name:ident { $($variant:ident = $value:literal),+ $(,)? }) => {
        #[derive(Copy, Clone, Debug, Deserialize_repr, Serialize_repr, PartialEq, Eq)]
        #[repr(u8)]
        pub enum $name {
            $($variant = $value),+
        }

        impl $name {
            pub fn from_value(value: Value) -> Option<$name> {
                match value.as_u8()? {
                    $($value => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl From<$name> for Value {
            fn from(value: $name) -> Self {
                Value::Int(value as i64)
            }
        }
    };
}

constants!(Active {
    Inactive = 0,
    Active = 1,
});

constants!(CurrentAirPurifierState {
    Inactive = 0,
    Idle = 1,
    PurifyingAir = 2,
});

constants!(TargetAirPurifierState {
    Manual = 0,
    Auto = 1,
});

constants!(CurrentHumidifierDehumidifierState {
    Inactive = 0,
    Idle = 1,
    Humidifying = 2,
    Dehumidifying = 3,
});

constants!(TargetHumidifierDehumidifierState {
    HumidifierOrDehumidifier = 0,
    Humidifier = 1,
    Dehumidifier = 2,
});

constants!(AirQuality {
    Unknown = 0,
    Excellent = 1,
    Good = 2,
    Fair = 3,
    Inferior = 4,
    Poor = 5,
});

constants!(LockPhysicalControls {
    Disabled = 0,
    Enabled = 1,
});

constants!(FilterChangeIndication {
    FilterOk = 0,
    ChangeFilter = 1,
});
