use std::fmt;

use serde::{
    de::{self, Deserializer, MapAccess, Visitor},
    Deserialize,
};
use serde_json::Value;

#[derive(Debug)]
pub enum Response {
    Ok { id: u32, result: Value },
    Err { id: u32, error: DeviceError },
}

impl Response {
    pub fn id(&self) -> u32 {
        match self {
            Response::Ok { id, .. } => *id,
            Response::Err { id, .. } => *id,
        }
    }
}

impl<'de> de::Deserialize<'de> for Response {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ResponseVisitor)
    }
}

struct ResponseVisitor;

impl<'de> Visitor<'de> for ResponseVisitor {
    type Value = Response;

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut id = None;
        let mut error = None;
        let mut result = None;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "id" => id = Some(map.next_value::<u32>()?),
                "error" => error = Some(map.next_value::<DeviceError>()?),
                "result" => result = Some(map.next_value::<Value>()?),
                _ => {
                    map.next_value::<de::IgnoredAny>()?;
                }
            }
        }

        let id = id.ok_or_else(|| de::Error::missing_field("id"))?;

        // an error wins over a result, some firmwares send both
        match (result, error) {
            (_, Some(error)) => Ok(Response::Err { id, error }),
            (Some(result), None) => Ok(Response::Ok { id, result }),
            (None, None) => Err(de::Error::missing_field("result")),
        }
    }

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "response with result or error")
    }
}

#[derive(Debug, Deserialize)]
pub struct DeviceError {
    pub code: i64,
    pub message: String,
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DeviceError {}
