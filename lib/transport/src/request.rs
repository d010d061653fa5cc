use homekit::{Characteristic, ServiceType, Value};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Request {
    pub request_id: uuid::Uuid,
    pub accessory: uuid::Uuid,
    pub service: ServiceType,
    pub characteristic: Characteristic,
    pub action: Action,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Get,
    Set(Value),
}
