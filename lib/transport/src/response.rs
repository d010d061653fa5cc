use homekit::Value;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Response {
    pub request_id: uuid::Uuid,
    pub result: RequestResult,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RequestResult {
    Value(Value),
    Success,
    Failure(String),
}
