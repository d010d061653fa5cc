use std::fmt;

#[derive(Debug)]
pub enum Error {
    Config(String),
    MissingVariable(&'static str),
    Xiaomi(xiaomi::Error),
    HomeKit(homekit::Error),
    Mqtt(paho_mqtt::Error),
    Json(serde_json::Error),
    Io(std::io::Error),
    Join(tokio::task::JoinError),
}

impl From<xiaomi::Error> for Error {
    fn from(err: xiaomi::Error) -> Self {
        Self::Xiaomi(err)
    }
}

impl From<homekit::Error> for Error {
    fn from(err: homekit::Error) -> Self {
        Self::HomeKit(err)
    }
}

impl From<paho_mqtt::Error> for Error {
    fn from(err: paho_mqtt::Error) -> Self {
        Self::Mqtt(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Join(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(reason) => write!(f, "config error: {reason}"),
            Self::MissingVariable(name) => write!(f, "set ENV variable {name}"),
            Self::Xiaomi(err) => write!(f, "xiaomi error: {err}"),
            Self::HomeKit(err) => write!(f, "homekit error: {err}"),
            Self::Mqtt(err) => write!(f, "mqtt error: {err}"),
            Self::Json(err) => write!(f, "json error: {err}"),
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Join(err) => write!(f, "join error: {err}"),
        }
    }
}

impl std::error::Error for Error {}
