use std::fmt;
use std::net::Ipv4Addr;

use serde_json::Value;

use crate::device::DeviceError;

#[derive(Debug)]
pub enum Error {
    DeviceNotFound(Ipv4Addr),
    InvalidPacket(usize),
    InvalidChecksum,
    DeviceResponse(DeviceError),
    PropertyCode(&'static str, i64),
    MissingProperty(&'static str),
    UnsupportedProperty(&'static str),
    UnexpectedValue(&'static str, Value),
    UnsupportedModel(String),
    InvalidAddress(String),
    Io(std::io::Error),
    Json(serde_json::Error),
    Timeout(tokio::time::error::Elapsed),
    Crypto(crypto::Error),
    Http(reqwest::Error),
    Base64(base64::DecodeError),
    Signature,
    Login(String),
    Cloud(i64, String),
    NotLoggedIn,
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<tokio::time::error::Elapsed> for Error {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        Self::Timeout(err)
    }
}

impl From<crypto::Error> for Error {
    fn from(err: crypto::Error) -> Self {
        Self::Crypto(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err)
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Self::Base64(err)
    }
}

impl From<DeviceError> for Error {
    fn from(err: DeviceError) -> Self {
        Self::DeviceResponse(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeviceNotFound(ip) => write!(f, "device {ip} not found"),
            Self::InvalidPacket(size) => write!(f, "invalid packet of {size} bytes"),
            Self::InvalidChecksum => write!(f, "invalid data checksum"),
            Self::DeviceResponse(err) => write!(f, "device error code {}: {err}", err.code),
            Self::PropertyCode(name, code) => write!(f, "property {name} error code {code}"),
            Self::MissingProperty(name) => write!(f, "property {name} missing in response"),
            Self::UnsupportedProperty(name) => write!(f, "property {name} is not supported"),
            Self::UnexpectedValue(name, value) => {
                write!(f, "unexpected value for {name}: {value}")
            }
            Self::UnsupportedModel(model) => write!(f, "unsupported model {model}"),
            Self::InvalidAddress(addr) => write!(f, "invalid address {addr}"),
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Json(err) => write!(f, "json error: {err}"),
            Self::Timeout(err) => write!(f, "timeout error: {err}"),
            Self::Crypto(err) => write!(f, "crypto error: {err}"),
            Self::Http(err) => write!(f, "http error: {err}"),
            Self::Base64(err) => write!(f, "base64 error: {err}"),
            Self::Signature => write!(f, "signature error: invalid signing key"),
            Self::Login(reason) => write!(f, "login error: {reason}"),
            Self::Cloud(code, message) => write!(f, "cloud error code {code}: {message}"),
            Self::NotLoggedIn => write!(f, "not logged in"),
        }
    }
}

impl std::error::Error for Error {}
