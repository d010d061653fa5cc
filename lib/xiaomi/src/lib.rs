pub mod cloud;
mod control;
mod device;
mod discover;
mod message;
pub mod miot;

pub use control::DeviceControl;
pub use device::{Device, DeviceError};

mod error;
pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;
