pub mod accessory;
pub mod config;
pub mod conversion;
pub mod dispatch;
pub mod platform;
pub mod settings;

mod error;
pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;
