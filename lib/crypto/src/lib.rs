mod cbc;
pub use cbc::Cipher;

mod error;
pub use error::Error;

mod token;
pub use token::{parse_token, Token};

pub type Result<T> = std::result::Result<T, Error>;
