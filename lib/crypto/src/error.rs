use std::fmt;

use cipher::block_padding::UnpadError;

#[derive(Debug)]
pub enum Error {
    InvalidToken(String),
    Decrypt(UnpadError),
}

impl From<UnpadError> for Error {
    fn from(err: UnpadError) -> Self {
        Self::Decrypt(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken(token) => write!(f, "invalid token {token:?}"),
            Self::Decrypt(err) => write!(f, "crypto decrypt error: {err}"),
        }
    }
}

impl std::error::Error for Error {}
