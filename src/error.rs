use thiserror::Error;

use crate::result::ResultCode;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{message} (code {})", .code.raw())]
    Sqlite { code: ResultCode, message: String },
    #[error("Invalid string: {0}")]
    InvalidString(#[from] std::ffi::NulError),
}

impl Error {
    /// The engine code behind this error, if it came from the engine.
    pub fn code(&self) -> Option<ResultCode> {
        match self {
            Error::Sqlite { code, .. } => Some(*code),
            Error::InvalidString(_) => None,
        }
    }
}
