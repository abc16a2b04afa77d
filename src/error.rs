use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("invalid split configuration: {message}")]
    InvalidConfig { message: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl SplitError {
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SplitError>;
