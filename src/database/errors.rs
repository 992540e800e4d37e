use std::io::Error as IoError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("record does not exist")]
    NotFound,

    #[error("record already exists")]
    AlreadyExists,

    #[error(transparent)]
    IoError(#[from] IoError),

    #[error("database file error: {message}")]
    ParsingError {
        message: String,
    },
}

impl From<toml::de::Error> for DatabaseError {
    fn from(e: toml::de::Error) -> Self {
        DatabaseError::ParsingError {
            message: format!("{e}"),
        }
    }
}

impl From<toml::ser::Error> for DatabaseError {
    fn from(e: toml::ser::Error) -> Self {
        DatabaseError::ParsingError {
            message: format!("{e}"),
        }
    }
}
