use log::error;
use rocket::http::Status;
use rocket::response::{self, Flash, Redirect, Responder};
use rocket::{uri, Request};
use thiserror::Error;

use crate::database::DatabaseError;
use crate::storage::StorageError;

/// Failure of a page handler. The four recoverable kinds respond as a
/// flash-message redirect to the index; an infrastructure fault responds as
/// a plain 500 and is only visible in the log.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("notebook does not exist, or you don't have access to it")]
    NotFound,

    #[error("invalid uuid")]
    InvalidUuid(#[from] uuid::Error),

    #[error("notebook already shared with that user")]
    AlreadyShared,

    #[error(transparent)]
    Database(DatabaseError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<DatabaseError> for PageError {
    fn from(e: DatabaseError) -> Self {
        match e {
            DatabaseError::NotFound => PageError::NotFound,
            DatabaseError::AlreadyExists => PageError::AlreadyShared,
            _ => PageError::Database(e),
        }
    }
}

impl<'r> Responder<'r, 'static> for PageError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        match self {
            PageError::NotFound
                | PageError::InvalidUuid(_)
                | PageError::AlreadyShared
            => Flash::error(
                Redirect::to(uri!(crate::routes::web::index)),
                self.to_string(),
            ).respond_to(request),

            PageError::Database(e) => {
                error!("database failure while serving a page: {e}");
                Err(Status::InternalServerError)
            },

            PageError::Storage(e) => {
                error!("note storage failure while serving a page: {e}");
                Err(Status::InternalServerError)
            },
        }
    }
}
