mod errors;
mod internal;

pub use errors::*;
pub use internal::{NoteStorage, NoteStorageImpl};
