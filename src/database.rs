mod errors;
mod internal;

use async_trait::async_trait;
use uuid::Uuid;

pub use errors::*;
pub use internal::ProductionDatabase;

use crate::data::{AccessScope, Note, Notebook, User};

/// Record store for users, notebooks, notes and shares, persisted to a TOML
/// file under the data directory. Note bodies live in [`crate::storage`],
/// not here.
#[async_trait]
pub trait Database: Send + Sync {
    /// Notebooks owned by the given user, ordered by prefix.
    async fn get_all_personal_notebooks(
        &self,
        owner: Uuid,
    ) -> Result<Vec<Notebook>, DatabaseError>;

    /// Notebooks shared with the given user (at either level), ordered by
    /// prefix.
    async fn get_shared_notebooks(
        &self,
        user: Uuid,
    ) -> Result<Vec<Notebook>, DatabaseError>;

    async fn get_personal_notebook(
        &self,
        notebook: Uuid,
    ) -> Result<Notebook, DatabaseError>;

    /// All known users, ordered by username. Used to populate the share
    /// form of the notebook view.
    async fn get_users(&self) -> Result<Vec<User>, DatabaseError>;

    /// Verifies a username/password pair against the stored hash. Returns
    /// the matching user on success and `None` on any mismatch, including an
    /// unknown username.
    async fn check_user_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DatabaseError>;

    async fn get_notes(
        &self,
        notebook: Uuid,
    ) -> Result<Vec<Note>, DatabaseError>;

    async fn get_note(&self, note: Uuid) -> Result<Note, DatabaseError>;

    async fn create_notebook(
        &self,
        owner: Uuid,
        prefix: &str,
    ) -> Result<Notebook, DatabaseError>;

    /// Removes the notebook together with its notes and shares. The caller
    /// is responsible for removing the on-disk note folder afterwards.
    async fn delete_notebook(&self, notebook: Uuid) -> Result<(), DatabaseError>;

    /// Grants the user read (or, with `write_access`, write) scope on the
    /// notebook. At most one share may exist per (notebook, user) pair;
    /// a second grant fails with [`DatabaseError::AlreadyExists`] and leaves
    /// the original untouched.
    async fn create_notebook_user_share(
        &self,
        notebook: Uuid,
        user: Uuid,
        write_access: bool,
    ) -> Result<(), DatabaseError>;

    async fn create_note(
        &self,
        notebook: Uuid,
        prefix: &str,
    ) -> Result<Note, DatabaseError>;

    async fn delete_note(&self, note: Uuid) -> Result<(), DatabaseError>;

    /// Computes the user's effective scope on the notebook — `Owner` for the
    /// notebook's owner, otherwise the level of a matching share — and
    /// succeeds only if that scope is a member of `allowed`.
    ///
    /// An unknown notebook, a caller with no scope at all, and a scope
    /// outside `allowed` all fail with the same [`DatabaseError::NotFound`],
    /// so a caller cannot tell a missing notebook from one it may not touch.
    async fn check_notebook_access(
        &self,
        user: Uuid,
        notebook: Uuid,
        allowed: &[AccessScope],
    ) -> Result<AccessScope, DatabaseError>;
}
