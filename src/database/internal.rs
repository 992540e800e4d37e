use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::ops::Deref;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::data::{AccessScope, Note, Notebook, NotebookShare, User};
use crate::database::internal::data::{DatabaseData, UserData};
use crate::database::internal::io_trait::{DatabaseIo, ProductionDatabaseIo};
use crate::database::{Database, DatabaseError};
use crate::hasher::{Hasher, ProductionHasher};
use crate::lib_constants::DATABASE_FILE;

mod data;
mod io_trait;
#[cfg(test)] mod tests;

pub type ProductionDatabase = DatabaseImpl<ProductionHasher, ProductionDatabaseIo>;

#[allow(private_bounds)]
pub struct DatabaseImpl<H: Hasher, Io: DatabaseIo> {
    state: RwLock<State>,
    hasher: H,
    io: Io,
}

struct UserRecord {
    user: User,
    hash: String,
}

struct State {
    users: Vec<UserRecord>,
    notebooks: HashMap<Uuid, Notebook>,
    notes: HashMap<Uuid, Note>,

    // (notebook, user) -> write access; key uniqueness is the share
    // uniqueness invariant
    shares: HashMap<(Uuid, Uuid), bool>,
}

impl From<DatabaseData> for State {
    fn from(value: DatabaseData) -> Self {
        State {
            users: value.users
                .into_iter()
                .map(|u| UserRecord {
                    user: User {
                        id: u.id,
                        username: u.username,
                    },
                    hash: u.hash,
                })
                .collect(),
            notebooks: value.notebooks
                .into_iter()
                .map(|n| (n.id, n))
                .collect(),
            notes: value.notes
                .into_iter()
                .map(|n| (n.id, n))
                .collect(),
            shares: value.shares
                .into_iter()
                .map(|s| ((s.notebook, s.user), s.write_access))
                .collect(),
        }
    }
}

impl State {
    // stable record order keeps the file diffable
    fn to_data(&self) -> DatabaseData {
        let mut notebooks: Vec<_> = self.notebooks.values().cloned().collect();
        notebooks.sort_by_key(|n| n.id);
        let mut notes: Vec<_> = self.notes.values().cloned().collect();
        notes.sort_by_key(|n| n.id);
        let mut shares: Vec<_> = self.shares
            .iter()
            .map(|(&(notebook, user), &write_access)| NotebookShare {
                notebook,
                user,
                write_access,
            })
            .collect();
        shares.sort_by_key(|s| (s.notebook, s.user));
        DatabaseData {
            users: self.users
                .iter()
                .map(|r| UserData {
                    id: r.user.id,
                    username: r.user.username.clone(),
                    hash: r.hash.clone(),
                })
                .collect(),
            notebooks,
            notes,
            shares,
        }
    }
}

impl ProductionDatabase {
    pub async fn new(
        app_config: &AppConfig,
        hasher: ProductionHasher,
    ) -> Result<ProductionDatabase, DatabaseError> {
        let io = ProductionDatabaseIo::new(
            app_config.data_directory.join(DATABASE_FILE),
        );
        Self::new_internal(hasher, io).await
    }
}

#[allow(private_bounds)]
impl<H: Hasher, Io: DatabaseIo> DatabaseImpl<H, Io> {
    async fn new_internal(
        hasher: H,
        io: Io,
    ) -> Result<DatabaseImpl<H, Io>, DatabaseError> {
        let state: State = io.read_database_file().await?.into();
        Ok(
            DatabaseImpl {
                state: RwLock::new(state),
                hasher,
                io,
            }
        )
    }

    async fn write_state(
        &self,
        state: impl Deref<Target=State>,
    ) -> Result<(), DatabaseError> {
        self.io.write_database_file(state.to_data()).await
    }
}

fn sorted_by_prefix(mut notebooks: Vec<Notebook>) -> Vec<Notebook> {
    notebooks.sort_by(|a, b| a.prefix.cmp(&b.prefix).then(a.id.cmp(&b.id)));
    notebooks
}

#[async_trait]
impl<H: Hasher, Io: DatabaseIo> Database for DatabaseImpl<H, Io> {
    async fn get_all_personal_notebooks(
        &self,
        owner: Uuid,
    ) -> Result<Vec<Notebook>, DatabaseError> {
        let state = self.state.read().await;
        Ok(
            sorted_by_prefix(
                state.notebooks
                    .values()
                    .filter(|n| n.owner == owner)
                    .cloned()
                    .collect()
            )
        )
    }

    async fn get_shared_notebooks(
        &self,
        user: Uuid,
    ) -> Result<Vec<Notebook>, DatabaseError> {
        let state = self.state.read().await;
        Ok(
            sorted_by_prefix(
                state.shares
                    .keys()
                    .filter(|(_, sharee)| *sharee == user)
                    .filter_map(|(notebook, _)| state.notebooks.get(notebook))
                    .cloned()
                    .collect()
            )
        )
    }

    async fn get_personal_notebook(
        &self,
        notebook: Uuid,
    ) -> Result<Notebook, DatabaseError> {
        self.state.read().await
            .notebooks
            .get(&notebook)
            .cloned()
            .ok_or(DatabaseError::NotFound)
    }

    async fn get_users(&self) -> Result<Vec<User>, DatabaseError> {
        let state = self.state.read().await;
        let mut users: Vec<_> = state.users
            .iter()
            .map(|r| r.user.clone())
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn check_user_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DatabaseError> {
        debug!("checking credentials of user \"{username}\"");
        let state = self.state.read().await;
        let record = state.users
            .iter()
            .find(|r| r.user.username == username);
        match record {
            Some(record) if self.hasher.check_hash(&record.hash, password) =>
                Ok(Some(record.user.clone())),
            Some(_) => {
                warn!("invalid password for user \"{username}\"");
                Ok(None)
            },
            None => {
                warn!("login attempt for unknown user \"{username}\"");
                Ok(None)
            },
        }
    }

    async fn get_notes(
        &self,
        notebook: Uuid,
    ) -> Result<Vec<Note>, DatabaseError> {
        let state = self.state.read().await;
        let mut notes: Vec<_> = state.notes
            .values()
            .filter(|n| n.notebook == notebook)
            .cloned()
            .collect();
        notes.sort_by(|a, b| a.prefix.cmp(&b.prefix).then(a.id.cmp(&b.id)));
        Ok(notes)
    }

    async fn get_note(&self, note: Uuid) -> Result<Note, DatabaseError> {
        self.state.read().await
            .notes
            .get(&note)
            .cloned()
            .ok_or(DatabaseError::NotFound)
    }

    async fn create_notebook(
        &self,
        owner: Uuid,
        prefix: &str,
    ) -> Result<Notebook, DatabaseError> {
        let mut state = self.state.write().await;
        let now = self.io.now();
        let notebook = Notebook {
            id: self.io.generate_uuid(),
            owner,
            prefix: prefix.to_owned(),
            created_at: now,
            updated_at: now,
        };
        state.notebooks.insert(notebook.id, notebook.clone());
        self.write_state(state).await?;
        info!("created notebook {} for user {owner}", notebook.id);
        Ok(notebook)
    }

    async fn delete_notebook(&self, notebook: Uuid) -> Result<(), DatabaseError> {
        let mut state = self.state.write().await;
        if state.notebooks.remove(&notebook).is_none() {
            return Err(DatabaseError::NotFound);
        }
        state.notes.retain(|_, n| n.notebook != notebook);
        state.shares.retain(|(shared, _), _| *shared != notebook);
        self.write_state(state).await?;
        info!("deleted notebook {notebook} with its notes and shares");
        Ok(())
    }

    async fn create_notebook_user_share(
        &self,
        notebook: Uuid,
        user: Uuid,
        write_access: bool,
    ) -> Result<(), DatabaseError> {
        let mut state = self.state.write().await;
        if !state.notebooks.contains_key(&notebook) {
            return Err(DatabaseError::NotFound);
        }
        if !state.users.iter().any(|r| r.user.id == user) {
            return Err(DatabaseError::NotFound);
        }
        match state.shares.entry((notebook, user)) {
            Entry::Occupied(_) => return Err(DatabaseError::AlreadyExists),
            Entry::Vacant(entry) => {
                entry.insert(write_access);
            },
        }
        self.write_state(state).await?;
        info!(
            "shared notebook {notebook} with user {user} \
                (write access: {write_access})",
        );
        Ok(())
    }

    async fn create_note(
        &self,
        notebook: Uuid,
        prefix: &str,
    ) -> Result<Note, DatabaseError> {
        let mut state = self.state.write().await;
        if !state.notebooks.contains_key(&notebook) {
            return Err(DatabaseError::NotFound);
        }
        let now = self.io.now();
        let note = Note {
            id: self.io.generate_uuid(),
            notebook,
            prefix: prefix.to_owned(),
            created_at: now,
            updated_at: now,
        };
        state.notes.insert(note.id, note.clone());
        self.write_state(state).await?;
        info!("created note {} in notebook {notebook}", note.id);
        Ok(note)
    }

    async fn delete_note(&self, note: Uuid) -> Result<(), DatabaseError> {
        let mut state = self.state.write().await;
        if state.notes.remove(&note).is_none() {
            return Err(DatabaseError::NotFound);
        }
        self.write_state(state).await?;
        info!("deleted note {note}");
        Ok(())
    }

    async fn check_notebook_access(
        &self,
        user: Uuid,
        notebook: Uuid,
        allowed: &[AccessScope],
    ) -> Result<AccessScope, DatabaseError> {
        let state = self.state.read().await;
        let record = state.notebooks
            .get(&notebook)
            .ok_or(DatabaseError::NotFound)?;
        let scope = if record.owner == user {
            AccessScope::Owner
        } else {
            state.shares
                .get(&(notebook, user))
                .map(|&write_access| {
                    if write_access {
                        AccessScope::Write
                    } else {
                        AccessScope::Read
                    }
                })
                .ok_or(DatabaseError::NotFound)?
        };
        if allowed.contains(&scope) {
            debug!("user {user} accesses notebook {notebook} as {scope}");
            Ok(scope)
        } else {
            warn!(
                "user {user} denied on notebook {notebook}: \
                    scope {scope} not in {allowed:?}",
            );
            Err(DatabaseError::NotFound)
        }
    }
}
