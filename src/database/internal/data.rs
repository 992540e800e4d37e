use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::data::{Note, Notebook, NotebookShare};

/// On-disk shape of the database file. Users are provisioned by editing the
/// file directly; the `notemark_gen` binary prints the id and hash lines.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(super) struct DatabaseData {
    #[serde(rename = "user", default)]
    pub users: Vec<UserData>,

    #[serde(rename = "notebook", default)]
    pub notebooks: Vec<Notebook>,

    #[serde(rename = "note", default)]
    pub notes: Vec<Note>,

    #[serde(rename = "share", default)]
    pub shares: Vec<NotebookShare>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub(super) struct UserData {
    pub id: Uuid,
    pub username: String,
    pub hash: String,
}
