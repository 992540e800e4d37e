use rocket::FromForm;

#[derive(Debug, FromForm)]
pub struct NewNotebookForm<'r> {
    pub prefix: &'r str,
}

#[derive(Debug, FromForm)]
pub struct NewNoteForm<'r> {
    pub prefix: &'r str,
}

#[derive(Debug, FromForm)]
pub struct ShareNotebookForm<'r> {
    pub user_uuid: &'r str,

    /// Grants write scope instead of read. Absent (unchecked) means read.
    #[field(default = false)]
    pub write_access: bool,
}

#[derive(Debug, FromForm)]
pub struct EditNoteForm {
    /// The full replacement Markdown source; an empty string clears the
    /// note.
    pub content: String,
}

#[derive(Debug, FromForm)]
pub struct LoginForm<'r> {
    pub username: &'r str,
    pub password: &'r str,
}
