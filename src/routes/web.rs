use rocket::form::Form;
use rocket::request::FlashMessage;
use rocket::response::{Flash, Redirect};
use rocket::{get, post, routes, uri, Build, Rocket, State};
use rocket_dyn_templates::{context, Template};
use uuid::Uuid;

use crate::data::AccessScope;
use crate::database::Database;
use crate::routes::flash_parts;
use crate::storage::NoteStorage;
use crate::util::StrExt;

mod authentication_guard;
mod errors;
pub(crate) mod forms;

pub use authentication_guard::CurrentUser;
pub use errors::PageError;

use forms::{EditNoteForm, NewNoteForm, NewNotebookForm, ShareNotebookForm};

const MSG_MISSING_FIELDS: &str = "required fields missing";

const READ_SCOPES: &[AccessScope] = &[AccessScope::Read, AccessScope::Owner];
const WRITE_SCOPES: &[AccessScope] = &[AccessScope::Write, AccessScope::Owner];
const OWNER_SCOPES: &[AccessScope] = &[AccessScope::Owner];

#[get("/")]
pub(crate) async fn index(
    user: CurrentUser,
    db: &State<Box<dyn Database>>,
    flash: Option<FlashMessage<'_>>,
) -> Result<Template, PageError> {
    let owned_notebooks = db.get_all_personal_notebooks(user.id()).await?;
    let shared_notebooks = db.get_shared_notebooks(user.id()).await?;
    Ok(
        Template::render(
            "index",
            context! {
                owned_notebooks,
                shared_notebooks,
                flash: flash_parts(&flash),
            },
        )
    )
}

#[get("/notebook/new")]
pub(crate) fn new_notebook_page(
    _user: CurrentUser,
    flash: Option<FlashMessage<'_>>,
) -> Template {
    Template::render(
        "notebook/create",
        context! {
            flash: flash_parts(&flash),
        },
    )
}

#[post("/notebook/new", data = "<form>")]
pub(crate) async fn new_notebook(
    user: CurrentUser,
    db: &State<Box<dyn Database>>,
    form: Option<Form<NewNotebookForm<'_>>>,
) -> Result<Flash<Redirect>, PageError> {
    let prefix = form.as_deref().and_then(|f| f.prefix.nonblank_to_some());
    let Some(prefix) = prefix else {
        return Ok(
            Flash::error(
                Redirect::to(uri!(new_notebook_page)),
                MSG_MISSING_FIELDS,
            )
        );
    };
    let notebook = db.create_notebook(user.id(), &prefix).await?;
    Ok(
        Flash::success(
            Redirect::to(
                uri!(get_notebook(notebook_uuid = notebook.id.to_string())),
            ),
            "notebook created",
        )
    )
}

#[get("/notebook/<notebook_uuid>")]
pub(crate) async fn get_notebook(
    notebook_uuid: &str,
    user: CurrentUser,
    db: &State<Box<dyn Database>>,
    flash: Option<FlashMessage<'_>>,
) -> Result<Template, PageError> {
    let notebook_uuid = Uuid::parse_str(notebook_uuid)?;
    let scope = db
        .check_notebook_access(user.id(), notebook_uuid, READ_SCOPES)
        .await?;
    let notebook = db.get_personal_notebook(notebook_uuid).await?;
    let users = db.get_users().await?;
    let notes = db.get_notes(notebook_uuid).await?;
    Ok(
        Template::render(
            "notebook/view",
            context! {
                scope,
                notebook,
                users,
                notes,
                flash: flash_parts(&flash),
            },
        )
    )
}

#[get("/notebook/<notebook_uuid>/delete")]
pub(crate) async fn delete_notebook(
    notebook_uuid: &str,
    user: CurrentUser,
    db: &State<Box<dyn Database>>,
    storage: &State<NoteStorage>,
) -> Result<Flash<Redirect>, PageError> {
    let notebook_uuid = Uuid::parse_str(notebook_uuid)?;
    db.check_notebook_access(user.id(), notebook_uuid, WRITE_SCOPES).await?;
    db.delete_notebook(notebook_uuid).await?;
    storage.delete_notebook_folder(notebook_uuid).await?;
    Ok(Flash::success(Redirect::to(uri!(index)), "notebook deleted"))
}

#[post("/notebook/<notebook_uuid>/share-user", data = "<form>")]
pub(crate) async fn add_user_share(
    notebook_uuid: &str,
    user: CurrentUser,
    db: &State<Box<dyn Database>>,
    form: Option<Form<ShareNotebookForm<'_>>>,
) -> Result<Flash<Redirect>, PageError> {
    let notebook_uuid = Uuid::parse_str(notebook_uuid)?;
    let Some(form) = form else {
        return Ok(
            Flash::error(
                Redirect::to(
                    uri!(get_notebook(notebook_uuid = notebook_uuid.to_string())),
                ),
                MSG_MISSING_FIELDS,
            )
        );
    };
    let user_uuid = Uuid::parse_str(form.user_uuid)?;
    db.check_notebook_access(user.id(), notebook_uuid, OWNER_SCOPES).await?;
    db.create_notebook_user_share(notebook_uuid, user_uuid, form.write_access)
        .await?;
    Ok(
        Flash::success(
            Redirect::to(
                uri!(get_notebook(notebook_uuid = notebook_uuid.to_string())),
            ),
            "shared notebook",
        )
    )
}

#[get("/notebook/<notebook_uuid>/notes/new")]
pub(crate) fn new_note_page(
    notebook_uuid: &str,
    _user: CurrentUser,
    flash: Option<FlashMessage<'_>>,
) -> Result<Template, PageError> {
    let notebook_uuid = Uuid::parse_str(notebook_uuid)?;
    Ok(
        Template::render(
            "note/create",
            context! {
                notebook_uuid: notebook_uuid.to_string(),
                flash: flash_parts(&flash),
            },
        )
    )
}

#[post("/notebook/<notebook_uuid>/notes/new", data = "<form>")]
pub(crate) async fn new_note(
    notebook_uuid: &str,
    user: CurrentUser,
    db: &State<Box<dyn Database>>,
    storage: &State<NoteStorage>,
    form: Option<Form<NewNoteForm<'_>>>,
) -> Result<Flash<Redirect>, PageError> {
    let notebook_uuid = Uuid::parse_str(notebook_uuid)?;
    let prefix = form.as_deref().and_then(|f| f.prefix.nonblank_to_some());
    let Some(prefix) = prefix else {
        return Ok(
            Flash::error(
                Redirect::to(
                    uri!(new_note_page(notebook_uuid = notebook_uuid.to_string())),
                ),
                MSG_MISSING_FIELDS,
            )
        );
    };
    db.check_notebook_access(user.id(), notebook_uuid, WRITE_SCOPES).await?;
    let note = db.create_note(notebook_uuid, &prefix).await?;
    storage.write_note_md(notebook_uuid, note.id, "").await?;
    Ok(
        Flash::success(
            Redirect::to(
                uri!(view_note(
                    notebook_uuid = notebook_uuid.to_string(),
                    note_uuid = note.id.to_string(),
                )),
            ),
            "note created",
        )
    )
}

#[get("/notebook/<notebook_uuid>/notes/<note_uuid>/view")]
pub(crate) async fn view_note(
    notebook_uuid: &str,
    note_uuid: &str,
    user: CurrentUser,
    db: &State<Box<dyn Database>>,
    storage: &State<NoteStorage>,
    flash: Option<FlashMessage<'_>>,
) -> Result<Template, PageError> {
    let notebook_uuid = Uuid::parse_str(notebook_uuid)?;
    let note_uuid = Uuid::parse_str(note_uuid)?;
    let scope = db
        .check_notebook_access(user.id(), notebook_uuid, READ_SCOPES)
        .await?;
    let note = db.get_note(note_uuid).await?;
    let content = storage.read_note_html(notebook_uuid, note_uuid).await?;
    Ok(
        Template::render(
            "note/view",
            context! {
                notebook_uuid: notebook_uuid.to_string(),
                note,
                content,
                scope,
                flash: flash_parts(&flash),
            },
        )
    )
}

#[get("/notebook/<notebook_uuid>/notes/<note_uuid>/edit")]
pub(crate) async fn edit_note_page(
    notebook_uuid: &str,
    note_uuid: &str,
    user: CurrentUser,
    db: &State<Box<dyn Database>>,
    storage: &State<NoteStorage>,
    flash: Option<FlashMessage<'_>>,
) -> Result<Template, PageError> {
    let notebook_uuid = Uuid::parse_str(notebook_uuid)?;
    let note_uuid = Uuid::parse_str(note_uuid)?;
    db.check_notebook_access(user.id(), notebook_uuid, WRITE_SCOPES).await?;
    let note = db.get_note(note_uuid).await?;
    let content = storage.read_note_md(notebook_uuid, note_uuid).await?;
    Ok(
        Template::render(
            "note/edit",
            context! {
                notebook_uuid: notebook_uuid.to_string(),
                note,
                content,
                flash: flash_parts(&flash),
            },
        )
    )
}

#[post("/notebook/<notebook_uuid>/notes/<note_uuid>/edit", data = "<form>")]
pub(crate) async fn edit_note(
    notebook_uuid: &str,
    note_uuid: &str,
    user: CurrentUser,
    db: &State<Box<dyn Database>>,
    storage: &State<NoteStorage>,
    form: Option<Form<EditNoteForm>>,
) -> Result<Flash<Redirect>, PageError> {
    let notebook_uuid = Uuid::parse_str(notebook_uuid)?;
    let note_uuid = Uuid::parse_str(note_uuid)?;
    db.check_notebook_access(user.id(), notebook_uuid, WRITE_SCOPES).await?;
    let Some(form) = form else {
        return Ok(
            Flash::error(
                Redirect::to(
                    uri!(edit_note_page(
                        notebook_uuid = notebook_uuid.to_string(),
                        note_uuid = note_uuid.to_string(),
                    )),
                ),
                MSG_MISSING_FIELDS,
            )
        );
    };
    // TODO: bump the note's updated_at when the content changes
    storage.write_note_md(notebook_uuid, note_uuid, &form.content).await?;
    Ok(
        Flash::success(
            Redirect::to(
                uri!(edit_note_page(
                    notebook_uuid = notebook_uuid.to_string(),
                    note_uuid = note_uuid.to_string(),
                )),
            ),
            "note saved",
        )
    )
}

#[get("/notebook/<notebook_uuid>/notes/<note_uuid>/delete")]
pub(crate) async fn delete_note(
    notebook_uuid: &str,
    note_uuid: &str,
    user: CurrentUser,
    db: &State<Box<dyn Database>>,
    storage: &State<NoteStorage>,
) -> Result<Flash<Redirect>, PageError> {
    let notebook_uuid = Uuid::parse_str(notebook_uuid)?;
    let note_uuid = Uuid::parse_str(note_uuid)?;
    db.check_notebook_access(user.id(), notebook_uuid, WRITE_SCOPES).await?;
    db.delete_note(note_uuid).await?;
    storage.delete_note_file(notebook_uuid, note_uuid).await?;
    Ok(
        Flash::success(
            Redirect::to(
                uri!(get_notebook(notebook_uuid = notebook_uuid.to_string())),
            ),
            "note deleted",
        )
    )
}

pub trait WebRocketBuildExt {
    fn install_notemark_web(self) -> Self;
}

impl WebRocketBuildExt for Rocket<Build> {
    fn install_notemark_web(self) -> Self {
        self
            .mount(
                "/",
                routes![
                    index,
                    new_notebook_page,
                    new_notebook,
                    get_notebook,
                    delete_notebook,
                    add_user_share,
                    new_note_page,
                    new_note,
                    view_note,
                    edit_note_page,
                    edit_note,
                    delete_note,
                ]
            )
    }
}
