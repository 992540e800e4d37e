use std::borrow::Cow;
use std::path::{Path, PathBuf};

use log::{error, warn};
use tokio::io;
use tokio::io::AsyncReadExt;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::lib_constants::{
    NOTEBOOKS_DIR, NOTE_HTML_EXT, NOTE_MD_EXT, RENDERED_NOTE_SIZE_FACTOR,
};
use crate::markdown::render_markdown;
use crate::storage::errors::StorageError;
use crate::storage::internal::io_trait::{
    Metadata, NoteStorageIo, ProductionNoteStorageIo,
};

mod io_trait;
#[cfg(test)] mod tests;

const REQUIRED_UNIX_PERMISSIONS: u32 = 0o700;

pub type NoteStorage = NoteStorageImpl<ProductionNoteStorageIo>;

/// Keeps note bodies on disk as
/// `<data>/notebooks/<notebook>/<note>.md` with the rendered
/// `<note>.html` next to it.
#[allow(private_bounds)]
#[derive(Debug)]
pub struct NoteStorageImpl<Io: NoteStorageIo> {
    io: Io,
    basedir: PathBuf,
    max_note_size: u64,
}

impl NoteStorage {
    pub async fn new(
        app_config: &AppConfig,
    ) -> Result<NoteStorage, StorageError> {
        Self::new_internal(app_config, ProductionNoteStorageIo::new()).await
    }
}

#[allow(private_bounds)]
impl<Io: NoteStorageIo> NoteStorageImpl<Io> {
    async fn new_internal(
        app_config: &AppConfig,
        io: Io,
    ) -> Result<NoteStorageImpl<Io>, StorageError> {
        let meta = io.metadata(&app_config.data_directory).await?;
        validate_note_root_permissions(&io, &meta)?;
        let basedir = app_config.data_directory.join(NOTEBOOKS_DIR);
        io.create_dir_all(&basedir).await?;
        Ok(
            NoteStorageImpl {
                io,
                basedir,
                max_note_size: app_config.max_note_size,
            }
        )
    }

    /// Writes the Markdown source and its rendered HTML sibling. Each file
    /// lands via a tmp file and a rename so readers never observe a partial
    /// note.
    pub async fn write_note_md(
        &self,
        notebook: Uuid,
        note: Uuid,
        markdown: &str,
    ) -> Result<(), StorageError> {
        self.io.create_dir_all(&self.notebook_dir(notebook)).await?;
        self.write_atomic(
            &self.note_path(notebook, note, NOTE_MD_EXT),
            markdown.as_bytes(),
        ).await?;
        let html = render_markdown(markdown);
        self.write_atomic(
            &self.note_path(notebook, note, NOTE_HTML_EXT),
            html.as_bytes(),
        ).await?;
        Ok(())
    }

    pub async fn read_note_md(
        &self,
        notebook: Uuid,
        note: Uuid,
    ) -> Result<String, StorageError> {
        self.read_limited(
            &self.note_path(notebook, note, NOTE_MD_EXT),
            self.max_note_size,
        ).await
    }

    pub async fn read_note_html(
        &self,
        notebook: Uuid,
        note: Uuid,
    ) -> Result<String, StorageError> {
        self.read_limited(
            &self.note_path(notebook, note, NOTE_HTML_EXT),
            self.max_note_size.saturating_mul(RENDERED_NOTE_SIZE_FACTOR),
        ).await
    }

    /// Removes the Markdown source; the rendered sibling is derived data and
    /// its removal is best-effort.
    pub async fn delete_note_file(
        &self,
        notebook: Uuid,
        note: Uuid,
    ) -> Result<(), StorageError> {
        self.io
            .remove_file(&self.note_path(notebook, note, NOTE_MD_EXT))
            .await?;
        let html = self.note_path(notebook, note, NOTE_HTML_EXT);
        if let Err(e) = self.io.remove_file(&html).await {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(
                    "failed to remove rendered note file {}: {e}",
                    html.display(),
                );
            }
        }
        Ok(())
    }

    /// A notebook that never had a note written has no folder; that case is
    /// not an error.
    pub async fn delete_notebook_folder(
        &self,
        notebook: Uuid,
    ) -> Result<(), StorageError> {
        match self.io.remove_dir_all(&self.notebook_dir(notebook)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_atomic(
        &self,
        path: &Path,
        data: &[u8],
    ) -> Result<(), StorageError> {
        let tmp = self.tmp_path(path);
        self.io.write_file(&tmp, data).await?;
        if let Err(e) = self.io.rename_file(&tmp, path).await {
            if let Err(cleanup) = self.io.remove_file(&tmp).await {
                error!(
                    "failed to remove stale tmp file {}: {cleanup}",
                    tmp.display(),
                );
            }
            return Err(e.into());
        }
        Ok(())
    }

    async fn read_limited(
        &self,
        path: &Path,
        limit: u64,
    ) -> Result<String, StorageError> {
        let (file, size) = self.io.open_file(path).await?;
        if size > limit {
            return Err(StorageError::TooBigError);
        }
        read_limited_utf8_lossy(limit, file).await
    }

    fn notebook_dir(&self, notebook: Uuid) -> PathBuf {
        self.basedir.join(notebook.to_string())
    }

    fn note_path(&self, notebook: Uuid, note: Uuid, ext: &str) -> PathBuf {
        self.notebook_dir(notebook).join(format!("{note}.{ext}"))
    }

    fn tmp_path(&self, path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_owned();
        name.push(format!(".tmp.{}", self.io.generate_uuid()));
        PathBuf::from(name)
    }
}

fn validate_note_root_permissions<Io: NoteStorageIo>(
    io: &Io,
    meta: &Metadata,
) -> Result<(), StorageError> {
    if !meta.is_dir {
        return Err(StorageError::DirectoryDoesNotExist);
    }
    if meta.uid != io.getuid()
        || meta.mode & REQUIRED_UNIX_PERMISSIONS != REQUIRED_UNIX_PERMISSIONS {
        return Err(StorageError::PermissionError)
    }
    Ok(())
}

async fn read_limited_utf8_lossy<R: io::AsyncRead + Unpin>(
    limit: u64,
    reader: R
) -> Result<String, StorageError> {
    let mut buf = Vec::with_capacity(limit as usize);
    io::BufReader::new(reader).take(limit).read_to_end(&mut buf).await?;
    Ok(
        match String::from_utf8_lossy(&buf) {
            Cow::Borrowed(_) => unsafe { String::from_utf8_unchecked(buf) },
            owned@Cow::Owned(_) => owned.into_owned(),
        }
    )
}
