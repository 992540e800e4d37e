use std::path::Path;

use async_trait::async_trait;
use tokio::{fs, io};
use uuid::Uuid;

use crate::rng::make_uuid;

#[async_trait]
pub(super) trait NoteStorageIo: Send + Sync {
    async fn metadata(&self, path: &Path) -> io::Result<Metadata>;

    async fn open_file(
        &self,
        path: &Path,
    ) -> io::Result<(Box<dyn io::AsyncRead + Unpin + Send>, u64)>;

    async fn write_file(&self, path: &Path, data: &[u8]) -> io::Result<()>;

    async fn rename_file(&self, from: &Path, to: &Path) -> io::Result<()>;

    async fn remove_file(&self, path: &Path) -> io::Result<()>;

    async fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    async fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    fn getuid(&self) -> u32;

    fn generate_uuid(&self) -> Uuid;
}

pub(super) struct Metadata {
    pub is_dir: bool,
    pub uid: u32,
    pub mode: u32,
}

pub struct ProductionNoteStorageIo;

impl ProductionNoteStorageIo {
    pub fn new() -> Self {
        ProductionNoteStorageIo
    }
}

#[async_trait]
impl NoteStorageIo for ProductionNoteStorageIo {
    async fn metadata(&self, path: &Path) -> io::Result<Metadata> {
        let meta = fs::metadata(path).await?;
        Ok(make_metadata(&meta))
    }

    async fn open_file(
        &self,
        path: &Path,
    ) -> io::Result<(Box<dyn io::AsyncRead + Unpin + Send>, u64)> {
        let file = fs::File::open(path).await?;
        let size = file.metadata().await?.len();
        Ok((Box::new(file), size))
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        fs::write(path, data).await
    }

    async fn rename_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to).await
    }

    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path).await
    }

    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path).await
    }

    async fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path).await
    }

    #[cfg(unix)]
    fn getuid(&self) -> u32 {
        unsafe { libc::getuid() }
    }

    #[cfg(not(unix))]
    fn getuid(&self) -> u32 {
        0
    }

    fn generate_uuid(&self) -> Uuid {
        make_uuid(&mut rand::thread_rng())
    }
}

#[cfg(unix)]
fn make_metadata(meta: &std::fs::Metadata) -> Metadata {
    use std::os::unix::prelude::*;

    Metadata {
        is_dir: meta.is_dir(),
        uid: meta.uid(),
        mode: meta.mode(),
    }
}

#[cfg(not(unix))]
fn make_metadata(meta: &std::fs::Metadata) -> Metadata {
    Metadata {
        is_dir: meta.is_dir(),
        uid: 0,
        mode: 0o700,
    }
}
