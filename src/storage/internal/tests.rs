use mocks::{StorageWrite, TestStorageIo};

use super::*;


const NOTEBOOK: Uuid = Uuid::from_u128(0xA);
const NOTE: Uuid = Uuid::from_u128(0xB);

fn test_config(max_note_size: u64) -> AppConfig {
    AppConfig {
        data_directory: "/data".into(),
        max_note_size,
        ..AppConfig::default()
    }
}

async fn make_storage(io: TestStorageIo) -> NoteStorageImpl<TestStorageIo> {
    NoteStorageImpl::new_internal(&test_config(1024), io)
        .await
        .expect("storage creation failed")
}

fn md_path() -> PathBuf {
    PathBuf::from(format!("/data/notebooks/{NOTEBOOK}/{NOTE}.md"))
}

fn html_path() -> PathBuf {
    PathBuf::from(format!("/data/notebooks/{NOTEBOOK}/{NOTE}.html"))
}

#[tokio::test]
async fn create_storage_ok() {
    let storage = make_storage(TestStorageIo::new()).await;
    assert!(storage.io.has_dir("/data/notebooks").await);
}

#[tokio::test]
async fn create_storage_missing_root() {
    let err = NoteStorageImpl::new_internal(
        &test_config(1024),
        TestStorageIo::empty(),
    ).await.expect_err("should fail");
    assert!(matches!(err, StorageError::IoError(_)), "wrong error type: {err:#?}");
}

#[tokio::test]
async fn create_storage_root_not_a_directory() {
    let io = TestStorageIo::empty();
    io.insert_file("/data", b"not a dir").await;
    let err = NoteStorageImpl::new_internal(&test_config(1024), io)
        .await.expect_err("should fail");
    assert!(
        matches!(err, StorageError::DirectoryDoesNotExist),
        "wrong error type: {err:#?}",
    );
}

#[tokio::test]
async fn create_storage_other_owner() {
    let err = NoteStorageImpl::new_internal(
        &test_config(1024),
        TestStorageIo::new().with_root_owner(2),
    ).await.expect_err("should fail");
    assert!(
        matches!(err, StorageError::PermissionError),
        "wrong error type: {err:#?}",
    );
}

#[tokio::test]
async fn create_storage_weak_permissions() {
    let err = NoteStorageImpl::new_internal(
        &test_config(1024),
        TestStorageIo::new().with_root_mode(0o600),
    ).await.expect_err("should fail");
    assert!(
        matches!(err, StorageError::PermissionError),
        "wrong error type: {err:#?}",
    );
}

#[tokio::test]
async fn write_note_writes_source_and_rendered_file() {
    let storage = make_storage(TestStorageIo::new()).await;
    storage.write_note_md(NOTEBOOK, NOTE, "- buy milk")
        .await.expect("write failed");

    assert_eq!(
        storage.io.file_contents(&md_path()).await.as_deref(),
        Some("- buy milk".as_bytes()),
    );
    let html = storage.io.file_contents(&html_path()).await
        .expect("rendered file missing");
    assert!(
        String::from_utf8_lossy(&html).contains("<li>buy milk</li>"),
        "unexpected rendered note: {html:?}",
    );
}

#[tokio::test]
async fn write_note_goes_through_tmp_files() {
    let storage = make_storage(TestStorageIo::new()).await;
    storage.write_note_md(NOTEBOOK, NOTE, "hello")
        .await.expect("write failed");

    let md_tmp = PathBuf::from(
        format!("{}.tmp.{}", md_path().display(), Uuid::from_u128(0)),
    );
    let html_tmp = PathBuf::from(
        format!("{}.tmp.{}", html_path().display(), Uuid::from_u128(1)),
    );
    let events = storage.io.get_events().await;
    assert_eq!(
        events,
        vec![
            StorageWrite::Write {
                path: md_tmp.clone(),
                data: b"hello".to_vec(),
            },
            StorageWrite::Rename {
                from: md_tmp,
                to: md_path(),
            },
            StorageWrite::Write {
                path: html_tmp.clone(),
                data: b"<p>hello</p>\n".to_vec(),
            },
            StorageWrite::Rename {
                from: html_tmp,
                to: html_path(),
            },
        ],
    );
}

#[tokio::test]
async fn markdown_round_trips_unchanged() {
    let storage = make_storage(TestStorageIo::new()).await;
    let content = "# title\n\n- buy milk\n\ttabbed\nträiling  ";
    storage.write_note_md(NOTEBOOK, NOTE, content)
        .await.expect("write failed");
    let read = storage.read_note_md(NOTEBOOK, NOTE)
        .await.expect("read failed");
    assert_eq!(read, content);
}

#[tokio::test]
async fn overwrite_returns_latest_content() {
    let storage = make_storage(TestStorageIo::new()).await;
    storage.write_note_md(NOTEBOOK, NOTE, "first").await.expect("write failed");
    storage.write_note_md(NOTEBOOK, NOTE, "second").await.expect("write failed");
    let read = storage.read_note_md(NOTEBOOK, NOTE).await.expect("read failed");
    assert_eq!(read, "second");
}

#[tokio::test]
async fn read_note_too_big() {
    let io = TestStorageIo::new();
    io.insert_file(md_path(), &[b'x'; 16]).await;
    let storage = NoteStorageImpl::new_internal(&test_config(8), io)
        .await.expect("storage creation failed");
    let err = storage.read_note_md(NOTEBOOK, NOTE)
        .await.expect_err("should fail");
    assert!(matches!(err, StorageError::TooBigError), "wrong error type: {err:#?}");
}

#[tokio::test]
async fn read_note_invalid_utf8_is_lossy() {
    let io = TestStorageIo::new();
    io.insert_file(md_path(), &[b'o', b'k', 0xff, 0xfe]).await;
    let storage = NoteStorageImpl::new_internal(&test_config(1024), io)
        .await.expect("storage creation failed");
    let read = storage.read_note_md(NOTEBOOK, NOTE)
        .await.expect("read failed");
    assert!(read.starts_with("ok"), "unexpected contents: {read:?}");
}

#[tokio::test]
async fn read_missing_note_errors() {
    let storage = make_storage(TestStorageIo::new()).await;
    let err = storage.read_note_md(NOTEBOOK, NOTE)
        .await.expect_err("should fail");
    match err {
        StorageError::IoError(e) if e.kind() == io::ErrorKind::NotFound => (),
        e => panic!("wrong error type: {e:#?}"),
    }
}

#[tokio::test]
async fn write_note_rename_failure_cleans_tmp_file() {
    let storage = make_storage(TestStorageIo::new().with_failing_renames()).await;
    storage.write_note_md(NOTEBOOK, NOTE, "hello")
        .await.expect_err("should fail");

    let events = storage.io.get_events().await;
    assert_eq!(events.len(), 3);
    assert!(matches!(events[0], StorageWrite::Write { .. }));
    assert!(matches!(events[1], StorageWrite::Rename { .. }));
    assert!(matches!(events[2], StorageWrite::Remove { .. }));
    assert_eq!(storage.io.file_contents(&md_path()).await, None);
}

#[tokio::test]
async fn delete_note_removes_source_and_rendered_file() {
    let storage = make_storage(TestStorageIo::new()).await;
    storage.write_note_md(NOTEBOOK, NOTE, "hello").await.expect("write failed");
    storage.delete_note_file(NOTEBOOK, NOTE).await.expect("delete failed");
    assert_eq!(storage.io.file_contents(&md_path()).await, None);
    assert_eq!(storage.io.file_contents(&html_path()).await, None);
}

#[tokio::test]
async fn delete_note_tolerates_missing_rendered_file() {
    let io = TestStorageIo::new();
    io.insert_file(md_path(), b"hello").await;
    let storage = make_storage(io).await;
    storage.delete_note_file(NOTEBOOK, NOTE).await.expect("delete failed");
    assert_eq!(storage.io.file_contents(&md_path()).await, None);
}

#[tokio::test]
async fn delete_missing_note_errors() {
    let storage = make_storage(TestStorageIo::new()).await;
    storage.delete_note_file(NOTEBOOK, NOTE)
        .await.expect_err("should fail");
}

#[tokio::test]
async fn delete_notebook_folder_removes_notes() {
    let storage = make_storage(TestStorageIo::new()).await;
    storage.write_note_md(NOTEBOOK, NOTE, "hello").await.expect("write failed");
    storage.delete_notebook_folder(NOTEBOOK).await.expect("delete failed");
    assert_eq!(storage.io.file_contents(&md_path()).await, None);
    assert_eq!(storage.io.file_contents(&html_path()).await, None);
}

#[tokio::test]
async fn delete_missing_notebook_folder_is_ok() {
    let storage = make_storage(TestStorageIo::new()).await;
    storage.delete_notebook_folder(NOTEBOOK)
        .await.expect("missing folder should not be an error");
}

#[tokio::test]
async fn read_note_html_returns_rendered_content() {
    let storage = make_storage(TestStorageIo::new()).await;
    storage.write_note_md(NOTEBOOK, NOTE, "*hi*").await.expect("write failed");
    let html = storage.read_note_html(NOTEBOOK, NOTE)
        .await.expect("read failed");
    assert_eq!(html, "<p><em>hi</em></p>\n");
}
