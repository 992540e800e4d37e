use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use time::macros::datetime;

use super::*;

struct TestHasher;

impl Hasher for TestHasher {
    fn generate_hash(
        &self,
        password: &str,
    ) -> Result<String, argon2::password_hash::Error> {
        Ok(format!("hashed:{password}"))
    }

    fn check_hash(&self, hash: &str, password: &str) -> bool {
        hash == format!("hashed:{password}")
    }
}

struct TestDatabaseIo {
    seed: DatabaseData,
    writes: Mutex<Vec<DatabaseData>>,
    uuid_counter: AtomicU32,
}

impl TestDatabaseIo {
    fn new(seed: DatabaseData) -> Self {
        TestDatabaseIo {
            seed,
            writes: Mutex::new(Vec::new()),
            // generated ids start well clear of the seeded ones
            uuid_counter: AtomicU32::new(0x1000),
        }
    }

    fn last_write(&self) -> DatabaseData {
        self.writes.lock().unwrap()
            .last()
            .expect("no database file write happened")
            .clone()
    }

    fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }
}

#[async_trait]
impl DatabaseIo for TestDatabaseIo {
    async fn read_database_file(&self) -> Result<DatabaseData, DatabaseError> {
        Ok(self.seed.clone())
    }

    async fn write_database_file(
        &self,
        data: DatabaseData,
    ) -> Result<(), DatabaseError> {
        self.writes.lock().unwrap().push(data);
        Ok(())
    }

    fn generate_uuid(&self) -> Uuid {
        Uuid::from_u128(self.uuid_counter.fetch_add(1, Ordering::Relaxed) as u128)
    }

    fn now(&self) -> time::OffsetDateTime {
        datetime!(2026-01-02 03:04:05 UTC)
    }
}

const ALICE: Uuid = Uuid::from_u128(1);
const BOB: Uuid = Uuid::from_u128(2);
const WORK: Uuid = Uuid::from_u128(0xA);
const TODO_NOTE: Uuid = Uuid::from_u128(0xB);

fn seed() -> DatabaseData {
    let created = datetime!(2025-12-31 10:00:00 UTC);
    DatabaseData {
        users: vec![
            UserData {
                id: ALICE,
                username: "alice".into(),
                hash: "hashed:123".into(),
            },
            UserData {
                id: BOB,
                username: "bob".into(),
                hash: "hashed:456".into(),
            },
        ],
        notebooks: vec![
            Notebook {
                id: WORK,
                owner: ALICE,
                prefix: "work".into(),
                created_at: created,
                updated_at: created,
            },
        ],
        notes: vec![
            Note {
                id: TODO_NOTE,
                notebook: WORK,
                prefix: "todo".into(),
                created_at: created,
                updated_at: created,
            },
        ],
        shares: vec![],
    }
}

async fn make_database(
    seed: DatabaseData,
) -> DatabaseImpl<TestHasher, TestDatabaseIo> {
    DatabaseImpl::new_internal(TestHasher, TestDatabaseIo::new(seed))
        .await
        .expect("database creation failed")
}

#[tokio::test]
async fn owner_scope_is_owner() {
    let db = make_database(seed()).await;
    let scope = db.check_notebook_access(
        ALICE,
        WORK,
        &[AccessScope::Read, AccessScope::Owner],
    ).await.expect("owner denied");
    assert_eq!(scope, AccessScope::Owner);
}

#[tokio::test]
async fn owner_scope_ignores_share_rows() {
    let mut data = seed();
    data.shares.push(NotebookShare {
        notebook: WORK,
        user: ALICE,
        write_access: false,
    });
    let db = make_database(data).await;
    let scope = db.check_notebook_access(ALICE, WORK, &[AccessScope::Owner])
        .await.expect("owner denied");
    assert_eq!(scope, AccessScope::Owner);
}

#[tokio::test]
async fn stranger_denied_same_as_missing_notebook() {
    let db = make_database(seed()).await;
    let all = [AccessScope::Read, AccessScope::Write, AccessScope::Owner];
    let denied = db.check_notebook_access(BOB, WORK, &all)
        .await.expect_err("should be denied");
    let missing = db.check_notebook_access(BOB, Uuid::from_u128(0xdead), &all)
        .await.expect_err("should be denied");
    assert!(matches!(denied, DatabaseError::NotFound), "wrong error: {denied:#?}");
    assert!(matches!(missing, DatabaseError::NotFound), "wrong error: {missing:#?}");
}

#[tokio::test]
async fn read_sharee_gets_read_scope() {
    let mut data = seed();
    data.shares.push(NotebookShare {
        notebook: WORK,
        user: BOB,
        write_access: false,
    });
    let db = make_database(data).await;
    let scope = db.check_notebook_access(
        BOB,
        WORK,
        &[AccessScope::Read, AccessScope::Owner],
    ).await.expect("sharee denied");
    assert_eq!(scope, AccessScope::Read);
}

#[tokio::test]
async fn read_sharee_denied_write() {
    let mut data = seed();
    data.shares.push(NotebookShare {
        notebook: WORK,
        user: BOB,
        write_access: false,
    });
    let db = make_database(data).await;
    let err = db.check_notebook_access(
        BOB,
        WORK,
        &[AccessScope::Write, AccessScope::Owner],
    ).await.expect_err("should be denied");
    assert!(matches!(err, DatabaseError::NotFound), "wrong error: {err:#?}");
}

#[tokio::test]
async fn write_sharee_gets_write_scope() {
    let mut data = seed();
    data.shares.push(NotebookShare {
        notebook: WORK,
        user: BOB,
        write_access: true,
    });
    let db = make_database(data).await;
    let scope = db.check_notebook_access(
        BOB,
        WORK,
        &[AccessScope::Write, AccessScope::Owner],
    ).await.expect("sharee denied");
    assert_eq!(scope, AccessScope::Write);
}

#[tokio::test]
async fn duplicate_share_conflicts_and_keeps_original() {
    let db = make_database(seed()).await;
    db.create_notebook_user_share(WORK, BOB, false)
        .await.expect("first share failed");
    let err = db.create_notebook_user_share(WORK, BOB, true)
        .await.expect_err("duplicate share accepted");
    assert!(matches!(err, DatabaseError::AlreadyExists), "wrong error: {err:#?}");

    // the original read-only grant must be untouched
    let scope = db.check_notebook_access(
        BOB,
        WORK,
        &[AccessScope::Read, AccessScope::Owner],
    ).await.expect("sharee denied");
    assert_eq!(scope, AccessScope::Read);
    assert_eq!(db.io.write_count(), 1);
}

#[tokio::test]
async fn share_with_unknown_user_is_not_found() {
    let db = make_database(seed()).await;
    let err = db.create_notebook_user_share(WORK, Uuid::from_u128(0xdead), false)
        .await.expect_err("should fail");
    assert!(matches!(err, DatabaseError::NotFound), "wrong error: {err:#?}");
}

#[tokio::test]
async fn share_on_unknown_notebook_is_not_found() {
    let db = make_database(seed()).await;
    let err = db.create_notebook_user_share(Uuid::from_u128(0xdead), BOB, false)
        .await.expect_err("should fail");
    assert!(matches!(err, DatabaseError::NotFound), "wrong error: {err:#?}");
}

#[tokio::test]
async fn create_notebook_persists() {
    let db = make_database(seed()).await;
    let notebook = db.create_notebook(BOB, "journal")
        .await.expect("create failed");
    assert_eq!(notebook.owner, BOB);
    assert_eq!(notebook.prefix, "journal");
    assert_eq!(notebook.created_at, datetime!(2026-01-02 03:04:05 UTC));

    let written = db.io.last_write();
    assert!(written.notebooks.iter().any(|n| n.id == notebook.id));
    assert_eq!(
        db.get_all_personal_notebooks(BOB).await.unwrap(),
        vec![notebook],
    );
}

#[tokio::test]
async fn personal_notebooks_sorted_by_prefix() {
    let db = make_database(seed()).await;
    let b = db.create_notebook(ALICE, "beta").await.unwrap();
    let a = db.create_notebook(ALICE, "alpha").await.unwrap();
    let prefixes: Vec<_> = db.get_all_personal_notebooks(ALICE)
        .await.unwrap()
        .into_iter()
        .map(|n| n.prefix)
        .collect();
    assert_eq!(prefixes, ["alpha", "beta", "work"]);
    assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn create_note_in_unknown_notebook_fails() {
    let db = make_database(seed()).await;
    let err = db.create_note(Uuid::from_u128(0xdead), "todo")
        .await.expect_err("should fail");
    assert!(matches!(err, DatabaseError::NotFound), "wrong error: {err:#?}");
}

#[tokio::test]
async fn delete_notebook_cascades() {
    let mut data = seed();
    data.shares.push(NotebookShare {
        notebook: WORK,
        user: BOB,
        write_access: false,
    });
    let db = make_database(data).await;
    db.delete_notebook(WORK).await.expect("delete failed");

    let err = db.get_note(TODO_NOTE).await.expect_err("note survived");
    assert!(matches!(err, DatabaseError::NotFound), "wrong error: {err:#?}");
    assert!(db.get_notes(WORK).await.unwrap().is_empty());
    assert!(db.get_shared_notebooks(BOB).await.unwrap().is_empty());

    let written = db.io.last_write();
    assert!(written.notebooks.is_empty());
    assert!(written.notes.is_empty());
    assert!(written.shares.is_empty());
}

#[tokio::test]
async fn delete_missing_note_is_not_found() {
    let db = make_database(seed()).await;
    let err = db.delete_note(Uuid::from_u128(0xdead))
        .await.expect_err("should fail");
    assert!(matches!(err, DatabaseError::NotFound), "wrong error: {err:#?}");
    assert_eq!(db.io.write_count(), 0);
}

#[tokio::test]
async fn credentials_accept_correct_password() {
    let db = make_database(seed()).await;
    let user = db.check_user_credentials("alice", "123")
        .await.expect("lookup failed")
        .expect("credentials rejected");
    assert_eq!(user.id, ALICE);
    assert_eq!(user.username, "alice");
}

#[tokio::test]
async fn credentials_reject_wrong_password() {
    let db = make_database(seed()).await;
    let user = db.check_user_credentials("alice", "wrong")
        .await.expect("lookup failed");
    assert!(user.is_none());
}

#[tokio::test]
async fn credentials_reject_unknown_user() {
    let db = make_database(seed()).await;
    let user = db.check_user_credentials("mallory", "123")
        .await.expect("lookup failed");
    assert!(user.is_none());
}
