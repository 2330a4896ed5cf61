use chrono::Duration;
use literacy_core::model::{UserId, WordId};
use literacy_core::time::fixed_now;
use storage::repository::{ProgressRepository, StorageError};
use storage::sqlite::SqliteRepository;

fn user(raw: &str) -> UserId {
    UserId::new(raw).unwrap()
}

fn word(raw: &str) -> WordId {
    WordId::new(raw).unwrap()
}

async fn memory_repo(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

struct TempDb {
    path: std::path::PathBuf,
}

impl TempDb {
    fn new(tag: &str) -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "literacy-{tag}-{}-{nanos}.sqlite3",
            std::process::id()
        ));
        Self { path }
    }

    fn url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.path.display())
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut p = self.path.clone().into_os_string();
            p.push(suffix);
            let _ = std::fs::remove_file(p);
        }
    }
}

#[tokio::test]
async fn sqlite_roundtrip_preserves_every_field() {
    let repo = memory_repo("progress_roundtrip").await;
    let first = fixed_now();
    let later = first + Duration::milliseconds(1_250);

    repo.record_attempt(&user("u1"), &word("w1"), true, first)
        .await
        .unwrap();
    let written = repo
        .record_attempt(&user("u1"), &word("w1"), false, later)
        .await
        .unwrap();

    let fetched = repo
        .get_progress(&user("u1"), &word("w1"))
        .await
        .unwrap()
        .expect("record exists");
    assert_eq!(fetched, written);
    assert_eq!(fetched.correct_count(), 1);
    assert_eq!(fetched.total_attempts(), 2);
    assert_eq!(fetched.mastery_level().value(), 20);
    assert_eq!(fetched.last_studied(), later);
}

#[tokio::test]
async fn nine_of_ten_attempts_are_counted() {
    let repo = memory_repo("progress_nine_of_ten").await;
    for i in 0..10 {
        repo.record_attempt(&user("u1"), &word("w1"), i != 0, fixed_now())
            .await
            .unwrap();
    }

    let progress = repo
        .get_progress(&user("u1"), &word("w1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(progress.correct_count(), 9);
    assert_eq!(progress.total_attempts(), 10);
    assert_eq!(progress.mastery_level().value(), 90);
}

#[tokio::test]
async fn first_wrong_attempt_creates_zero_of_one() {
    let repo = memory_repo("progress_first_wrong").await;
    assert!(
        repo.get_progress(&user("u1"), &word("w5"))
            .await
            .unwrap()
            .is_none()
    );

    let progress = repo
        .record_attempt(&user("u1"), &word("w5"), false, fixed_now())
        .await
        .unwrap();
    assert_eq!(progress.correct_count(), 0);
    assert_eq!(progress.total_attempts(), 1);
}

#[tokio::test]
async fn list_is_scoped_to_user_in_first_recorded_order() {
    let repo = memory_repo("progress_list_order").await;
    let now = fixed_now();
    repo.record_attempt(&user("u1"), &word("w2"), true, now)
        .await
        .unwrap();
    repo.record_attempt(&user("u2"), &word("w9"), true, now)
        .await
        .unwrap();
    repo.record_attempt(&user("u1"), &word("w1"), true, now)
        .await
        .unwrap();
    repo.record_attempt(&user("u1"), &word("w2"), true, now + Duration::minutes(1))
        .await
        .unwrap();

    let listed = repo.list_progress(&user("u1")).await.unwrap();
    let words: Vec<&str> = listed.iter().map(|p| p.word_id().as_str()).collect();
    assert_eq!(words, ["w2", "w1"]);
    assert!(repo.list_progress(&user("u3")).await.unwrap().is_empty());
}

#[tokio::test]
async fn corrupt_rows_are_skipped_and_healed() {
    let repo = memory_repo("progress_corrupt").await;
    repo.record_attempt(&user("u1"), &word("w1"), true, fixed_now())
        .await
        .unwrap();

    // correct > total and an unparseable timestamp
    sqlx::query(
        r"
        INSERT INTO learning_progress
            (user_id, word_id, correct_count, total_attempts, mastery_level, last_studied)
        VALUES
            ('u1', 'w2', 7, 3, 50, '2023-11-14T22:13:20Z'),
            ('u1', 'w3', 1, 2, 50, 'yesterday-ish')
        ",
    )
    .execute(repo.pool())
    .await
    .unwrap();

    let listed = repo.list_progress(&user("u1")).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].word_id().as_str(), "w1");
    assert!(
        repo.get_progress(&user("u1"), &word("w2"))
            .await
            .unwrap()
            .is_none()
    );

    let healed = repo
        .record_attempt(&user("u1"), &word("w2"), true, fixed_now())
        .await
        .unwrap();
    assert_eq!(healed.correct_count(), 1);
    assert_eq!(healed.total_attempts(), 1);

    // counts were fine for w3; only the timestamp was bad and is overwritten
    let repaired = repo
        .record_attempt(&user("u1"), &word("w3"), false, fixed_now())
        .await
        .unwrap();
    assert_eq!(repaired.correct_count(), 1);
    assert_eq!(repaired.total_attempts(), 3);
    assert_eq!(repo.list_progress(&user("u1")).await.unwrap().len(), 3);
}

#[tokio::test]
async fn full_attempt_counter_is_left_unchanged() {
    let repo = memory_repo("progress_full_counter").await;
    sqlx::query(
        r"
        INSERT INTO learning_progress
            (user_id, word_id, correct_count, total_attempts, mastery_level, last_studied)
        VALUES ('u1', 'w1', 4294967295, 4294967295, 100, ?1)
        ",
    )
    .bind(fixed_now())
    .execute(repo.pool())
    .await
    .unwrap();

    let progress = repo
        .record_attempt(&user("u1"), &word("w1"), false, fixed_now() + Duration::days(1))
        .await
        .unwrap();
    assert_eq!(progress.total_attempts(), u32::MAX);
    assert_eq!(progress.correct_count(), u32::MAX);
    assert_eq!(progress.last_studied(), fixed_now());

    let stored = repo
        .get_progress(&user("u1"), &word("w1"))
        .await
        .unwrap()
        .expect("record kept");
    assert_eq!(stored, progress);
}

#[tokio::test]
async fn reset_deletes_only_the_given_key() {
    let repo = memory_repo("progress_reset").await;
    repo.record_attempt(&user("u1"), &word("w1"), true, fixed_now())
        .await
        .unwrap();
    repo.record_attempt(&user("u1"), &word("w2"), true, fixed_now())
        .await
        .unwrap();

    assert!(repo.reset_progress(&user("u1"), &word("w1")).await.unwrap());
    assert!(!repo.reset_progress(&user("u1"), &word("w1")).await.unwrap());

    let remaining = repo.list_progress(&user("u1")).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].word_id().as_str(), "w2");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_attempts_do_not_lose_updates() {
    let db = TempDb::new("concurrent");
    let repo = SqliteRepository::connect(&db.url()).await.expect("connect");
    repo.migrate().await.expect("migrate");

    let mut handles = Vec::new();
    for i in 0..30_u32 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            // every third task practises a different word
            let target = if i % 3 == 0 { "w2" } else { "w1" };
            repo.record_attempt(&user("u1"), &word(target), i % 2 == 0, fixed_now())
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().expect("attempt committed");
    }

    let w1 = repo
        .get_progress(&user("u1"), &word("w1"))
        .await
        .unwrap()
        .unwrap();
    let w2 = repo
        .get_progress(&user("u1"), &word("w2"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(w1.total_attempts(), 20);
    assert_eq!(w2.total_attempts(), 10);
    // even i: w2 gets i in {0,6,12,18,24}, w1 gets the other ten evens
    assert_eq!(w2.correct_count(), 5);
    assert_eq!(w1.correct_count(), 10);
}

#[tokio::test]
async fn persisted_file_survives_reconnect() {
    let db = TempDb::new("reopen");
    {
        let repo = SqliteRepository::connect(&db.url()).await.expect("connect");
        repo.migrate().await.expect("migrate");
        repo.record_attempt(&user("u1"), &word("w4"), true, fixed_now())
            .await
            .unwrap();
        repo.pool().close().await;
    }

    let reopened = SqliteRepository::connect(&db.url()).await.expect("reconnect");
    reopened.migrate().await.expect("migrate is idempotent");
    let progress = reopened
        .get_progress(&user("u1"), &word("w4"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(progress.total_attempts(), 1);
}

#[tokio::test]
async fn closed_pool_surfaces_storage_error() {
    let repo = memory_repo("progress_closed").await;
    repo.pool().close().await;

    let err = repo
        .record_attempt(&user("u1"), &word("w1"), true, fixed_now())
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Connection(_)));
}
