use drill_core::model::{
    Difficulty, Operator, Problem, SessionSnapshot, SessionState, Trace, TraceEntry,
};
use storage::repository::{SnapshotRepository, Storage, StorageError};
use storage::sqlite::SqliteRepository;

const KEY: &str = "math_practice_session";

fn build_snapshot(answered: u32) -> SessionSnapshot {
    let problem = Problem::new(15, 4, Operator::Divide);
    let mut state = SessionState::idle(problem);
    state.active = true;
    state.questions_answered = answered;
    state.difficulty = Difficulty::new(1.3).unwrap();
    state.session_elapsed_seconds = 130;
    state.show_start_prompt = false;

    let mut trace = Trace::new();
    trace.append(TraceEntry::new(&problem, "3.75", 3.75, true, 6));
    trace.append(TraceEntry::new(
        &Problem::new(4, 9, Operator::Subtract),
        "5",
        -5.0,
        false,
        3,
    ));
    SessionSnapshot::capture(&state, &trace)
}

#[tokio::test]
async fn sqlite_roundtrip_persists_snapshot() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_snapshot_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert!(repo.load_snapshot(KEY).await.unwrap().is_none());

    let snapshot = build_snapshot(21);
    repo.save_snapshot(KEY, &snapshot).await.unwrap();

    let loaded = repo.load_snapshot(KEY).await.expect("load");
    assert_eq!(loaded, Some(snapshot));
}

#[tokio::test]
async fn sqlite_save_overwrites_slot() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_snapshot_overwrite?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.save_snapshot(KEY, &build_snapshot(1)).await.unwrap();
    repo.save_snapshot(KEY, &build_snapshot(2)).await.unwrap();

    let loaded = repo.load_snapshot(KEY).await.unwrap().unwrap();
    assert_eq!(loaded.questions_answered, 2);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM session_slots")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn sqlite_corrupted_payload_is_reported() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_snapshot_corrupt?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    sqlx::query("INSERT INTO session_slots (key, payload, updated_at) VALUES (?1, ?2, ?3)")
        .bind(KEY)
        .bind("]]garbage")
        .bind(chrono::Utc::now())
        .execute(repo.pool())
        .await
        .unwrap();

    let err = repo.load_snapshot(KEY).await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_snapshot_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");
}

#[tokio::test]
async fn storage_sqlite_exposes_snapshot_repository() {
    let storage = Storage::sqlite("sqlite:file:memdb_snapshot_storage?mode=memory&cache=shared")
        .await
        .expect("storage");
    let snapshot = build_snapshot(7);
    storage.snapshots.save_snapshot(KEY, &snapshot).await.unwrap();
    assert_eq!(
        storage.snapshots.load_snapshot(KEY).await.unwrap(),
        Some(snapshot)
    );
}
