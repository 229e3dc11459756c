use fanwars_core::db::{open_db, open_db_in_memory};
use fanwars_core::ranking::is_comment_ordered;
use fanwars_core::{
    CommentRepository, CommentValidationError, EntityRef, RepoError, SqliteStore, Store,
    ValidationError, WarRepository, MAX_COMMENT_CHARS,
};
use rusqlite::Connection;
use std::path::Path;
use uuid::Uuid;

fn seed_war(conn: &Connection) -> Uuid {
    let repo = WarRepository::new(SqliteStore::try_new(conn).unwrap());
    repo.create_war("CSK", "RCB").unwrap().id
}

fn insert_comment_row(conn: &Connection, war_id: Uuid, votes: i64, created_at: &str) -> Uuid {
    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO comments (id, war_id, content, votes, created_at)
         VALUES (?1, ?2, 'seeded', ?3, ?4);",
        rusqlite::params![id.to_string(), war_id.to_string(), votes, created_at],
    )
    .unwrap();
    id
}

fn read_votes(path: &Path, comment_id: Uuid) -> i64 {
    let conn = open_db(path).unwrap();
    conn.query_row(
        "SELECT votes FROM comments WHERE id = ?1;",
        [comment_id.to_string()],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn create_trims_content_and_starts_at_zero_votes() {
    let conn = open_db_in_memory().unwrap();
    let war_id = seed_war(&conn);
    let repo = CommentRepository::new(SqliteStore::try_new(&conn).unwrap());

    let comment = repo.create_comment(war_id, "  Great match!  ").unwrap();
    assert_eq!(comment.content, "Great match!");
    assert_eq!(comment.votes, 0);
    assert_eq!(comment.war_id, war_id);
}

#[test]
fn create_bumps_stored_war_counter() {
    let conn = open_db_in_memory().unwrap();
    let war_id = seed_war(&conn);
    let store = SqliteStore::try_new(&conn).unwrap();
    let comments = CommentRepository::new(store);
    let wars = WarRepository::new(store);

    comments.create_comment(war_id, "first").unwrap();
    comments.create_comment(war_id, "second").unwrap();

    assert_eq!(wars.get_war(war_id).unwrap().unwrap().total_comments, 2);
}

#[test]
fn create_rejects_empty_and_over_long_content() {
    let conn = open_db_in_memory().unwrap();
    let war_id = seed_war(&conn);
    let repo = CommentRepository::new(SqliteStore::try_new(&conn).unwrap());

    let err = repo.create_comment(war_id, "   ").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::Comment(CommentValidationError::EmptyContent))
    ));

    let long = "a".repeat(MAX_COMMENT_CHARS + 1);
    let err = repo.create_comment(war_id, &long).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::Comment(CommentValidationError::TooLong { .. }))
    ));
    assert!(repo.list_comments(war_id).unwrap().is_empty());
}

#[test]
fn create_for_unknown_war_is_a_store_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = CommentRepository::new(SqliteStore::try_new(&conn).unwrap());

    let err = repo.create_comment(Uuid::new_v4(), "hello").unwrap_err();
    assert!(matches!(err, RepoError::Store(_)));
}

#[test]
fn list_orders_by_votes_then_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let war_id = seed_war(&conn);
    let other_war = seed_war(&conn);
    let low = insert_comment_row(&conn, war_id, -3, "2024-05-01T00:00:00.000Z");
    let top_old = insert_comment_row(&conn, war_id, 10, "2024-01-01T00:00:00.000Z");
    let top_new = insert_comment_row(&conn, war_id, 10, "2024-02-01T00:00:00.000Z");
    let zero = insert_comment_row(&conn, war_id, 0, "2024-06-01T00:00:00.000Z");
    insert_comment_row(&conn, other_war, 99, "2024-06-01T00:00:00.000Z");

    let repo = CommentRepository::new(SqliteStore::try_new(&conn).unwrap());
    let comments = repo.list_comments(war_id).unwrap();

    let ids: Vec<Uuid> = comments.iter().map(|comment| comment.id).collect();
    assert_eq!(ids, vec![top_new, top_old, zero, low]);
    assert!(is_comment_ordered(&comments));
}

#[test]
fn update_votes_overwrites_value() {
    let conn = open_db_in_memory().unwrap();
    let war_id = seed_war(&conn);
    let repo = CommentRepository::new(SqliteStore::try_new(&conn).unwrap());
    let comment = repo.create_comment(war_id, "vote me").unwrap();

    repo.update_votes(comment.id, comment.votes + 1).unwrap();
    let reloaded = repo.list_comments(war_id).unwrap();
    assert_eq!(reloaded[0].votes, 1);

    repo.update_votes(comment.id, -7).unwrap();
    assert_eq!(repo.list_comments(war_id).unwrap()[0].votes, -7);
}

#[test]
fn update_votes_on_unknown_comment_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = CommentRepository::new(SqliteStore::try_new(&conn).unwrap());

    let missing = Uuid::new_v4();
    let err = repo.update_votes(missing, 1).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(EntityRef::Comment(id)) if id == missing));
    let err = repo.adjust_votes(missing, 1).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[test]
fn overwrite_from_same_stale_read_loses_an_update() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("votes.db");
    let conn_a = open_db(&path).unwrap();
    let conn_b = open_db(&path).unwrap();
    let client_a = CommentRepository::new(SqliteStore::try_new(&conn_a).unwrap());
    let client_b = CommentRepository::new(SqliteStore::try_new(&conn_b).unwrap());

    let war_id = seed_war(&conn_a);
    let comment = client_a.create_comment(war_id, "contested").unwrap();

    let seen_by_a = client_a.list_comments(war_id).unwrap()[0].votes;
    let seen_by_b = client_b.list_comments(war_id).unwrap()[0].votes;
    client_a.update_votes(comment.id, seen_by_a + 1).unwrap();
    client_b.update_votes(comment.id, seen_by_b + 1).unwrap();

    assert_eq!(read_votes(&path, comment.id), 1);
}

#[test]
fn concurrent_adjustments_are_all_counted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("votes.db");
    let setup = open_db(&path).unwrap();
    let war_id = seed_war(&setup);
    let comment = CommentRepository::new(SqliteStore::try_new(&setup).unwrap())
        .create_comment(war_id, "popular")
        .unwrap();
    drop(setup);

    const VOTERS: usize = 4;
    const VOTES_EACH: usize = 25;
    std::thread::scope(|scope| {
        for _ in 0..VOTERS {
            scope.spawn(|| {
                let conn = open_db(&path).unwrap();
                let repo = CommentRepository::new(SqliteStore::try_new(&conn).unwrap());
                for _ in 0..VOTES_EACH {
                    repo.adjust_votes(comment.id, 1).unwrap();
                }
            });
        }
    });

    assert_eq!(read_votes(&path, comment.id), (VOTERS * VOTES_EACH) as i64);
}

#[test]
fn adjust_votes_returns_new_score_and_allows_negative() {
    let conn = open_db_in_memory().unwrap();
    let war_id = seed_war(&conn);
    let repo = CommentRepository::new(SqliteStore::try_new(&conn).unwrap());
    let comment = repo.create_comment(war_id, "hot take").unwrap();

    assert_eq!(repo.adjust_votes(comment.id, -1).unwrap(), -1);
    assert_eq!(repo.adjust_votes(comment.id, -1).unwrap(), -2);
    assert_eq!(repo.adjust_votes(comment.id, 1).unwrap(), -1);
}

#[test]
fn adjust_past_max_score_fails_without_breaking_the_thread() {
    let conn = open_db_in_memory().unwrap();
    let war_id = seed_war(&conn);
    let repo = CommentRepository::new(SqliteStore::try_new(&conn).unwrap());
    let comment = repo.create_comment(war_id, "goat debate").unwrap();
    repo.update_votes(comment.id, i64::MAX).unwrap();

    let err = repo.adjust_votes(comment.id, 1).unwrap_err();
    assert_eq!(err.code(), "store");

    let comments = repo.list_comments(war_id).unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].votes, i64::MAX);
}

#[test]
fn unconfigured_reads_degrade_and_writes_fail() {
    let repo = CommentRepository::<&dyn Store>::unconfigured();
    let war_id = Uuid::new_v4();

    assert!(repo.list_comments(war_id).unwrap().is_empty());
    assert!(matches!(
        repo.create_comment(war_id, "hello").unwrap_err(),
        RepoError::BackendUnavailable
    ));
    assert!(matches!(
        repo.update_votes(Uuid::new_v4(), 1).unwrap_err(),
        RepoError::BackendUnavailable
    ));
    assert!(matches!(
        repo.adjust_votes(Uuid::new_v4(), 1).unwrap_err(),
        RepoError::BackendUnavailable
    ));
}
