//! SQLite-backed local store.
//!
//! # Responsibility
//! - Persist wars and comments in a migrated local database.
//! - Play the server's role: assign ids, timestamps, and vote defaults.
//!
//! # Invariants
//! - Connection must come from `db::open_db*` (schema fully migrated).
//! - `total_comments` is maintained by the `trg_comments_count_insert` trigger.
//! - `adjust_comment_votes` is a single UPDATE statement, hence atomic.
//! - A vote adjustment that would leave the `i64` range is rejected and
//!   leaves the stored score untouched.

use crate::db::migrations::latest_version;
use crate::model::comment::{Comment, CommentId, NewComment};
use crate::model::war::{NewWar, War, WarId};
use crate::store::{Store, StoreError, StoreResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const WAR_SELECT_SQL: &str = "SELECT
    id,
    team1,
    team2,
    created_at,
    total_comments
FROM wars";

const COMMENT_SELECT_SQL: &str = "SELECT
    id,
    war_id,
    content,
    votes,
    created_at
FROM comments";

/// Local store over a borrowed, migrated SQLite connection.
#[derive(Clone, Copy)]
pub struct SqliteStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    /// Constructs a store from a migrated connection.
    ///
    /// # Errors
    /// - `InvalidData` when the schema version is behind this binary.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
        let latest = latest_version();
        if version < latest {
            return Err(StoreError::InvalidData(format!(
                "schema version {version} is behind {latest}; open the database with db::open_db"
            )));
        }
        Ok(Self { conn })
    }
}

impl Store for SqliteStore<'_> {
    fn backend_tag(&self) -> &'static str {
        "sqlite"
    }

    fn select_wars(&self) -> StoreResult<Vec<War>> {
        let mut stmt = self.conn.prepare(&format!(
            "{WAR_SELECT_SQL}
             ORDER BY total_comments DESC, created_at DESC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut wars = Vec::new();
        while let Some(row) = rows.next()? {
            wars.push(parse_war_row(row)?);
        }
        Ok(wars)
    }

    fn insert_war(&self, war: &NewWar) -> StoreResult<War> {
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO wars (id, team1, team2) VALUES (?1, ?2, ?3);",
            params![id.to_string(), war.team1(), war.team2()],
        )?;

        self.select_war(id)?.ok_or_else(|| {
            StoreError::InvalidData(format!("inserted war {id} missing in read-back"))
        })
    }

    fn select_war(&self, id: WarId) -> StoreResult<Option<War>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{WAR_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_war_row(row)?)),
            None => Ok(None),
        }
    }

    fn select_comments(&self, war_id: WarId) -> StoreResult<Vec<Comment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{COMMENT_SELECT_SQL}
             WHERE war_id = ?1
             ORDER BY votes DESC, created_at DESC, id ASC;"
        ))?;
        let mut rows = stmt.query([war_id.to_string()])?;
        let mut comments = Vec::new();
        while let Some(row) = rows.next()? {
            comments.push(parse_comment_row(row)?);
        }
        Ok(comments)
    }

    fn insert_comment(&self, comment: &NewComment) -> StoreResult<Comment> {
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO comments (id, war_id, content) VALUES (?1, ?2, ?3);",
            params![
                id.to_string(),
                comment.war_id().to_string(),
                comment.content()
            ],
        )?;

        let mut stmt = self
            .conn
            .prepare(&format!("{COMMENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => parse_comment_row(row),
            None => Err(StoreError::InvalidData(format!(
                "inserted comment {id} missing in read-back"
            ))),
        }
    }

    fn update_comment_votes(&self, id: CommentId, votes: i64) -> StoreResult<bool> {
        let changed = self.conn.execute(
            "UPDATE comments SET votes = ?2 WHERE id = ?1;",
            params![id.to_string(), votes],
        )?;
        Ok(changed > 0)
    }

    fn adjust_comment_votes(&self, id: CommentId, delta: i64) -> StoreResult<Option<i64>> {
        // SQLite promotes an overflowing integer sum to REAL, so the bound
        // check has to happen before the addition.
        let votes = self
            .conn
            .query_row(
                "UPDATE comments
                 SET votes = votes + ?2
                 WHERE id = ?1
                   AND ((?2 >= 0 AND votes <= ?3 - ?2) OR (?2 < 0 AND votes >= ?4 - ?2))
                 RETURNING votes;",
                params![id.to_string(), delta, i64::MAX, i64::MIN],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        if votes.is_some() {
            return Ok(votes);
        }

        let current = self
            .conn
            .query_row(
                "SELECT votes FROM comments WHERE id = ?1;",
                [id.to_string()],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        match current {
            Some(current) => Err(StoreError::InvalidData(format!(
                "vote score of comment {id} would overflow: {current} + {delta}"
            ))),
            None => Ok(None),
        }
    }
}

fn parse_war_row(row: &Row<'_>) -> StoreResult<War> {
    Ok(War {
        id: parse_uuid(row, "id", "wars.id")?,
        team1: row.get("team1")?,
        team2: row.get("team2")?,
        created_at: parse_timestamp(row, "wars.created_at")?,
        total_comments: row.get("total_comments")?,
    })
}

fn parse_comment_row(row: &Row<'_>) -> StoreResult<Comment> {
    Ok(Comment {
        id: parse_uuid(row, "id", "comments.id")?,
        war_id: parse_uuid(row, "war_id", "comments.war_id")?,
        content: row.get("content")?,
        votes: row.get("votes")?,
        created_at: parse_timestamp(row, "comments.created_at")?,
    })
}

fn parse_uuid(row: &Row<'_>, column: &str, label: &str) -> StoreResult<Uuid> {
    let text: String = row.get(column)?;
    Uuid::parse_str(&text)
        .map_err(|_| StoreError::InvalidData(format!("invalid uuid value `{text}` in {label}")))
}

fn parse_timestamp(row: &Row<'_>, label: &str) -> StoreResult<DateTime<Utc>> {
    let text: String = row.get("created_at")?;
    DateTime::parse_from_rfc3339(&text)
        .map(|value| value.with_timezone(&Utc))
        .map_err(|_| StoreError::InvalidData(format!("invalid timestamp `{text}` in {label}")))
}
