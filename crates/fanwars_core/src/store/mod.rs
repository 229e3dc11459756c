//! Backing store contracts.
//!
//! # Responsibility
//! - Define row-level CRUD over the `wars` and `comments` tables.
//! - Hide whether rows live in a local SQLite file or the hosted service.
//!
//! # Invariants
//! - Stores assign ids, creation timestamps, and initial counters.
//! - Stores never retry; every failure surfaces as `StoreError`.
//! - Result ordering from a store is a hint only; repositories re-sort.

use crate::model::comment::{Comment, CommentId, NewComment};
use crate::model::war::{NewWar, War, WarId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod rest;
pub mod sqlite;

pub use rest::RestStore;
pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by a backing store.
#[derive(Debug)]
pub enum StoreError {
    /// Local SQLite failure (constraint violation, I/O, busy).
    Sqlite(rusqlite::Error),
    /// Network or protocol failure talking to the hosted store.
    Http(reqwest::Error),
    /// Hosted store answered with a non-success status.
    Status { status: u16, message: String },
    /// Response body did not match the expected shape.
    Decode(String),
    /// Persisted row cannot be mapped onto the domain model.
    InvalidData(String),
    /// Store endpoint cannot be used as configured.
    InvalidEndpoint(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Http(err) => write!(f, "store request failed: {err}"),
            Self::Status { status, message } => {
                write!(f, "store responded with status {status}: {message}")
            }
            Self::Decode(message) => write!(f, "invalid store response: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::InvalidEndpoint(message) => write!(f, "invalid store endpoint: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

/// Row-level access to the wars/comments relational store.
///
/// Object safe, so callers may hold `&dyn Store` when the backend is only
/// known at runtime.
pub trait Store {
    /// Short backend name for logs (`sqlite`, `rest`).
    fn backend_tag(&self) -> &'static str;
    /// Reads every war.
    fn select_wars(&self) -> StoreResult<Vec<War>>;
    /// Inserts one war and returns the stored record.
    fn insert_war(&self, war: &NewWar) -> StoreResult<War>;
    /// Reads one war by id.
    fn select_war(&self, id: WarId) -> StoreResult<Option<War>>;
    /// Reads every comment of one war.
    fn select_comments(&self, war_id: WarId) -> StoreResult<Vec<Comment>>;
    /// Inserts one comment and returns the stored record.
    fn insert_comment(&self, comment: &NewComment) -> StoreResult<Comment>;
    /// Overwrites the vote score. Returns `false` when no row matched.
    fn update_comment_votes(&self, id: CommentId, votes: i64) -> StoreResult<bool>;
    /// Atomically adds `delta` to the vote score and returns the new value.
    fn adjust_comment_votes(&self, id: CommentId, delta: i64) -> StoreResult<Option<i64>>;
}

impl<S: Store + ?Sized> Store for &S {
    fn backend_tag(&self) -> &'static str {
        (**self).backend_tag()
    }

    fn select_wars(&self) -> StoreResult<Vec<War>> {
        (**self).select_wars()
    }

    fn insert_war(&self, war: &NewWar) -> StoreResult<War> {
        (**self).insert_war(war)
    }

    fn select_war(&self, id: WarId) -> StoreResult<Option<War>> {
        (**self).select_war(id)
    }

    fn select_comments(&self, war_id: WarId) -> StoreResult<Vec<Comment>> {
        (**self).select_comments(war_id)
    }

    fn insert_comment(&self, comment: &NewComment) -> StoreResult<Comment> {
        (**self).insert_comment(comment)
    }

    fn update_comment_votes(&self, id: CommentId, votes: i64) -> StoreResult<bool> {
        (**self).update_comment_votes(id, votes)
    }

    fn adjust_comment_votes(&self, id: CommentId, delta: i64) -> StoreResult<Option<i64>> {
        (**self).adjust_comment_votes(id, delta)
    }
}
