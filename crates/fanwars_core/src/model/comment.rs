//! Comment domain model.
//!
//! # Responsibility
//! - Define the remark record attached to exactly one war.
//! - Define the client-side vote protocol (`current ± 1`).
//!
//! # Invariants
//! - `war_id` is fixed at creation.
//! - `votes` starts at 0 and is only changed through vote operations.

use crate::model::war::WarId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Upper bound on comment length, counted in characters.
pub const MAX_COMMENT_CHARS: usize = 500;

/// Stable identifier of a comment, assigned by the store.
pub type CommentId = Uuid;

/// Comment record as persisted by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub war_id: WarId,
    pub content: String,
    /// Signed vote score. May go negative.
    pub votes: i64,
    pub created_at: DateTime<Utc>,
}

/// Validation failure for comment creation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentValidationError {
    /// Content is empty after trimming.
    EmptyContent,
    /// Content exceeds `MAX_COMMENT_CHARS`.
    TooLong { chars: usize, max: usize },
}

impl Display for CommentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "comment cannot be empty"),
            Self::TooLong { chars, max } => {
                write!(f, "comment is {chars} characters long; limit is {max}")
            }
        }
    }
}

impl Error for CommentValidationError {}

/// Validated input for posting a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    war_id: WarId,
    content: String,
}

impl NewComment {
    /// Trims and validates comment content.
    pub fn parse(war_id: WarId, content: &str) -> Result<Self, CommentValidationError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(CommentValidationError::EmptyContent);
        }

        let chars = content.chars().count();
        if chars > MAX_COMMENT_CHARS {
            return Err(CommentValidationError::TooLong {
                chars,
                max: MAX_COMMENT_CHARS,
            });
        }

        Ok(Self {
            war_id,
            content: content.to_string(),
        })
    }

    pub fn war_id(&self) -> WarId {
        self.war_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Direction of a single vote click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// Signed change applied by one vote.
    pub fn delta(self) -> i64 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }

    /// Computes the next score from a last-known value.
    ///
    /// This is the overwrite protocol: the result is only correct if nobody
    /// else voted since `current` was read.
    pub fn apply(self, current: i64) -> i64 {
        current.saturating_add(self.delta())
    }

    /// Parses `up`/`down` (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "up" | "upvote" => Some(Self::Up),
            "down" | "downvote" => Some(Self::Down),
            _ => None,
        }
    }
}
