//! Repository layer over the backing store.
//!
//! # Responsibility
//! - Expose the war/comment data-access contract used by the presentation layer.
//! - Enforce input validation and result ordering regardless of backend.
//! - Apply the degraded behavior when no store is configured.
//!
//! # Invariants
//! - Reads on an unconfigured repository return empty/absent, never an error.
//! - Writes on an unconfigured repository fail with `BackendUnavailable`.
//! - Validation runs before any store call.
//! - Store failures propagate unchanged; nothing retries.

use crate::model::comment::{CommentId, CommentValidationError};
use crate::model::war::{WarId, WarValidationError};
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod comment_repo;
pub mod war_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Entity a `NotFound` error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    War(WarId),
    Comment(CommentId),
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::War(id) => write!(f, "war {id}"),
            Self::Comment(id) => write!(f, "comment {id}"),
        }
    }
}

/// Caller input rejected before reaching the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    War(WarValidationError),
    Comment(CommentValidationError),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::War(err) => write!(f, "{err}"),
            Self::Comment(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::War(err) => Some(err),
            Self::Comment(err) => Some(err),
        }
    }
}

/// Repository error taxonomy.
#[derive(Debug)]
pub enum RepoError {
    /// Input violated a precondition; no store call was made.
    Validation(ValidationError),
    /// No store is configured; writes cannot proceed.
    BackendUnavailable,
    /// The referenced entity does not exist in the store.
    NotFound(EntityRef),
    /// Any other store-level failure.
    Store(StoreError),
}

impl RepoError {
    /// Stable machine-readable code for envelopes and logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::BackendUnavailable => "backend_unavailable",
            Self::NotFound(_) => "not_found",
            Self::Store(_) => "store",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::BackendUnavailable => write!(f, "store is not configured"),
            Self::NotFound(entity) => write!(f, "{entity} not found"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::BackendUnavailable | Self::NotFound(_) => None,
        }
    }
}

impl From<WarValidationError> for RepoError {
    fn from(value: WarValidationError) -> Self {
        Self::Validation(ValidationError::War(value))
    }
}

impl From<CommentValidationError> for RepoError {
    fn from(value: CommentValidationError) -> Self {
        Self::Validation(ValidationError::Comment(value))
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
