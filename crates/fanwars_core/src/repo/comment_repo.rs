//! Comment repository.
//!
//! # Responsibility
//! - List and create comments of one war.
//! - Mutate vote scores, both by overwrite and by atomic adjustment.
//!
//! # Invariants
//! - `list_comments` output satisfies `ranking::is_comment_ordered`.
//! - New comments are trimmed, non-empty, at most 500 characters.
//! - `update_votes` is last-writer-wins. Two writers that computed the same
//!   value from the same stale read produce one net change, not two.
//! - `adjust_votes` applies deltas in the store, so concurrent votes add up.

use crate::model::comment::{Comment, CommentId, NewComment};
use crate::model::war::WarId;
use crate::ranking::sort_comments;
use crate::repo::{EntityRef, RepoError, RepoResult};
use crate::store::Store;
use log::{debug, warn};

/// Data access for comments.
pub struct CommentRepository<S: Store> {
    store: Option<S>,
}

impl<S: Store> CommentRepository<S> {
    /// Creates a repository over a configured store.
    pub fn new(store: S) -> Self {
        Self { store: Some(store) }
    }

    /// Creates a repository with no backing store (degraded mode).
    pub fn unconfigured() -> Self {
        Self { store: None }
    }

    /// Creates a repository from an optional store.
    pub fn with_store(store: Option<S>) -> Self {
        Self { store }
    }

    /// Lists a war's comments in thread order.
    ///
    /// Returns an empty list when no store is configured. An unknown
    /// `war_id` also yields an empty list.
    pub fn list_comments(&self, war_id: WarId) -> RepoResult<Vec<Comment>> {
        let Some(store) = &self.store else {
            warn!("event=comments_list module=repo status=degraded reason=unconfigured");
            return Ok(Vec::new());
        };

        let mut comments = store.select_comments(war_id)?;
        sort_comments(&mut comments);
        debug!(
            "event=comments_list module=repo status=ok backend={} war_id={} rows={}",
            store.backend_tag(),
            war_id,
            comments.len()
        );
        Ok(comments)
    }

    /// Posts a comment; the store assigns id, timestamp, and `votes = 0`.
    ///
    /// # Errors
    /// - `Validation` for blank or over-long content.
    /// - `BackendUnavailable` when no store is configured.
    /// - `Store` for store failures, including an unknown `war_id` when the
    ///   store enforces the reference.
    pub fn create_comment(&self, war_id: WarId, content: &str) -> RepoResult<Comment> {
        let new_comment = NewComment::parse(war_id, content)?;
        let store = self.store.as_ref().ok_or(RepoError::BackendUnavailable)?;
        let comment = store.insert_comment(&new_comment)?;
        debug!(
            "event=comment_create module=repo status=ok backend={} war_id={} comment_id={}",
            store.backend_tag(),
            war_id,
            comment.id
        );
        Ok(comment)
    }

    /// Replaces the stored vote score with `new_votes`.
    ///
    /// This is an overwrite, not a delta.
    pub fn update_votes(&self, comment_id: CommentId, new_votes: i64) -> RepoResult<()> {
        let store = self.store.as_ref().ok_or(RepoError::BackendUnavailable)?;
        if !store.update_comment_votes(comment_id, new_votes)? {
            return Err(RepoError::NotFound(EntityRef::Comment(comment_id)));
        }
        debug!(
            "event=comment_votes module=repo status=ok mode=overwrite comment_id={} votes={}",
            comment_id, new_votes
        );
        Ok(())
    }

    /// Adds `delta` to the stored vote score inside the store and returns
    /// the resulting score.
    pub fn adjust_votes(&self, comment_id: CommentId, delta: i64) -> RepoResult<i64> {
        let store = self.store.as_ref().ok_or(RepoError::BackendUnavailable)?;
        let votes = store
            .adjust_comment_votes(comment_id, delta)?
            .ok_or(RepoError::NotFound(EntityRef::Comment(comment_id)))?;
        debug!(
            "event=comment_votes module=repo status=ok mode=adjust comment_id={} delta={} votes={}",
            comment_id, delta, votes
        );
        Ok(votes)
    }
}
