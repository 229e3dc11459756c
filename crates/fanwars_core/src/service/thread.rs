//! In-memory view state of one war's discussion.
//!
//! # Responsibility
//! - Keep the war header and its comment list the way a detail screen shows them.
//! - Apply local updates after successful writes without a full reload.
//!
//! # Invariants
//! - Local state only changes after the store accepted the write.
//! - `war.total_comments` is bumped locally on each posted comment; the
//!   store keeps its own counter.
//! - Votes update a comment in place; list order is restored on `refresh`.

use crate::model::comment::{Comment, CommentId, VoteDirection};
use crate::model::war::War;
use crate::ranking::comment_insert_position;
use crate::repo::comment_repo::CommentRepository;
use crate::repo::{EntityRef, RepoError, RepoResult};
use crate::store::Store;

/// A war together with its loaded comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarThread {
    war: War,
    comments: Vec<Comment>,
}

impl WarThread {
    pub(crate) fn new(war: War, comments: Vec<Comment>) -> Self {
        Self { war, comments }
    }

    pub fn war(&self) -> &War {
        &self.war
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn comment(&self, id: CommentId) -> Option<&Comment> {
        self.comments.iter().find(|comment| comment.id == id)
    }

    pub(crate) fn replace(&mut self, war: War, comments: Vec<Comment>) {
        self.war = war;
        self.comments = comments;
    }

    /// Posts a comment and folds it into the local thread.
    pub fn post_comment<S: Store>(
        &mut self,
        repo: &CommentRepository<S>,
        content: &str,
    ) -> RepoResult<Comment> {
        let comment = repo.create_comment(self.war.id, content)?;
        let index = comment_insert_position(&self.comments, &comment);
        self.comments.insert(index, comment.clone());
        self.war.bump_comment_count();
        Ok(comment)
    }

    /// Votes through the store's atomic adjustment.
    ///
    /// Concurrent voters never cancel each other out. The local copy takes
    /// the score the store reports.
    pub fn vote<S: Store>(
        &mut self,
        repo: &CommentRepository<S>,
        comment_id: CommentId,
        direction: VoteDirection,
    ) -> RepoResult<i64> {
        let votes = repo.adjust_votes(comment_id, direction.delta())?;
        if let Some(comment) = self.comment_mut(comment_id) {
            comment.votes = votes;
        }
        Ok(votes)
    }

    /// Votes by overwriting with `local ± 1`.
    ///
    /// Last writer wins: votes cast elsewhere since the last load are lost.
    ///
    /// # Errors
    /// - `NotFound` when the comment is not part of this thread.
    pub fn vote_overwrite<S: Store>(
        &mut self,
        repo: &CommentRepository<S>,
        comment_id: CommentId,
        direction: VoteDirection,
    ) -> RepoResult<i64> {
        let current = self
            .comment(comment_id)
            .map(|comment| comment.votes)
            .ok_or(RepoError::NotFound(EntityRef::Comment(comment_id)))?;
        let next = direction.apply(current);

        repo.update_votes(comment_id, next)?;
        if let Some(comment) = self.comment_mut(comment_id) {
            comment.votes = next;
        }
        Ok(next)
    }

    fn comment_mut(&mut self, id: CommentId) -> Option<&mut Comment> {
        self.comments.iter_mut().find(|comment| comment.id == id)
    }
}
