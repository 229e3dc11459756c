//! War use-case service.
//!
//! # Responsibility
//! - Provide the feed, trending, create, and detail entry points.
//! - Build both repositories from one injected store.
//!
//! # Invariants
//! - Feed and trending share one ordering; trending only filters.
//! - Opening a thread on an unconfigured service yields `None`.

use crate::model::war::{War, WarId};
use crate::ranking::{trending, RankedWar};
use crate::repo::comment_repo::CommentRepository;
use crate::repo::war_repo::WarRepository;
use crate::repo::RepoResult;
use crate::service::thread::WarThread;
use crate::store::Store;

/// Screen-level facade over war and comment repositories.
pub struct WarService<S: Store> {
    wars: WarRepository<S>,
    comments: CommentRepository<S>,
}

impl<S: Store + Clone> WarService<S> {
    /// Creates a service over a configured store.
    pub fn new(store: S) -> Self {
        Self::with_store(Some(store))
    }

    /// Creates a service from an optional store.
    pub fn with_store(store: Option<S>) -> Self {
        Self {
            wars: WarRepository::with_store(store.clone()),
            comments: CommentRepository::with_store(store),
        }
    }
}

impl<S: Store> WarService<S> {
    /// Creates a service with no backing store (degraded mode).
    pub fn unconfigured() -> Self {
        Self {
            wars: WarRepository::unconfigured(),
            comments: CommentRepository::unconfigured(),
        }
    }

    pub fn wars(&self) -> &WarRepository<S> {
        &self.wars
    }

    pub fn comments(&self) -> &CommentRepository<S> {
        &self.comments
    }

    /// Home feed: every war in rank order.
    pub fn feed(&self) -> RepoResult<Vec<War>> {
        self.wars.list_wars()
    }

    /// Trending list: feed wars with at least one comment, numbered from 1.
    pub fn trending(&self) -> RepoResult<Vec<RankedWar>> {
        Ok(trending(self.wars.list_wars()?))
    }

    pub fn create_war(&self, team1: &str, team2: &str) -> RepoResult<War> {
        self.wars.create_war(team1, team2)
    }

    pub fn get_war(&self, id: WarId) -> RepoResult<Option<War>> {
        self.wars.get_war(id)
    }

    /// Loads a war and its comments for the detail screen.
    pub fn open_thread(&self, war_id: WarId) -> RepoResult<Option<WarThread>> {
        let Some(war) = self.wars.get_war(war_id)? else {
            return Ok(None);
        };
        let comments = self.comments.list_comments(war_id)?;
        Ok(Some(WarThread::new(war, comments)))
    }

    /// Reloads a thread from the store (pull-to-refresh).
    ///
    /// The local state is left untouched when the reload fails or when the
    /// service is unconfigured.
    pub fn refresh_thread(&self, thread: &mut WarThread) -> RepoResult<()> {
        let war_id = thread.war().id;
        let Some(war) = self.wars.get_war(war_id)? else {
            return Ok(());
        };
        let comments = self.comments.list_comments(war_id)?;
        thread.replace(war, comments);
        Ok(())
    }
}
