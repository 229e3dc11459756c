//! War repository.
//!
//! # Responsibility
//! - List, create, and fetch wars through an injected store.
//! - Guarantee feed ordering on every list result.
//!
//! # Invariants
//! - `list_wars` output satisfies `ranking::is_war_ordered`.
//! - `create_war` validates before touching the store.
//! - `get_war` distinguishes "unconfigured" (`Ok(None)`) from a missing id
//!   (`Err(NotFound)`).

use crate::model::war::{NewWar, War, WarId};
use crate::ranking::sort_wars;
use crate::repo::{EntityRef, RepoError, RepoResult};
use crate::store::Store;
use log::{debug, warn};
use std::time::Instant;

/// Data access for wars.
pub struct WarRepository<S: Store> {
    store: Option<S>,
}

impl<S: Store> WarRepository<S> {
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

    /// Returns whether a store is attached.
    pub fn is_configured(&self) -> bool {
        self.store.is_some()
    }

    /// Lists every war in feed order.
    ///
    /// Returns an empty list when no store is configured.
    pub fn list_wars(&self) -> RepoResult<Vec<War>> {
        let Some(store) = &self.store else {
            warn!("event=wars_list module=repo status=degraded reason=unconfigured");
            return Ok(Vec::new());
        };

        let started_at = Instant::now();
        let mut wars = store.select_wars()?;
        sort_wars(&mut wars);
        debug!(
            "event=wars_list module=repo status=ok backend={} rows={} duration_ms={}",
            store.backend_tag(),
            wars.len(),
            started_at.elapsed().as_millis()
        );
        Ok(wars)
    }

    /// Creates a war from raw team names.
    ///
    /// # Errors
    /// - `Validation` for blank or case-insensitively equal names.
    /// - `BackendUnavailable` when no store is configured.
    /// - `Store` for store failures.
    pub fn create_war(&self, team1: &str, team2: &str) -> RepoResult<War> {
        let new_war = NewWar::parse(team1, team2)?;
        self.insert(&new_war)
    }

    /// Creates a war from already validated input.
    ///
    /// Skips trimming and name checks: `NewWar` can only be built through
    /// `NewWar::parse`, which already applied them.
    pub fn insert(&self, new_war: &NewWar) -> RepoResult<War> {
        let store = self.store.as_ref().ok_or(RepoError::BackendUnavailable)?;
        let war = store.insert_war(new_war)?;
        debug!(
            "event=war_create module=repo status=ok backend={} war_id={}",
            store.backend_tag(),
            war.id
        );
        Ok(war)
    }

    /// Fetches one war.
    ///
    /// Returns `Ok(None)` when no store is configured.
    ///
    /// # Errors
    /// - `NotFound` when the id does not exist.
    pub fn get_war(&self, id: WarId) -> RepoResult<Option<War>> {
        let Some(store) = &self.store else {
            warn!("event=war_get module=repo status=degraded reason=unconfigured");
            return Ok(None);
        };

        match store.select_war(id)? {
            Some(war) => Ok(Some(war)),
            None => Err(RepoError::NotFound(EntityRef::War(id))),
        }
    }
}
