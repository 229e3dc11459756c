//! Core data access and ranking for Fan Wars.
//! This crate is the single source of truth for war/comment invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod ranking;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{resolve_from_env, resolve_with, RemoteConfig, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::comment::{
    Comment, CommentId, CommentValidationError, NewComment, VoteDirection, MAX_COMMENT_CHARS,
};
pub use model::war::{popular_rivalries, NewWar, TeamSide, War, WarId, WarValidationError};
pub use ranking::{trending, RankedWar};
pub use repo::comment_repo::CommentRepository;
pub use repo::war_repo::WarRepository;
pub use repo::{EntityRef, RepoError, RepoResult, ValidationError};
pub use service::thread::WarThread;
pub use service::war_service::WarService;
pub use store::{RestStore, SqliteStore, Store, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
