//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose war feed, trending, thread, and vote use cases to Dart via FRB.
//! - Flatten domain records into string-keyed envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Store configuration is resolved per call; no connection outlives a call.
//! - Store-backed calls are async on the Dart side (not `frb(sync)`), so the
//!   UI thread never waits on a round trip.

use fanwars_core::db::open_db;
use fanwars_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    popular_rivalries as popular_rivalries_inner, resolve_from_env, Comment, RankedWar,
    RepoError, RestStore, SqliteStore, Store, StoreConfig, VoteDirection, War, WarService,
};
use log::warn;
use uuid::Uuid;

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// War row shaped for list and header widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarItem {
    pub id: String,
    pub team1: String,
    pub team2: String,
    /// `team1 vs team2`.
    pub title: String,
    /// RFC 3339 UTC timestamp.
    pub created_at: String,
    pub total_comments: i64,
    /// `true` renders the "Active" badge, `false` the "New" badge.
    pub is_active: bool,
}

/// Trending entry with its 1-based rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendingItem {
    pub rank: u32,
    pub war: WarItem,
}

/// Comment row shaped for thread widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentItem {
    pub id: String,
    pub war_id: String,
    pub content: String,
    pub votes: i64,
    /// RFC 3339 UTC timestamp.
    pub created_at: String,
}

/// Quick-select rivalry suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RivalryItem {
    pub team1: String,
    pub team2: String,
}

/// Which store the core would talk to right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStatus {
    pub configured: bool,
    /// `remote`, `local`, or `none`.
    pub backend: String,
    pub message: String,
}

/// List envelope for the home feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarListResponse {
    pub ok: bool,
    pub items: Vec<WarItem>,
    pub error_code: Option<String>,
    pub message: String,
}

/// List envelope for the trending screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendingListResponse {
    pub ok: bool,
    pub items: Vec<TrendingItem>,
    pub error_code: Option<String>,
    pub message: String,
}

/// Single-war envelope for create and detail calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarResponse {
    pub ok: bool,
    /// `None` on failure, and on success when no store is configured.
    pub war: Option<WarItem>,
    pub error_code: Option<String>,
    pub message: String,
}

/// List envelope for a war's thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentListResponse {
    pub ok: bool,
    pub items: Vec<CommentItem>,
    pub error_code: Option<String>,
    pub message: String,
}

/// Single-comment envelope for posting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentResponse {
    pub ok: bool,
    pub comment: Option<CommentItem>,
    pub error_code: Option<String>,
    pub message: String,
}

/// Vote envelope carrying the resulting score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteResponse {
    pub ok: bool,
    pub votes: Option<i64>,
    pub error_code: Option<String>,
    pub message: String,
}

/// Reports whether a store is configured.
///
/// # FFI contract
/// - Sync call; reads process environment only.
#[flutter_rust_bridge::frb(sync)]
pub fn store_status() -> StoreStatus {
    store_status_with(resolve_from_env())
}

/// Lists all wars in feed order.
pub fn list_wars() -> WarListResponse {
    list_wars_with(resolve_from_env())
}

/// Lists wars with at least one comment, ranked from 1.
pub fn trending_wars() -> TrendingListResponse {
    trending_wars_with(resolve_from_env())
}

/// Creates a war after validating both team names.
pub fn create_war(team1: String, team2: String) -> WarResponse {
    create_war_with(resolve_from_env(), &team1, &team2)
}

/// Loads one war by id.
pub fn get_war(war_id: String) -> WarResponse {
    get_war_with(resolve_from_env(), &war_id)
}

/// Lists a war's comments in thread order.
pub fn list_comments(war_id: String) -> CommentListResponse {
    list_comments_with(resolve_from_env(), &war_id)
}

/// Posts a comment to a war.
pub fn create_comment(war_id: String, content: String) -> CommentResponse {
    create_comment_with(resolve_from_env(), &war_id, &content)
}

/// Applies one `up`/`down` vote atomically in the store.
pub fn vote_comment(comment_id: String, direction: String) -> VoteResponse {
    vote_comment_with(resolve_from_env(), &comment_id, &direction)
}

/// Overwrites a comment's score with `votes` (last writer wins).
pub fn set_comment_votes(comment_id: String, votes: i64) -> VoteResponse {
    set_comment_votes_with(resolve_from_env(), &comment_id, votes)
}

/// Quick-select rivalries for the create screen.
#[flutter_rust_bridge::frb(sync)]
pub fn popular_rivalries() -> Vec<RivalryItem> {
    popular_rivalries_inner()
        .into_iter()
        .map(|rivalry| RivalryItem {
            team1: rivalry.team1().to_string(),
            team2: rivalry.team2().to_string(),
        })
        .collect()
}

/// Failure surfaced to Dart as `error_code` + `message`.
#[derive(Debug)]
struct CallError {
    code: &'static str,
    message: String,
}

impl CallError {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<RepoError> for CallError {
    fn from(value: RepoError) -> Self {
        Self::new(value.code(), value.to_string())
    }
}

type CallResult<T> = Result<T, CallError>;

fn store_status_with(config: Option<StoreConfig>) -> StoreStatus {
    match config {
        Some(config) => StoreStatus {
            configured: true,
            backend: config.label().to_string(),
            message: format!("Using {} store.", config.label()),
        },
        None => StoreStatus {
            configured: false,
            backend: "none".to_string(),
            message: "Store not configured; lists stay empty and writes fail.".to_string(),
        },
    }
}

fn list_wars_with(config: Option<StoreConfig>) -> WarListResponse {
    match with_service(config, |service| Ok(service.feed()?)) {
        Ok(wars) => WarListResponse {
            ok: true,
            message: count_message(wars.len(), "war"),
            items: wars.into_iter().map(to_war_item).collect(),
            error_code: None,
        },
        Err(err) => WarListResponse {
            ok: false,
            items: Vec::new(),
            error_code: Some(err.code.to_string()),
            message: failure_message("list_wars", err),
        },
    }
}

fn trending_wars_with(config: Option<StoreConfig>) -> TrendingListResponse {
    match with_service(config, |service| Ok(service.trending()?)) {
        Ok(ranked) => TrendingListResponse {
            ok: true,
            message: if ranked.is_empty() {
                "No trending wars yet.".to_string()
            } else {
                count_message(ranked.len(), "trending war")
            },
            items: ranked.into_iter().map(to_trending_item).collect(),
            error_code: None,
        },
        Err(err) => TrendingListResponse {
            ok: false,
            items: Vec::new(),
            error_code: Some(err.code.to_string()),
            message: failure_message("trending_wars", err),
        },
    }
}

fn create_war_with(config: Option<StoreConfig>, team1: &str, team2: &str) -> WarResponse {
    match with_service(config, |service| Ok(service.create_war(team1, team2)?)) {
        Ok(war) => WarResponse {
            ok: true,
            message: format!("War created: {}", war.title()),
            war: Some(to_war_item(war)),
            error_code: None,
        },
        Err(err) => war_failure("create_war", err),
    }
}

fn get_war_with(config: Option<StoreConfig>, war_id: &str) -> WarResponse {
    let result = parse_id(war_id, "war_id")
        .and_then(|id| with_service(config, |service| Ok(service.get_war(id)?)));
    match result {
        Ok(Some(war)) => WarResponse {
            ok: true,
            war: Some(to_war_item(war)),
            error_code: None,
            message: String::new(),
        },
        Ok(None) => WarResponse {
            ok: true,
            war: None,
            error_code: None,
            message: "Store not configured.".to_string(),
        },
        Err(err) => war_failure("get_war", err),
    }
}

fn list_comments_with(config: Option<StoreConfig>, war_id: &str) -> CommentListResponse {
    let result = parse_id(war_id, "war_id")
        .and_then(|id| with_service(config, |service| Ok(service.comments().list_comments(id)?)));
    match result {
        Ok(comments) => CommentListResponse {
            ok: true,
            message: count_message(comments.len(), "comment"),
            items: comments.into_iter().map(to_comment_item).collect(),
            error_code: None,
        },
        Err(err) => CommentListResponse {
            ok: false,
            items: Vec::new(),
            error_code: Some(err.code.to_string()),
            message: failure_message("list_comments", err),
        },
    }
}

fn create_comment_with(
    config: Option<StoreConfig>,
    war_id: &str,
    content: &str,
) -> CommentResponse {
    let result = parse_id(war_id, "war_id").and_then(|id| {
        with_service(config, |service| {
            Ok(service.comments().create_comment(id, content)?)
        })
    });
    match result {
        Ok(comment) => CommentResponse {
            ok: true,
            comment: Some(to_comment_item(comment)),
            error_code: None,
            message: "Comment posted.".to_string(),
        },
        Err(err) => CommentResponse {
            ok: false,
            comment: None,
            error_code: Some(err.code.to_string()),
            message: failure_message("create_comment", err),
        },
    }
}

fn vote_comment_with(
    config: Option<StoreConfig>,
    comment_id: &str,
    direction: &str,
) -> VoteResponse {
    let result = parse_id(comment_id, "comment_id").and_then(|id| {
        let direction = VoteDirection::parse(direction).ok_or_else(|| {
            CallError::new(
                "validation",
                format!("unknown vote direction `{direction}`; expected up|down"),
            )
        })?;
        with_service(config, |service| {
            Ok(service.comments().adjust_votes(id, direction.delta())?)
        })
    });
    vote_response("vote_comment", result)
}

fn set_comment_votes_with(
    config: Option<StoreConfig>,
    comment_id: &str,
    votes: i64,
) -> VoteResponse {
    let result = parse_id(comment_id, "comment_id").and_then(|id| {
        with_service(config, |service| {
            service.comments().update_votes(id, votes)?;
            Ok(votes)
        })
    });
    vote_response("set_comment_votes", result)
}

fn vote_response(op: &str, result: CallResult<i64>) -> VoteResponse {
    match result {
        Ok(votes) => VoteResponse {
            ok: true,
            votes: Some(votes),
            error_code: None,
            message: String::new(),
        },
        Err(err) => VoteResponse {
            ok: false,
            votes: None,
            error_code: Some(err.code.to_string()),
            message: failure_message(op, err),
        },
    }
}

fn war_failure(op: &str, err: CallError) -> WarResponse {
    WarResponse {
        ok: false,
        war: None,
        error_code: Some(err.code.to_string()),
        message: failure_message(op, err),
    }
}

/// Builds a service for one call from the resolved configuration.
fn with_service<T>(
    config: Option<StoreConfig>,
    f: impl FnOnce(&WarService<&dyn Store>) -> CallResult<T>,
) -> CallResult<T> {
    match config {
        None => f(&WarService::unconfigured()),
        Some(StoreConfig::Local(path)) => {
            let conn = open_db(&path)
                .map_err(|err| CallError::new("store", format!("local store open failed: {err}")))?;
            let store = SqliteStore::try_new(&conn)
                .map_err(|err| CallError::new("store", err.to_string()))?;
            f(&WarService::new(&store as &dyn Store))
        }
        Some(StoreConfig::Remote(remote)) => {
            let store = RestStore::new(&remote)
                .map_err(|err| CallError::new("store", err.to_string()))?;
            f(&WarService::new(&store as &dyn Store))
        }
    }
}

fn parse_id(raw: &str, field: &str) -> CallResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| CallError::new("validation", format!("invalid {field} `{raw}`")))
}

fn failure_message(op: &str, err: CallError) -> String {
    warn!(
        "event=ffi_call module=ffi op={} status=error error_code={}",
        op, err.code
    );
    format!("{op} failed: {}", err.message)
}

fn count_message(count: usize, noun: &str) -> String {
    match count {
        0 => format!("No {noun}s."),
        1 => format!("1 {noun}."),
        n => format!("{n} {noun}s."),
    }
}

fn to_war_item(war: War) -> WarItem {
    WarItem {
        id: war.id.to_string(),
        title: war.title(),
        is_active: war.is_active(),
        created_at: war.created_at.to_rfc3339(),
        total_comments: war.total_comments,
        team1: war.team1,
        team2: war.team2,
    }
}

fn to_trending_item(ranked: RankedWar) -> TrendingItem {
    TrendingItem {
        rank: u32::try_from(ranked.rank).unwrap_or(u32::MAX),
        war: to_war_item(ranked.war),
    }
}

fn to_comment_item(comment: Comment) -> CommentItem {
    CommentItem {
        id: comment.id.to_string(),
        war_id: comment.war_id.to_string(),
        created_at: comment.created_at.to_rfc3339(),
        votes: comment.votes,
        content: comment.content,
    }
}
