//! Hosted relational store reached through its PostgREST endpoint.
//!
//! # Responsibility
//! - Translate `Store` calls into row-level REST requests.
//! - Map non-success responses onto `StoreError::Status`.
//!
//! # Invariants
//! - Every request carries the access key as `apikey` and bearer token.
//! - Writes ask for `return=representation` so callers get server-assigned fields.
//! - No retries; one call is one round trip.

use crate::config::RemoteConfig;
use crate::model::comment::{Comment, CommentId, NewComment};
use crate::model::war::{NewWar, War, WarId};
use crate::store::{Store, StoreError, StoreResult};
use log::warn;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const REST_PATH: &str = "rest/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const MAX_ERROR_BODY_CHARS: usize = 200;
const WAR_ORDER: &str = "total_comments.desc,created_at.desc";
const COMMENT_ORDER: &str = "votes.desc,created_at.desc";
const ADJUST_VOTES_RPC: &str = "adjust_comment_votes";

/// Error payload shape returned by PostgREST.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    code: Option<String>,
}

/// Store backed by the hosted service's REST interface.
#[derive(Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    access_key: String,
}

impl RestStore {
    /// Builds a client for the configured endpoint.
    ///
    /// # Errors
    /// - `InvalidEndpoint` when the URL does not parse or the key is not a
    ///   valid header value.
    pub fn new(config: &RemoteConfig) -> StoreResult<Self> {
        let url = reqwest::Url::parse(&config.url)
            .map_err(|err| StoreError::InvalidEndpoint(format!("`{}`: {err}", config.url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(StoreError::InvalidEndpoint(format!(
                "unsupported scheme `{}`",
                url.scheme()
            )));
        }
        HeaderValue::from_str(&config.access_key).map_err(|_| {
            StoreError::InvalidEndpoint("access key is not a valid header value".to_string())
        })?;

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: format!("{}/{REST_PATH}", config.url.trim_end_matches('/')),
            access_key: config.access_key.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{path}", self.base_url))
            .header("apikey", self.access_key.as_str())
            .header(AUTHORIZATION, format!("Bearer {}", self.access_key))
    }

    fn list_wars_request(&self) -> RequestBuilder {
        self.request(Method::GET, "wars")
            .query(&[("select", "*"), ("order", WAR_ORDER)])
    }

    fn get_war_request(&self, id: WarId) -> RequestBuilder {
        self.request(Method::GET, "wars")
            .query(&[("select", "*".to_string()), ("id", format!("eq.{id}"))])
    }

    fn list_comments_request(&self, war_id: WarId) -> RequestBuilder {
        self.request(Method::GET, "comments").query(&[
            ("select", "*".to_string()),
            ("war_id", format!("eq.{war_id}")),
            ("order", COMMENT_ORDER.to_string()),
        ])
    }

    fn insert_request(&self, table: &str, row: serde_json::Value) -> RequestBuilder {
        self.request(Method::POST, table)
            .header("Prefer", "return=representation")
            .json(&[row])
    }

    fn update_votes_request(&self, id: CommentId, votes: i64) -> RequestBuilder {
        self.request(Method::PATCH, "comments")
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&json!({ "votes": votes }))
    }

    fn adjust_votes_request(&self, id: CommentId, delta: i64) -> RequestBuilder {
        self.request(Method::POST, &format!("rpc/{ADJUST_VOTES_RPC}"))
            .json(&json!({ "comment_id": id, "delta": delta }))
    }
}

impl Store for RestStore {
    fn backend_tag(&self) -> &'static str {
        "rest"
    }

    fn select_wars(&self) -> StoreResult<Vec<War>> {
        send_json(self.list_wars_request())
    }

    fn insert_war(&self, war: &NewWar) -> StoreResult<War> {
        let rows: Vec<War> = send_json(self.insert_request(
            "wars",
            json!({ "team1": war.team1(), "team2": war.team2() }),
        ))?;
        single_row(rows, "wars insert")
    }

    fn select_war(&self, id: WarId) -> StoreResult<Option<War>> {
        let rows: Vec<War> = send_json(self.get_war_request(id))?;
        Ok(rows.into_iter().next())
    }

    fn select_comments(&self, war_id: WarId) -> StoreResult<Vec<Comment>> {
        send_json(self.list_comments_request(war_id))
    }

    fn insert_comment(&self, comment: &NewComment) -> StoreResult<Comment> {
        let rows: Vec<Comment> = send_json(self.insert_request(
            "comments",
            json!({ "war_id": comment.war_id(), "content": comment.content() }),
        ))?;
        single_row(rows, "comments insert")
    }

    fn update_comment_votes(&self, id: CommentId, votes: i64) -> StoreResult<bool> {
        let rows: Vec<Comment> = send_json(self.update_votes_request(id, votes))?;
        Ok(!rows.is_empty())
    }

    fn adjust_comment_votes(&self, id: CommentId, delta: i64) -> StoreResult<Option<i64>> {
        send_json(self.adjust_votes_request(id, delta))
    }
}

fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> StoreResult<T> {
    let response = request.send()?;
    let status = response.status().as_u16();
    let body = response.bytes()?;
    decode_response(status, &body)
}

/// Maps one HTTP exchange onto the decoded body or a `StoreError`.
fn decode_response<T: DeserializeOwned>(status: u16, body: &[u8]) -> StoreResult<T> {
    if !(200..300).contains(&status) {
        warn!(
            "event=store_request module=store backend=rest status=error http_status={}",
            status
        );
        return Err(status_error(status, &String::from_utf8_lossy(body)));
    }
    serde_json::from_slice(body).map_err(|err| StoreError::Decode(err.to_string()))
}

fn status_error(status: u16, body: &str) -> StoreError {
    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            message: Some(message),
            code: Some(code),
        }) => format!("{message} ({code})"),
        Ok(ErrorBody {
            message: Some(message),
            code: None,
        }) => message,
        _ => body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
    };
    StoreError::Status { status, message }
}

fn single_row<T>(rows: Vec<T>, context: &str) -> StoreResult<T> {
    let count = rows.len();
    rows.into_iter()
        .next()
        .ok_or_else(|| StoreError::Decode(format!("{context} returned {count} rows, expected 1")))
}
