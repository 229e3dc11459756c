//! Domain model for wars and their comment threads.
//!
//! # Responsibility
//! - Define canonical records returned by stores and repositories.
//! - Own input validation for everything a client may create.
//!
//! # Invariants
//! - Identifiers and creation timestamps are assigned by the store, never by callers.
//! - A war's two team names are non-empty and differ case-insensitively.
//! - Comment content is non-empty and at most `MAX_COMMENT_CHARS` characters.

pub mod comment;
pub mod war;
