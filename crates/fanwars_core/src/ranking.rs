//! Ordering rules for war lists and comment threads.
//!
//! # Responsibility
//! - Own the single sort key for wars and for comments.
//! - Derive the trending list from an already ranked war list.
//!
//! # Invariants
//! - Wars: `total_comments DESC, created_at DESC, id ASC`.
//! - Comments: `votes DESC, created_at DESC, id ASC`.
//! - Trending keeps the relative order of its input; ranks start at 1.

use crate::model::comment::Comment;
use crate::model::war::War;
use std::cmp::Ordering;

/// A war with its 1-based position in the trending list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedWar {
    pub rank: usize,
    pub war: War,
}

/// Compares two wars by feed order.
pub fn war_order(a: &War, b: &War) -> Ordering {
    b.total_comments
        .cmp(&a.total_comments)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Compares two comments by thread order.
pub fn comment_order(a: &Comment, b: &Comment) -> Ordering {
    b.votes
        .cmp(&a.votes)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

pub fn sort_wars(wars: &mut [War]) {
    wars.sort_by(war_order);
}

pub fn sort_comments(comments: &mut [Comment]) {
    comments.sort_by(comment_order);
}

/// Returns whether `wars` is in feed order.
pub fn is_war_ordered(wars: &[War]) -> bool {
    wars.windows(2)
        .all(|pair| war_order(&pair[0], &pair[1]) != Ordering::Greater)
}

/// Returns whether `comments` is in thread order.
pub fn is_comment_ordered(comments: &[Comment]) -> bool {
    comments
        .windows(2)
        .all(|pair| comment_order(&pair[0], &pair[1]) != Ordering::Greater)
}

/// Index at which `comment` keeps `comments` ordered.
pub fn comment_insert_position(comments: &[Comment], comment: &Comment) -> usize {
    comments.partition_point(|existing| comment_order(existing, comment) == Ordering::Less)
}

/// Filters a ranked war list down to wars with discussion.
///
/// No separate trending score exists: the input order is kept as-is and
/// each surviving war is numbered from 1.
pub fn trending(wars: impl IntoIterator<Item = War>) -> Vec<RankedWar> {
    wars.into_iter()
        .filter(War::is_active)
        .enumerate()
        .map(|(index, war)| RankedWar {
            rank: index + 1,
            war,
        })
        .collect()
}
