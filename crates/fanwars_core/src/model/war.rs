//! War domain model.
//!
//! # Responsibility
//! - Define the rivalry record that roots every discussion thread.
//! - Validate team names before anything reaches a store.
//!
//! # Invariants
//! - `id`, `created_at` are server-assigned and never change.
//! - `team1`/`team2` are trimmed, non-empty, and differ ignoring case.
//! - `total_comments` is a cached counter; it may lag the real comment rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a war, assigned by the store.
pub type WarId = Uuid;

/// Rivalry record as persisted by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct War {
    pub id: WarId,
    pub team1: String,
    pub team2: String,
    pub created_at: DateTime<Utc>,
    /// Denormalized count of comments attached to this war.
    pub total_comments: i64,
}

impl War {
    /// Returns whether the war has any discussion yet.
    ///
    /// Drives the "Active"/"New" badge and trending membership.
    pub fn is_active(&self) -> bool {
        self.total_comments > 0
    }

    /// Display title, e.g. `CSK vs RCB`.
    pub fn title(&self) -> String {
        format!("{} vs {}", self.team1, self.team2)
    }

    /// Optimistically bumps the local counter after a comment was posted.
    ///
    /// Only the in-memory copy changes; the store keeps its own value.
    pub fn bump_comment_count(&mut self) {
        self.total_comments = self.total_comments.saturating_add(1);
    }
}

/// Which side of a war an input belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamSide {
    First,
    Second,
}

/// Validation failure for war creation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarValidationError {
    /// A team name is empty after trimming.
    EmptyTeamName { side: TeamSide },
    /// Both names are equal ignoring case.
    DuplicateTeams { name: String },
}

impl Display for WarValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTeamName { .. } => write!(f, "Please enter both team/player names"),
            Self::DuplicateTeams { .. } => write!(f, "Teams/players must be different"),
        }
    }
}

impl Error for WarValidationError {}

/// Validated input for creating a war.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWar {
    team1: String,
    team2: String,
}

impl NewWar {
    /// Trims and validates both team names.
    ///
    /// # Errors
    /// - `EmptyTeamName` when either side is blank.
    /// - `DuplicateTeams` when both sides match ignoring case.
    pub fn parse(team1: &str, team2: &str) -> Result<Self, WarValidationError> {
        let team1 = team1.trim();
        let team2 = team2.trim();

        if team1.is_empty() {
            return Err(WarValidationError::EmptyTeamName {
                side: TeamSide::First,
            });
        }
        if team2.is_empty() {
            return Err(WarValidationError::EmptyTeamName {
                side: TeamSide::Second,
            });
        }
        if team1.to_lowercase() == team2.to_lowercase() {
            return Err(WarValidationError::DuplicateTeams {
                name: team1.to_string(),
            });
        }

        Ok(Self {
            team1: team1.to_string(),
            team2: team2.to_string(),
        })
    }

    pub fn team1(&self) -> &str {
        &self.team1
    }

    pub fn team2(&self) -> &str {
        &self.team2
    }
}

const POPULAR_RIVALRIES: &[(&str, &str)] = &[
    ("CSK", "RCB"),
    ("MI", "CSK"),
    ("Virat", "Rohit"),
    ("RCB", "KKR"),
    ("Dhoni", "Kohli"),
    ("Punjab", "Rajasthan"),
];

/// Quick-select rivalries offered on the create screen.
pub fn popular_rivalries() -> Vec<NewWar> {
    POPULAR_RIVALRIES
        .iter()
        .filter_map(|(team1, team2)| NewWar::parse(team1, team2).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{popular_rivalries, NewWar, TeamSide, War, WarValidationError};
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn parse_trims_team_names() {
        let new_war = NewWar::parse("  CSK ", "\tRCB\n").unwrap();
        assert_eq!(new_war.team1(), "CSK");
        assert_eq!(new_war.team2(), "RCB");
    }

    #[test]
    fn parse_rejects_blank_sides() {
        assert_eq!(
            NewWar::parse("   ", "RCB").unwrap_err(),
            WarValidationError::EmptyTeamName {
                side: TeamSide::First
            }
        );
        assert_eq!(
            NewWar::parse("CSK", "").unwrap_err(),
            WarValidationError::EmptyTeamName {
                side: TeamSide::Second
            }
        );
    }

    #[test]
    fn parse_rejects_case_insensitive_duplicates() {
        let err = NewWar::parse("CSK", " csk ").unwrap_err();
        assert!(matches!(err, WarValidationError::DuplicateTeams { .. }));
        assert_eq!(err.to_string(), "Teams/players must be different");
    }

    #[test]
    fn bump_comment_count_marks_war_active() {
        let mut war = War {
            id: Uuid::new_v4(),
            team1: "MI".to_string(),
            team2: "CSK".to_string(),
            created_at: Utc::now(),
            total_comments: 0,
        };
        assert!(!war.is_active());

        war.bump_comment_count();
        assert_eq!(war.total_comments, 1);
        assert!(war.is_active());
        assert_eq!(war.title(), "MI vs CSK");
    }

    #[test]
    fn popular_rivalries_are_all_valid() {
        let rivalries = popular_rivalries();
        assert_eq!(rivalries.len(), 6);
        assert_eq!(rivalries[0].team1(), "CSK");
        assert_eq!(rivalries[0].team2(), "RCB");
    }
}
