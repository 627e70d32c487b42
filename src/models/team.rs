//! Team and TeamStats data structures.

use serde::{Deserialize, Serialize};

/// Unique identifier for a team (assigned by the store, serial).
pub type TeamId = i64;

/// A registered team.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

impl Team {
    /// Create a team with the given id and name.
    pub fn new(id: TeamId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// One standings row for a team, recomputed from scratch on every relevant
/// change (never patched incrementally, so it cannot drift from the fixtures).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    pub team: Team,
    pub played: u32,
    pub won: u32,
    pub lost: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub sets_diff: i32,
    pub points_won: u32,
    pub points_lost: u32,
    pub points_diff: i32,
    /// Match points: 3 per won match, 0 otherwise.
    pub points: u32,
}

impl TeamStats {
    /// Zero-valued row for a team that has not played yet.
    pub fn zeroed(team: Team) -> Self {
        Self {
            team,
            played: 0,
            won: 0,
            lost: 0,
            sets_won: 0,
            sets_lost: 0,
            sets_diff: 0,
            points_won: 0,
            points_lost: 0,
            points_diff: 0,
            points: 0,
        }
    }
}
