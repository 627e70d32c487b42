//! Match and GroupMatch fixtures, plus the fixed group/bracket names.

use crate::models::score::MatchScore;
use crate::models::team::Team;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Group names used by the phase machine. Fixtures are tagged with these and
/// the store keys rows by them, so they are stable identifiers, not UI text.
pub const GROUP_A: &str = "Group A";
pub const GROUP_B: &str = "Group B";
pub const RANKING_A: &str = "Ranking A";
pub const RANKING_B: &str = "Ranking B";
pub const SEMI_FINAL_1: &str = "Semi Final 1";
pub const SEMI_FINAL_2: &str = "Semi Final 2";
pub const THIRD_PLACE: &str = "Third Place";
pub const FINAL: &str = "Final";

/// Fixed ids for the knockout bracket slots.
pub const SEMI_1_ID: &str = "semi1";
pub const SEMI_2_ID: &str = "semi2";
pub const THIRD_ID: &str = "third";
pub const FINAL_ID: &str = "final";

/// A single match between two teams. The id is derived deterministically from
/// the pairing (or is a fixed bracket-slot literal), so regenerating fixtures
/// for the same pairing is idempotent. The winner is never stored; it is
/// always recomputed from the score.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub team_a: Team,
    pub team_b: Team,
    pub score: MatchScore,
}

impl Match {
    /// Create a match with an all-zero (unplayed) score.
    pub fn new(id: impl Into<String>, team_a: Team, team_b: Team) -> Self {
        Self {
            id: id.into(),
            team_a,
            team_b,
            score: MatchScore::default(),
        }
    }

    /// Winner by majority of decided sets across all three sets. A tie in
    /// sets won yields no winner (the match is undecided, not drawn).
    pub fn winner(&self) -> Option<&Team> {
        let (a, b) = self.score.set_wins();
        match a.cmp(&b) {
            Ordering::Greater => Some(&self.team_a),
            Ordering::Less => Some(&self.team_b),
            Ordering::Equal => None,
        }
    }
}

/// The fixture list for one named group or bracket slot at one phase.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMatch {
    pub group: String,
    pub match_list: Vec<Match>,
    /// Numeric phase tag the fixtures belong to (2, 3 or 4).
    pub phase: u8,
}

impl GroupMatch {
    pub fn new(group: impl Into<String>, match_list: Vec<Match>, phase: u8) -> Self {
        Self {
            group: group.into(),
            match_list,
            phase,
        }
    }
}
