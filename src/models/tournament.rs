//! Tournament aggregate, phase value, and engine errors.

use crate::models::fixture::{GroupMatch, Match};
use crate::models::team::{Team, TeamStats};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Errors that can occur during tournament operations. Every precondition
/// violation is a distinct, named condition; none of them mutates state.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Operation is not available in the current phase.
    WrongPhase {
        operation: &'static str,
        phase: Phase,
    },
    /// Fewer registered teams than the zone draw needs.
    InsufficientTeams { required: usize, registered: usize },
    /// A zone is missing or has no teams when fixtures are requested.
    InsufficientZones { zone: String },
    /// A group finished with fewer decided winners than the ranking round needs.
    InsufficientWinners {
        group: String,
        required: usize,
        decided: usize,
    },
    /// A ranking group has fewer ranked standings entries than the bracket needs.
    InsufficientStandings {
        group: String,
        required: usize,
        ranked: usize,
    },
    /// No match with this id in the active fixture set.
    MatchNotFound(String),
    /// Set number outside 1..=3.
    InvalidSetNumber(u8),
    /// Team registration with an empty (or all-whitespace) name.
    EmptyTeamName,
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::WrongPhase { operation, phase } => {
                write!(f, "{} is not available in phase {}", operation, phase)
            }
            TournamentError::InsufficientTeams {
                required,
                registered,
            } => write!(
                f,
                "insufficient teams: the zone draw needs {}, only {} registered",
                required, registered
            ),
            TournamentError::InsufficientZones { zone } => {
                write!(f, "insufficient zones: zone {} has no teams", zone)
            }
            TournamentError::InsufficientWinners {
                group,
                required,
                decided,
            } => write!(
                f,
                "insufficient qualified winners: {} has {} decided winners, needs {}",
                group, decided, required
            ),
            TournamentError::InsufficientStandings {
                group,
                required,
                ranked,
            } => write!(
                f,
                "insufficient ranked standings: {} has {} ranked entries, needs {}",
                group, ranked, required
            ),
            TournamentError::MatchNotFound(id) => write!(f, "match not found: {}", id),
            TournamentError::InvalidSetNumber(n) => {
                write!(f, "set number must be 1, 2 or 3 (got {})", n)
            }
            TournamentError::EmptyTeamName => write!(f, "team name must not be empty"),
        }
    }
}

/// Current phase of the tournament. The half step 1.5 covers the window where
/// zones are drafted but the group stage has not started. Persisted as the
/// JSON number the original data model uses (1, 1.5, 2, 3, 4), and ordered so
/// forward-only checks can compare phases directly.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
pub enum Phase {
    /// Team registration open.
    #[default]
    Registration,
    /// Zones drafted, group stage not yet started.
    ZonesDrafted,
    /// Group stage: knockout pairings within each zone.
    GroupStage,
    /// Ranking round: round robin among group-stage winners.
    RankingRound,
    /// Knockout: cross-zone semi-finals, third place and final.
    Knockout,
}

impl Phase {
    /// Numeric form used in the settings store.
    pub fn as_number(self) -> f64 {
        match self {
            Phase::Registration => 1.0,
            Phase::ZonesDrafted => 1.5,
            Phase::GroupStage => 2.0,
            Phase::RankingRound => 3.0,
            Phase::Knockout => 4.0,
        }
    }

    /// Parse the stored numeric form. Unknown numbers yield `None` so that a
    /// malformed setting degrades to a precondition failure, not a crash.
    pub fn from_number(n: f64) -> Option<Self> {
        if n == 1.0 {
            Some(Phase::Registration)
        } else if n == 1.5 {
            Some(Phase::ZonesDrafted)
        } else if n == 2.0 {
            Some(Phase::GroupStage)
        } else if n == 3.0 {
            Some(Phase::RankingRound)
        } else if n == 4.0 {
            Some(Phase::Knockout)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::ZonesDrafted => write!(f, "1.5"),
            other => write!(f, "{}", other.as_number() as u64),
        }
    }
}

impl Serialize for Phase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Phase::ZonesDrafted => serializer.serialize_f64(1.5),
            other => serializer.serialize_u64(other.as_number() as u64),
        }
    }
}

impl<'de> Deserialize<'de> for Phase {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let n = f64::deserialize(deserializer)?;
        Phase::from_number(n)
            .ok_or_else(|| D::Error::custom(format!("unknown tournament phase {}", n)))
    }
}

/// Zone assignment: zone label ("A", "B", ...) to one or more ordered seed
/// lists. The draw wraps each zone as a single list; the list order is the
/// seed order and is operator-editable while zones are drafted.
pub type ZoneAssignment = BTreeMap<String, Vec<Vec<Team>>>;

/// Standings per group name, recomputed wholesale.
pub type Standings = BTreeMap<String, Vec<TeamStats>>;

/// Full in-memory tournament snapshot: roster, zones, fixtures, derived
/// standings, and phase. One explicit aggregate, passed into the phase
/// machine and score ledger; fully re-derivable from the store at any time.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    /// Registered teams in creation order.
    pub teams: Vec<Team>,
    /// Zone assignment drafted at phase 1.5 (settings key "miniGroups").
    pub mini_groups: ZoneAssignment,
    /// Active fixtures, grouped.
    pub matches: Vec<GroupMatch>,
    /// Derived standings for the phase's relevant groups.
    pub standings: Standings,
    pub phase: Phase,
}

impl Tournament {
    /// Empty tournament in phase 1.
    pub fn new() -> Self {
        Self {
            teams: Vec::new(),
            mini_groups: ZoneAssignment::new(),
            matches: Vec::new(),
            standings: Standings::new(),
            phase: Phase::Registration,
        }
    }

    /// First seed list of a zone, if the zone exists.
    pub fn zone(&self, label: &str) -> Option<&[Team]> {
        self.mini_groups
            .get(label)
            .and_then(|lists| lists.first())
            .map(Vec::as_slice)
    }

    /// Fixture group by name.
    pub fn group_matches(&self, group: &str) -> Option<&GroupMatch> {
        self.matches.iter().find(|g| g.group == group)
    }

    /// Mutable match lookup across all groups by match id.
    pub fn find_match_mut(&mut self, match_id: &str) -> Option<&mut Match> {
        self.matches
            .iter_mut()
            .flat_map(|g| g.match_list.iter_mut())
            .find(|m| m.id == match_id)
    }
}

impl Default for Tournament {
    fn default() -> Self {
        Self::new()
    }
}
