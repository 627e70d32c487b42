//! Durable-store boundary: the record shapes the engine persists and the
//! async trait a store implementation must provide.
//!
//! The engine keeps no durable state of its own; teams, flat match rows and
//! two keyed settings ("phase" and "miniGroups") are enough to re-derive the
//! whole tournament snapshot. A store also pushes change notifications so
//! every connected client can silently re-read and converge.

mod memory;

pub use memory::MemoryStore;

use crate::models::{MatchScore, Phase, Team, TeamId, ZoneAssignment};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Settings key holding the numeric phase.
pub const PHASE_KEY: &str = "phase";
/// Settings key holding the zone assignment.
pub const MINI_GROUPS_KEY: &str = "miniGroups";

/// Errors crossing the store boundary. Store failures are advisory for the
/// operator; the in-memory snapshot is rolled back by a fresh read.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StoreError {
    /// The store is unreachable or rejected the write.
    Unavailable(String),
    /// No team row with this id.
    TeamNotFound(TeamId),
    /// No match row with this id.
    MatchNotFound(String),
    /// A bulk replace carried the same match id twice.
    DuplicateMatchId(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Unavailable(reason) => write!(f, "store unavailable: {}", reason),
            StoreError::TeamNotFound(id) => write!(f, "team not found in store: {}", id),
            StoreError::MatchNotFound(id) => write!(f, "match not found in store: {}", id),
            StoreError::DuplicateMatchId(id) => {
                write!(f, "duplicate match id in bulk replace: {}", id)
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// One flat match row: a match tagged with its group and phase, the shape
/// the store lists matches in.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id: String,
    pub group: String,
    pub team_a: Team,
    pub team_b: Team,
    pub score: MatchScore,
    pub phase: u8,
}

/// Typed view of the settings table. Keys absent from the store (new
/// tournament) or holding malformed values read back as `None`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SettingsSnapshot {
    pub phase: Option<Phase>,
    pub mini_groups: Option<ZoneAssignment>,
}

/// A typed settings upsert, one per key.
#[derive(Clone, Debug, PartialEq)]
pub enum SettingUpdate {
    Phase(Phase),
    MiniGroups(ZoneAssignment),
}

/// What changed in the store. Listeners re-read everything regardless, so
/// the event only names the record type.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChangeEvent {
    Teams,
    Matches,
    Settings,
}

/// The durable-store surface: three record types plus change notification.
/// All methods are async; implementations decide durability.
#[async_trait]
pub trait TournamentStore: Send + Sync {
    /// Insert a team, returning the row with its store-assigned id.
    async fn create_team(&self, name: &str) -> Result<Team, StoreError>;

    /// All teams, ordered by creation time.
    async fn list_teams(&self) -> Result<Vec<Team>, StoreError>;

    /// Rename a team.
    async fn update_team(&self, id: TeamId, name: &str) -> Result<(), StoreError>;

    /// Delete a team row. Callers must not delete a team referenced by an
    /// existing match.
    async fn delete_team(&self, id: TeamId) -> Result<(), StoreError>;

    /// Clear all match rows, then insert the given ones (full-snapshot
    /// overwrite). Duplicate ids in the batch are rejected.
    async fn replace_all_matches(&self, records: &[MatchRecord]) -> Result<(), StoreError>;

    /// All match rows, ordered by id.
    async fn list_matches(&self) -> Result<Vec<MatchRecord>, StoreError>;

    /// Overwrite one match's full score.
    async fn update_match_score(
        &self,
        match_id: &str,
        score: &MatchScore,
    ) -> Result<(), StoreError>;

    /// The typed settings snapshot (phase and zone assignment).
    async fn get_settings(&self) -> Result<SettingsSnapshot, StoreError>;

    /// Upsert one setting by key.
    async fn set_setting(&self, update: SettingUpdate) -> Result<(), StoreError>;

    /// Subscribe to change notifications. A lagged receiver just triggers
    /// an extra full re-read, so dropped events are harmless.
    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent>;
}
