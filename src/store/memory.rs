//! In-process store: serial team ids, flat match rows, raw keyed settings.
//!
//! Cloning a `MemoryStore` clones a handle to the same shared state, the way
//! a database connection handle would. Every effective change is broadcast
//! to subscribers.

use crate::models::{MatchScore, Phase, Team, TeamId, ZoneAssignment};
use crate::store::{
    ChangeEvent, MatchRecord, SettingUpdate, SettingsSnapshot, StoreError, TournamentStore,
    MINI_GROUPS_KEY, PHASE_KEY,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

/// One team row with its creation time, which drives the listing order.
#[derive(Clone, Debug)]
struct TeamRow {
    team: Team,
    created_at: DateTime<Utc>,
}

#[derive(Debug)]
struct Inner {
    teams: Vec<TeamRow>,
    next_team_id: TeamId,
    matches: Vec<MatchRecord>,
    /// Settings kept as raw JSON values, validated into the typed snapshot
    /// on read. A malformed value reads back as absent, never a crash.
    settings: HashMap<String, serde_json::Value>,
}

/// In-memory [`TournamentStore`] used by the web binary and the tests.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
    events: broadcast::Sender<ChangeEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(RwLock::new(Inner {
                teams: Vec::new(),
                next_team_id: 1,
                matches: Vec::new(),
                settings: HashMap::new(),
            })),
            events,
        }
    }

    fn notify(&self, event: ChangeEvent) {
        // Nobody listening is fine.
        let _ = self.events.send(event);
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TournamentStore for MemoryStore {
    async fn create_team(&self, name: &str) -> Result<Team, StoreError> {
        let mut inner = self.write()?;
        let id = inner.next_team_id;
        inner.next_team_id += 1;
        let team = Team::new(id, name);
        inner.teams.push(TeamRow {
            team: team.clone(),
            created_at: Utc::now(),
        });
        drop(inner);
        self.notify(ChangeEvent::Teams);
        Ok(team)
    }

    async fn list_teams(&self) -> Result<Vec<Team>, StoreError> {
        let inner = self.read()?;
        let mut rows: Vec<&TeamRow> = inner.teams.iter().collect();
        rows.sort_by_key(|r| r.created_at);
        Ok(rows.into_iter().map(|r| r.team.clone()).collect())
    }

    async fn update_team(&self, id: TeamId, name: &str) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let row = inner
            .teams
            .iter_mut()
            .find(|r| r.team.id == id)
            .ok_or(StoreError::TeamNotFound(id))?;
        row.team.name = name.to_string();
        drop(inner);
        self.notify(ChangeEvent::Teams);
        Ok(())
    }

    async fn delete_team(&self, id: TeamId) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let before = inner.teams.len();
        inner.teams.retain(|r| r.team.id != id);
        if inner.teams.len() == before {
            return Err(StoreError::TeamNotFound(id));
        }
        drop(inner);
        self.notify(ChangeEvent::Teams);
        Ok(())
    }

    async fn replace_all_matches(&self, records: &[MatchRecord]) -> Result<(), StoreError> {
        for (i, record) in records.iter().enumerate() {
            if records[..i].iter().any(|r| r.id == record.id) {
                return Err(StoreError::DuplicateMatchId(record.id.clone()));
            }
        }
        let mut inner = self.write()?;
        inner.matches = records.to_vec();
        drop(inner);
        self.notify(ChangeEvent::Matches);
        Ok(())
    }

    async fn list_matches(&self) -> Result<Vec<MatchRecord>, StoreError> {
        let inner = self.read()?;
        let mut records = inner.matches.clone();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    async fn update_match_score(
        &self,
        match_id: &str,
        score: &MatchScore,
    ) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let record = inner
            .matches
            .iter_mut()
            .find(|r| r.id == match_id)
            .ok_or_else(|| StoreError::MatchNotFound(match_id.to_string()))?;
        record.score = *score;
        drop(inner);
        self.notify(ChangeEvent::Matches);
        Ok(())
    }

    async fn get_settings(&self) -> Result<SettingsSnapshot, StoreError> {
        let inner = self.read()?;
        let phase = inner.settings.get(PHASE_KEY).and_then(|v| {
            let parsed = v.as_f64().and_then(Phase::from_number);
            if parsed.is_none() {
                log::warn!("ignoring malformed phase setting: {}", v);
            }
            parsed
        });
        let mini_groups = inner.settings.get(MINI_GROUPS_KEY).and_then(|v| {
            let parsed = serde_json::from_value::<ZoneAssignment>(v.clone()).ok();
            if parsed.is_none() {
                log::warn!("ignoring malformed miniGroups setting");
            }
            parsed
        });
        Ok(SettingsSnapshot { phase, mini_groups })
    }

    async fn set_setting(&self, update: SettingUpdate) -> Result<(), StoreError> {
        let (key, value) = match update {
            SettingUpdate::Phase(phase) => (
                PHASE_KEY,
                serde_json::to_value(phase)
                    .map_err(|e| StoreError::Unavailable(e.to_string()))?,
            ),
            SettingUpdate::MiniGroups(zones) => (
                MINI_GROUPS_KEY,
                serde_json::to_value(zones)
                    .map_err(|e| StoreError::Unavailable(e.to_string()))?,
            ),
        };
        let mut inner = self.write()?;
        inner.settings.insert(key.to_string(), value);
        drop(inner);
        self.notify(ChangeEvent::Settings);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }
}
