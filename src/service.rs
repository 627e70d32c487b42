//! Orchestration between the pure engine and the durable store.
//!
//! Policy: optimistic local-first apply. Every operation mutates the
//! in-memory snapshot synchronously through the engine, then issues its
//! durable writes. On a durable-write failure the local snapshot is
//! discarded and replaced by a fresh read from the store; the error
//! surfaces to the operator as advisory. No merging, last durable write
//! wins. Two operators editing the same match may overwrite each other;
//! the store's write order is the tiebreak.

use crate::logic::{
    apply_score_edit, generate_knockout_bracket, generate_zones, recalculate_standings,
    reset_tournament, start_group_stage, start_ranking_round, update_zones,
};
use crate::models::{
    GroupMatch, Match, Phase, SetSlot, Side, Team, TeamId, Tournament, TournamentError,
    ZoneAssignment,
};
use crate::store::{
    ChangeEvent, MatchRecord, SettingUpdate, StoreError, TournamentStore,
};
use chrono::Utc;
use std::sync::RwLock;
use tokio::sync::broadcast;

/// Errors surfaced by the service layer.
#[derive(Clone, Debug, PartialEq)]
pub enum ServiceError {
    /// A named engine precondition failed; the snapshot is unchanged.
    Tournament(TournamentError),
    /// A durable write or read failed; the snapshot has been resynced from
    /// the store's last good state.
    Store(StoreError),
    /// The snapshot lock was poisoned by a panicking thread.
    Lock,
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Tournament(e) => write!(f, "{}", e),
            ServiceError::Store(e) => write!(f, "{}", e),
            ServiceError::Lock => write!(f, "tournament state lock poisoned"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<TournamentError> for ServiceError {
    fn from(e: TournamentError) -> Self {
        ServiceError::Tournament(e)
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        ServiceError::Store(e)
    }
}

/// Owns the in-memory tournament snapshot and the durable-store handle.
///
/// The snapshot lives behind a plain `std::sync::RwLock`; guards are never
/// held across an await point.
pub struct TournamentService<S: TournamentStore> {
    state: RwLock<Tournament>,
    store: S,
}

impl<S: TournamentStore> TournamentService<S> {
    pub fn new(store: S) -> Self {
        Self {
            state: RwLock::new(Tournament::new()),
            store,
        }
    }

    /// Clone of the current snapshot.
    pub fn snapshot(&self) -> Result<Tournament, ServiceError> {
        Ok(self.state.read().map_err(|_| ServiceError::Lock)?.clone())
    }

    /// Change feed from the store. An embedding process listens on this and
    /// calls [`refresh`](Self::refresh) so every client converges without
    /// user action.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.store.subscribe()
    }

    /// Full re-read from the store: teams, settings, matches, then a
    /// standings recomputation. Replaces the snapshot wholesale; a fresh
    /// process resumes phase and zones from the settings.
    pub async fn refresh(&self) -> Result<Tournament, ServiceError> {
        let teams = self.store.list_teams().await?;
        let settings = self.store.get_settings().await?;
        let records = self.store.list_matches().await?;

        let mut tournament = Tournament {
            teams,
            mini_groups: settings.mini_groups.unwrap_or_default(),
            matches: regroup(records),
            standings: Default::default(),
            phase: settings.phase.unwrap_or(Phase::Registration),
        };
        recalculate_standings(&mut tournament);

        let mut state = self.state.write().map_err(|_| ServiceError::Lock)?;
        *state = tournament.clone();
        Ok(tournament)
    }

    /// On a failed durable write: drop the optimistic snapshot, resync, and
    /// surface the store error as advisory.
    async fn rollback(&self, error: StoreError) -> ServiceError {
        log::warn!("durable write failed ({}), resyncing from store", error);
        if let Err(refresh_err) = self.refresh().await {
            log::error!("resync after failed write also failed: {}", refresh_err);
        }
        ServiceError::Store(error)
    }

    /// Register a team. The local snapshot gets a provisional row keyed by a
    /// millisecond timestamp, swapped for the store-assigned row once the
    /// insert lands.
    pub async fn add_team(&self, name: &str) -> Result<Tournament, ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::EmptyTeamName.into());
        }

        let provisional_id = Utc::now().timestamp_millis();
        {
            let mut state = self.state.write().map_err(|_| ServiceError::Lock)?;
            state.teams.push(Team::new(provisional_id, name));
        }

        match self.store.create_team(name).await {
            Ok(team) => {
                let mut state = self.state.write().map_err(|_| ServiceError::Lock)?;
                if let Some(row) = state.teams.iter_mut().find(|t| t.id == provisional_id) {
                    *row = team;
                }
                Ok(state.clone())
            }
            Err(e) => Err(self.rollback(e).await),
        }
    }

    /// Rename a team in the snapshot, then write through.
    pub async fn rename_team(&self, id: TeamId, name: &str) -> Result<Tournament, ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::EmptyTeamName.into());
        }
        {
            let mut state = self.state.write().map_err(|_| ServiceError::Lock)?;
            if let Some(team) = state.teams.iter_mut().find(|t| t.id == id) {
                team.name = name.to_string();
            }
        }
        match self.store.update_team(id, name).await {
            Ok(()) => self.snapshot(),
            Err(e) => Err(self.rollback(e).await),
        }
    }

    /// Remove a team. Callers must not remove a team referenced by an
    /// existing match; the engine does not police this.
    pub async fn remove_team(&self, id: TeamId) -> Result<Tournament, ServiceError> {
        {
            let mut state = self.state.write().map_err(|_| ServiceError::Lock)?;
            state.teams.retain(|t| t.id != id);
        }
        match self.store.delete_team(id).await {
            Ok(()) => self.snapshot(),
            Err(e) => Err(self.rollback(e).await),
        }
    }

    /// Zone draw: split the roster into zones A/B and persist the draft.
    pub async fn generate_zones(&self) -> Result<Tournament, ServiceError> {
        let after = {
            let mut state = self.state.write().map_err(|_| ServiceError::Lock)?;
            generate_zones(&mut state)?;
            state.clone()
        };
        self.persist_phase_change(&after, true).await
    }

    /// Replace the zone assignment with an operator-edited one.
    pub async fn update_zones(&self, zones: ZoneAssignment) -> Result<Tournament, ServiceError> {
        let after = {
            let mut state = self.state.write().map_err(|_| ServiceError::Lock)?;
            update_zones(&mut state, zones)?;
            state.clone()
        };
        if let Err(e) = self
            .store
            .set_setting(SettingUpdate::MiniGroups(after.mini_groups.clone()))
            .await
        {
            return Err(self.rollback(e).await);
        }
        Ok(after)
    }

    /// Start the group stage and persist the new fixtures.
    pub async fn start_group_stage(&self) -> Result<Tournament, ServiceError> {
        let after = {
            let mut state = self.state.write().map_err(|_| ServiceError::Lock)?;
            start_group_stage(&mut state)?;
            state.clone()
        };
        self.persist_phase_change(&after, false).await
    }

    /// Start the ranking round and persist the new fixtures.
    pub async fn start_ranking_round(&self) -> Result<Tournament, ServiceError> {
        let after = {
            let mut state = self.state.write().map_err(|_| ServiceError::Lock)?;
            start_ranking_round(&mut state)?;
            state.clone()
        };
        self.persist_phase_change(&after, false).await
    }

    /// Build the knockout bracket and persist it.
    pub async fn generate_knockout_bracket(&self) -> Result<Tournament, ServiceError> {
        let after = {
            let mut state = self.state.write().map_err(|_| ServiceError::Lock)?;
            generate_knockout_bracket(&mut state)?;
            state.clone()
        };
        self.persist_phase_change(&after, false).await
    }

    /// Wholesale reset back to registration. The roster stays.
    pub async fn reset(&self) -> Result<Tournament, ServiceError> {
        let after = {
            let mut state = self.state.write().map_err(|_| ServiceError::Lock)?;
            reset_tournament(&mut state)?;
            state.clone()
        };
        self.persist_phase_change(&after, true).await
    }

    /// Apply one set-score edit, recompute standings, then write the whole
    /// match score through. An engine `MatchNotFound` means the snapshot is
    /// stale, so it additionally forces a resync before reporting.
    pub async fn update_score(
        &self,
        match_id: &str,
        slot: SetSlot,
        side: Side,
        value: u32,
    ) -> Result<Tournament, ServiceError> {
        let result = {
            let mut state = self.state.write().map_err(|_| ServiceError::Lock)?;
            apply_score_edit(&mut state, match_id, slot, side, value).map(|()| {
                recalculate_standings(&mut state);
                let score = state
                    .find_match_mut(match_id)
                    .map(|m| m.score)
                    .unwrap_or_default();
                (state.clone(), score)
            })
        };
        let (after, score) = match result {
            Ok(pair) => pair,
            Err(e @ TournamentError::MatchNotFound(_)) => {
                if let Err(refresh_err) = self.refresh().await {
                    log::error!("resync after stale score edit failed: {}", refresh_err);
                }
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        };

        match self.store.update_match_score(match_id, &score).await {
            Ok(()) => Ok(after),
            Err(e) => Err(self.rollback(e).await),
        }
    }

    /// Persist what a phase transition changed: fixtures (or their absence),
    /// the phase number, and optionally the zone assignment.
    async fn persist_phase_change(
        &self,
        after: &Tournament,
        zones_changed: bool,
    ) -> Result<Tournament, ServiceError> {
        let records = flatten(&after.matches);
        if let Err(e) = self.store.replace_all_matches(&records).await {
            return Err(self.rollback(e).await);
        }
        if zones_changed {
            if let Err(e) = self
                .store
                .set_setting(SettingUpdate::MiniGroups(after.mini_groups.clone()))
                .await
            {
                return Err(self.rollback(e).await);
            }
        }
        if let Err(e) = self.store.set_setting(SettingUpdate::Phase(after.phase)).await {
            return Err(self.rollback(e).await);
        }
        Ok(after.clone())
    }
}

/// Flatten grouped fixtures into the store's flat row shape.
fn flatten(groups: &[GroupMatch]) -> Vec<MatchRecord> {
    groups
        .iter()
        .flat_map(|g| {
            g.match_list.iter().map(|m| MatchRecord {
                id: m.id.clone(),
                group: g.group.clone(),
                team_a: m.team_a.clone(),
                team_b: m.team_b.clone(),
                score: m.score,
                phase: g.phase,
            })
        })
        .collect()
}

/// Regroup flat store rows into fixture groups: groups sorted by name,
/// match lists by id (the store lists rows by id already).
fn regroup(records: Vec<MatchRecord>) -> Vec<GroupMatch> {
    let mut groups: Vec<GroupMatch> = Vec::new();
    for record in records {
        let m = Match {
            id: record.id,
            team_a: record.team_a,
            team_b: record.team_b,
            score: record.score,
        };
        match groups.iter().position(|g| g.group == record.group) {
            Some(i) => groups[i].match_list.push(m),
            None => groups.push(GroupMatch::new(record.group, vec![m], record.phase)),
        }
    }
    groups.sort_by(|a, b| a.group.cmp(&b.group));
    for g in &mut groups {
        g.match_list.sort_by(|a, b| a.id.cmp(&b.id));
    }
    groups
}
