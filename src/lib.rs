//! Badminton tournament web app: progression engine, store boundary and
//! orchestration.
//!
//! The engine (`logic` over `models`) is pure and synchronous: fixtures,
//! standings, phase transitions and score edits are computations over one
//! in-memory [`Tournament`] snapshot. Durable state lives entirely behind
//! the [`store::TournamentStore`] trait; [`TournamentService`] glues the two
//! together with an optimistic local-first write policy.

pub mod logic;
pub mod models;
pub mod service;
pub mod store;

pub use logic::{
    apply_score_edit, calculate_standings, divide_groups, generate_knockout_bracket,
    generate_knockout_matches, generate_round_robin_matches, generate_zones,
    recalculate_standings, reset_tournament, start_group_stage, start_ranking_round,
    update_zones, MIN_TEAMS_FOR_ZONES, QUALIFIERS_PER_ZONE, WINNERS_PER_GROUP,
};
pub use models::{
    GroupMatch, Match, MatchScore, Phase, SetScore, SetSlot, Side, Standings, Team, TeamId,
    TeamStats, Tournament, TournamentError, ZoneAssignment,
};
pub use service::{ServiceError, TournamentService};
