//! Tournament progression engine: fixture generation, standings, the phase
//! state machine and the score ledger. Everything here is pure and
//! synchronous; durable storage lives behind [`crate::store`].

mod fixtures;
mod phases;
mod scores;
mod standings;

pub use fixtures::{divide_groups, generate_knockout_matches, generate_round_robin_matches};
pub use phases::{
    generate_knockout_bracket, generate_zones, reset_tournament, start_group_stage,
    start_ranking_round, update_zones, MIN_TEAMS_FOR_ZONES, QUALIFIERS_PER_ZONE,
    WINNERS_PER_GROUP,
};
pub use scores::apply_score_edit;
pub use standings::{calculate_standings, recalculate_standings};
