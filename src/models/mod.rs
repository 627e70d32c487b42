//! Data structures for the badminton tournament: teams, scores, fixtures, phase.

mod fixture;
mod score;
mod team;
mod tournament;

pub use fixture::{
    GroupMatch, Match, FINAL, FINAL_ID, GROUP_A, GROUP_B, RANKING_A, RANKING_B, SEMI_1_ID,
    SEMI_2_ID, SEMI_FINAL_1, SEMI_FINAL_2, THIRD_ID, THIRD_PLACE,
};
pub use score::{MatchScore, SetScore, SetSlot, Side};
pub use team::{Team, TeamId, TeamStats};
pub use tournament::{Phase, Standings, Tournament, TournamentError, ZoneAssignment};
