//! Phase state machine: forward-only transitions from registration to the
//! knockout bracket, plus the wholesale reset back to phase 1.

use crate::logic::fixtures::{
    divide_groups, generate_knockout_matches, generate_round_robin_matches,
};
use crate::logic::standings::recalculate_standings;
use crate::models::{
    GroupMatch, Match, Phase, Team, Tournament, TournamentError, ZoneAssignment, FINAL, FINAL_ID,
    GROUP_A, GROUP_B, RANKING_A, RANKING_B, SEMI_1_ID, SEMI_2_ID, SEMI_FINAL_1, SEMI_FINAL_2,
    THIRD_ID, THIRD_PLACE,
};

/// Registered teams required before the zone draw is allowed.
pub const MIN_TEAMS_FOR_ZONES: usize = 12;
/// Decided winners each group must produce before the ranking round starts.
pub const WINNERS_PER_GROUP: usize = 3;
/// Ranked entries each ranking group must have before the knockout draw.
pub const QUALIFIERS_PER_ZONE: usize = 2;

/// Split the roster into zones A and B (phase 1 or 1.5 -> 1.5).
///
/// Teams are split in registration order into two contiguous halves, each
/// wrapped as a single seed list. Requires at least [`MIN_TEAMS_FOR_ZONES`]
/// teams. Existing fixtures and standings are discarded; the draw can be
/// re-run while the group stage has not started.
pub fn generate_zones(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.phase >= Phase::GroupStage {
        return Err(TournamentError::WrongPhase {
            operation: "the zone draw",
            phase: tournament.phase,
        });
    }
    if tournament.teams.len() < MIN_TEAMS_FOR_ZONES {
        return Err(TournamentError::InsufficientTeams {
            required: MIN_TEAMS_FOR_ZONES,
            registered: tournament.teams.len(),
        });
    }

    let mut slices = divide_groups(&tournament.teams, 2).into_iter();
    let (Some(zone_a), Some(zone_b)) = (slices.next(), slices.next()) else {
        return Err(TournamentError::InsufficientTeams {
            required: MIN_TEAMS_FOR_ZONES,
            registered: tournament.teams.len(),
        });
    };

    let mut zones = ZoneAssignment::new();
    zones.insert("A".to_string(), vec![zone_a]);
    zones.insert("B".to_string(), vec![zone_b]);

    tournament.mini_groups = zones;
    tournament.matches.clear();
    tournament.phase = Phase::ZonesDrafted;
    recalculate_standings(tournament);
    Ok(())
}

/// Replace the zone assignment with an operator-edited one (phase 1.5 -> 1.5).
///
/// The seed order inside each list is significant for the group-stage
/// pairings, which is why the operator gets to reorder it.
pub fn update_zones(
    tournament: &mut Tournament,
    zones: ZoneAssignment,
) -> Result<(), TournamentError> {
    if tournament.phase != Phase::ZonesDrafted {
        return Err(TournamentError::WrongPhase {
            operation: "zone editing",
            phase: tournament.phase,
        });
    }
    tournament.mini_groups = zones;
    Ok(())
}

/// Generate the group-stage fixtures (phase 1.5 -> 2).
///
/// Each zone's seed list is paired off into knockout matches ("Group A" and
/// "Group B"), all scores zeroed. Both zones must have teams.
pub fn start_group_stage(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.phase != Phase::ZonesDrafted {
        return Err(TournamentError::WrongPhase {
            operation: "starting the group stage",
            phase: tournament.phase,
        });
    }
    let zone_a = non_empty_zone(tournament, "A")?;
    let zone_b = non_empty_zone(tournament, "B")?;

    tournament.matches = vec![
        GroupMatch::new(GROUP_A, generate_knockout_matches(&zone_a), 2),
        GroupMatch::new(GROUP_B, generate_knockout_matches(&zone_b), 2),
    ];
    tournament.phase = Phase::GroupStage;
    recalculate_standings(tournament);
    Ok(())
}

/// Generate the ranking-round fixtures (phase 2 -> 3).
///
/// Winners are read off each group's matches by majority of sets; undecided
/// matches contribute nobody, which can legitimately block this transition
/// until their scores are completed. Each group needs at least
/// [`WINNERS_PER_GROUP`] decided winners. The group-stage fixtures are
/// replaced wholesale by one round robin per zone ("Ranking A"/"Ranking B").
pub fn start_ranking_round(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.phase != Phase::GroupStage {
        return Err(TournamentError::WrongPhase {
            operation: "starting the ranking round",
            phase: tournament.phase,
        });
    }
    let winners_a = group_winners(tournament, GROUP_A);
    let winners_b = group_winners(tournament, GROUP_B);
    for (group, winners) in [(GROUP_A, &winners_a), (GROUP_B, &winners_b)] {
        if winners.len() < WINNERS_PER_GROUP {
            return Err(TournamentError::InsufficientWinners {
                group: group.to_string(),
                required: WINNERS_PER_GROUP,
                decided: winners.len(),
            });
        }
    }

    tournament.matches = vec![
        GroupMatch::new(RANKING_A, generate_round_robin_matches(&winners_a), 3),
        GroupMatch::new(RANKING_B, generate_round_robin_matches(&winners_b), 3),
    ];
    tournament.phase = Phase::RankingRound;
    recalculate_standings(tournament);
    Ok(())
}

/// Build the knockout bracket from the ranking-round standings (phase 3 -> 4).
///
/// Takes rank 1 and 2 of each ranking group and seeds the fixed cross-zone
/// bracket: Semi 1 = A1 vs B2, Semi 2 = B1 vs A2. Third-place and final
/// slots stay unresolved until the semis decide them.
pub fn generate_knockout_bracket(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.phase != Phase::RankingRound {
        return Err(TournamentError::WrongPhase {
            operation: "the knockout draw",
            phase: tournament.phase,
        });
    }
    let [a1, a2] = ranked_qualifiers(tournament, RANKING_A)?;
    let [b1, b2] = ranked_qualifiers(tournament, RANKING_B)?;

    tournament.matches = vec![
        GroupMatch::new(SEMI_FINAL_1, vec![Match::new(SEMI_1_ID, a1, b2)], 4),
        GroupMatch::new(SEMI_FINAL_2, vec![Match::new(SEMI_2_ID, b1, a2)], 4),
        GroupMatch::new(
            THIRD_PLACE,
            vec![Match::new(
                THIRD_ID,
                Team::new(0, "Loser SF1"),
                Team::new(0, "Loser SF2"),
            )],
            4,
        ),
        GroupMatch::new(
            FINAL,
            vec![Match::new(
                FINAL_ID,
                Team::new(0, "Winner SF1"),
                Team::new(0, "Winner SF2"),
            )],
            4,
        ),
    ];
    tournament.phase = Phase::Knockout;
    recalculate_standings(tournament);
    Ok(())
}

/// Wholesale reset (any phase >= 2 -> 1): discard fixtures, zones and
/// standings, keep the team roster. Operator confirmation is the caller's
/// concern.
pub fn reset_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.phase < Phase::GroupStage {
        return Err(TournamentError::WrongPhase {
            operation: "reset",
            phase: tournament.phase,
        });
    }
    tournament.matches.clear();
    tournament.mini_groups.clear();
    tournament.phase = Phase::Registration;
    recalculate_standings(tournament);
    Ok(())
}

/// A zone's seed list, required non-empty.
fn non_empty_zone(tournament: &Tournament, label: &str) -> Result<Vec<Team>, TournamentError> {
    match tournament.zone(label) {
        Some(teams) if !teams.is_empty() => Ok(teams.to_vec()),
        _ => Err(TournamentError::InsufficientZones {
            zone: label.to_string(),
        }),
    }
}

/// Decided winners of a group's matches, in fixture order.
fn group_winners(tournament: &Tournament, group: &str) -> Vec<Team> {
    tournament
        .group_matches(group)
        .map(|g| g.match_list.iter().filter_map(|m| m.winner().cloned()).collect())
        .unwrap_or_default()
}

/// Top two teams of a ranking group's standings.
fn ranked_qualifiers(
    tournament: &Tournament,
    group: &str,
) -> Result<[Team; 2], TournamentError> {
    let rows = tournament
        .standings
        .get(group)
        .map(Vec::as_slice)
        .unwrap_or_default();
    if rows.len() < QUALIFIERS_PER_ZONE {
        return Err(TournamentError::InsufficientStandings {
            group: group.to_string(),
            required: QUALIFIERS_PER_ZONE,
            ranked: rows.len(),
        });
    }
    Ok([rows[0].team.clone(), rows[1].team.clone()])
}
