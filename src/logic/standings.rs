//! Standings computation: teams + matches in, ranked statistics out.

use crate::models::{
    GroupMatch, Match, Phase, Standings, Team, TeamStats, Tournament, GROUP_A, GROUP_B, RANKING_A,
    RANKING_B,
};

/// Compute ranked standings for one group.
///
/// 1. One zero-valued row per team, in roster order.
/// 2. For each played match (set1 not 0-0), accumulate points and set wins
///    over the played sets; a 0-0 set contributes nothing.
/// 3. Majority of sets won decides the match: 3 points and a win for the
///    winner, a loss for the other side. Equal set counts award nothing
///    (an unfinished or anomalous match, not a draw).
/// 4. Diffs are recomputed after all matches.
/// 5. Sort by points, then sets diff, then points diff, all descending. The
///    sort is stable, so teams equal on all three keep their roster order.
///
/// The computation always starts from zero; it is never patched
/// incrementally, so calling it twice on the same input is idempotent.
pub fn calculate_standings(teams: &[Team], matches: &[Match]) -> Vec<TeamStats> {
    let mut stats: Vec<TeamStats> = teams.iter().cloned().map(TeamStats::zeroed).collect();

    for m in matches {
        if !m.score.is_played() {
            continue;
        }
        let ia = stats.iter().position(|s| s.team.id == m.team_a.id);
        let ib = stats.iter().position(|s| s.team.id == m.team_b.id);
        // Matches referencing teams outside this roster contribute nothing.
        let (Some(ia), Some(ib)) = (ia, ib) else {
            continue;
        };

        stats[ia].played += 1;
        stats[ib].played += 1;

        let mut sets_a = 0;
        let mut sets_b = 0;
        for set in m.score.sets() {
            if !set.is_played() {
                continue;
            }
            stats[ia].points_won += set.a;
            stats[ia].points_lost += set.b;
            stats[ib].points_won += set.b;
            stats[ib].points_lost += set.a;
            if set.a > set.b {
                sets_a += 1;
            }
            if set.b > set.a {
                sets_b += 1;
            }
        }

        stats[ia].sets_won += sets_a;
        stats[ia].sets_lost += sets_b;
        stats[ib].sets_won += sets_b;
        stats[ib].sets_lost += sets_a;

        if sets_a > sets_b {
            stats[ia].won += 1;
            stats[ia].points += 3;
            stats[ib].lost += 1;
        } else if sets_b > sets_a {
            stats[ib].won += 1;
            stats[ib].points += 3;
            stats[ia].lost += 1;
        }
    }

    for s in &mut stats {
        s.sets_diff = s.sets_won as i32 - s.sets_lost as i32;
        s.points_diff = s.points_won as i32 - s.points_lost as i32;
    }

    stats.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.sets_diff.cmp(&a.sets_diff))
            .then(b.points_diff.cmp(&a.points_diff))
    });
    stats
}

/// Recompute the aggregate's standings for the groups the current phase
/// cares about. Mandatory postcondition of every operation that touches the
/// fixtures or the phase.
///
/// Phase 2 ranks each zone's teams over the "Group A"/"Group B" fixtures;
/// phase 3 ranks the participants of "Ranking A"/"Ranking B". Any other
/// phase clears the standings: the knockout bracket computes match winners
/// directly, and a cached table describing discarded fixtures would drift.
pub fn recalculate_standings(tournament: &mut Tournament) {
    let targets: Vec<(&'static str, Vec<Team>)> = match tournament.phase {
        Phase::GroupStage => {
            let (Some(zone_a), Some(zone_b)) = (tournament.zone("A"), tournament.zone("B")) else {
                return;
            };
            vec![(GROUP_A, zone_a.to_vec()), (GROUP_B, zone_b.to_vec())]
        }
        Phase::RankingRound => {
            let teams_a = unique_participants(tournament.group_matches(RANKING_A));
            let teams_b = unique_participants(tournament.group_matches(RANKING_B));
            if teams_a.is_empty() || teams_b.is_empty() {
                return;
            }
            vec![(RANKING_A, teams_a), (RANKING_B, teams_b)]
        }
        _ => {
            tournament.standings.clear();
            return;
        }
    };

    let mut standings = Standings::new();
    for (group, teams) in targets {
        if let Some(fixtures) = tournament.group_matches(group) {
            standings.insert(
                group.to_string(),
                calculate_standings(&teams, &fixtures.match_list),
            );
        }
    }
    tournament.standings = standings;
}

/// Participants of a fixture group, deduplicated by team id in first
/// appearance order.
fn unique_participants(group: Option<&GroupMatch>) -> Vec<Team> {
    let mut teams: Vec<Team> = Vec::new();
    if let Some(g) = group {
        for m in &g.match_list {
            for team in [&m.team_a, &m.team_b] {
                if !teams.iter().any(|t| t.id == team.id) {
                    teams.push(team.clone());
                }
            }
        }
    }
    teams
}
