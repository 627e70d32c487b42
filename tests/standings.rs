//! Integration tests for the standings calculator.

use badminton_tournament_web::{
    calculate_standings, Match, MatchScore, SetScore, Team, TeamStats,
};

fn team(id: i64) -> Team {
    Team::new(id, format!("Team {id}"))
}

fn teams(n: usize) -> Vec<Team> {
    (1..=n as i64).map(team).collect()
}

fn score(sets: [(u32, u32); 3]) -> MatchScore {
    MatchScore {
        set1: SetScore::new(sets[0].0, sets[0].1),
        set2: SetScore::new(sets[1].0, sets[1].1),
        set3: SetScore::new(sets[2].0, sets[2].1),
    }
}

fn played(a: i64, b: i64, sets: [(u32, u32); 3]) -> Match {
    let mut m = Match::new(format!("{a}-{b}"), team(a), team(b));
    m.score = score(sets);
    m
}

fn row<'a>(stats: &'a [TeamStats], id: i64) -> &'a TeamStats {
    stats.iter().find(|s| s.team.id == id).unwrap()
}

#[test]
fn straight_sets_win_awards_three_points() {
    let matches = vec![played(1, 2, [(21, 15), (21, 18), (0, 0)])];
    let stats = calculate_standings(&teams(2), &matches);

    let winner = row(&stats, 1);
    assert_eq!(winner.played, 1);
    assert_eq!(winner.won, 1);
    assert_eq!(winner.lost, 0);
    assert_eq!(winner.points, 3);
    assert_eq!(winner.sets_won, 2);
    assert_eq!(winner.sets_lost, 0);
    assert_eq!(winner.points_won, 42);
    assert_eq!(winner.points_lost, 33);

    let loser = row(&stats, 2);
    assert_eq!(loser.won, 0);
    assert_eq!(loser.lost, 1);
    assert_eq!(loser.points, 0);
    // Winner sorts first.
    assert_eq!(stats[0].team.id, 1);
}

#[test]
fn unplayed_zero_zero_set_contributes_nothing() {
    let matches = vec![played(1, 2, [(21, 10), (0, 0), (21, 12)])];
    let stats = calculate_standings(&teams(2), &matches);
    let winner = row(&stats, 1);
    assert_eq!(winner.sets_won, 2);
    assert_eq!(winner.points_won, 42);
    assert_eq!(winner.points_lost, 22);
}

#[test]
fn wholly_unplayed_match_contributes_nothing() {
    let matches = vec![Match::new("1-2", team(1), team(2))];
    let stats = calculate_standings(&teams(2), &matches);
    assert!(stats.iter().all(|s| *s == TeamStats::zeroed(s.team.clone())));
}

#[test]
fn tied_sets_award_no_win_and_no_points() {
    // One set each, third never played: undecided, not a draw.
    let matches = vec![played(1, 2, [(21, 15), (15, 21), (0, 0)])];
    let stats = calculate_standings(&teams(2), &matches);
    for id in [1, 2] {
        let s = row(&stats, id);
        assert_eq!(s.played, 1);
        assert_eq!(s.won, 0);
        assert_eq!(s.lost, 0);
        assert_eq!(s.points, 0);
        assert_eq!(s.sets_won, 1);
        assert_eq!(s.sets_lost, 1);
    }
}

#[test]
fn teams_without_matches_still_get_a_row() {
    let matches = vec![played(1, 2, [(21, 10), (21, 10), (0, 0)])];
    let stats = calculate_standings(&teams(4), &matches);
    assert_eq!(stats.len(), 4);
    assert_eq!(row(&stats, 3).played, 0);
    assert_eq!(row(&stats, 4).played, 0);
}

#[test]
fn matches_outside_the_roster_are_skipped() {
    let matches = vec![played(8, 9, [(21, 10), (21, 10), (0, 0)])];
    let stats = calculate_standings(&teams(2), &matches);
    assert!(stats.iter().all(|s| s.played == 0));
}

#[test]
fn diffs_equal_won_minus_lost_for_every_team() {
    let matches = vec![
        played(1, 2, [(21, 15), (18, 21), (21, 19)]),
        played(1, 3, [(12, 21), (21, 16), (19, 21)]),
        played(2, 3, [(21, 5), (21, 7), (0, 0)]),
    ];
    let stats = calculate_standings(&teams(3), &matches);
    for s in &stats {
        assert_eq!(s.sets_diff, s.sets_won as i32 - s.sets_lost as i32);
        assert_eq!(s.points_diff, s.points_won as i32 - s.points_lost as i32);
    }
}

#[test]
fn calculation_is_idempotent() {
    let roster = teams(4);
    let matches = vec![
        played(1, 2, [(21, 15), (21, 18), (0, 0)]),
        played(3, 4, [(19, 21), (21, 12), (21, 23)]),
    ];
    let first = calculate_standings(&roster, &matches);
    let second = calculate_standings(&roster, &matches);
    assert_eq!(first, second);
}

#[test]
fn sets_diff_breaks_point_ties_before_points_diff() {
    // Teams 1 and 2 both end on 3 match points; team 2 has the better sets
    // diff but the worse points diff, and sets diff must decide.
    let matches = vec![
        played(1, 3, [(21, 10), (10, 21), (21, 10)]), // 1 wins 2-1, +11 points
        played(2, 4, [(21, 19), (21, 19), (0, 0)]),   // 2 wins 2-0, +4 points
    ];
    let stats = calculate_standings(&teams(4), &matches);
    assert_eq!(row(&stats, 1).points, 3);
    assert_eq!(row(&stats, 2).points, 3);
    assert!(row(&stats, 2).sets_diff > row(&stats, 1).sets_diff);
    assert!(row(&stats, 2).points_diff < row(&stats, 1).points_diff);
    assert_eq!(stats[0].team.id, 2);
    assert_eq!(stats[1].team.id, 1);
}

#[test]
fn full_ties_keep_roster_order() {
    let stats = calculate_standings(&teams(3), &[]);
    let ids: Vec<i64> = stats.iter().map(|s| s.team.id).collect();
    assert_eq!(ids, [1, 2, 3]);
}
