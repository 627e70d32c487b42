//! Fixture generation: zone splitting, round-robin and knockout pairings.
//!
//! All three functions are pure and order-preserving: identical input order
//! gives identical output, so regenerating fixtures is idempotent. Callers
//! who want seeding by rank or a random draw must pre-order the input.

use crate::models::{Match, Team};

/// Split an ordered list into `g` nearly-equal contiguous slices.
///
/// Slice size is `ceil(len / g)`; the last slice may be shorter and empty
/// slices are dropped, so fewer than `g` slices can come back. `g == 0`
/// yields no slices.
pub fn divide_groups<T: Clone>(list: &[T], g: usize) -> Vec<Vec<T>> {
    if g == 0 {
        return Vec::new();
    }
    let per = list.len().div_ceil(g);
    if per == 0 {
        return Vec::new();
    }
    list.chunks(per).map(<[T]>::to_vec).collect()
}

/// One match for every unordered pair of teams, in input order.
///
/// Match ids are `"<teamA.id>-<teamB.id>"`, scores all zero. Produces
/// `n*(n-1)/2` matches; fewer than two teams produce none.
pub fn generate_round_robin_matches(teams: &[Team]) -> Vec<Match> {
    let mut matches = Vec::new();
    for i in 0..teams.len() {
        for j in (i + 1)..teams.len() {
            matches.push(Match::new(
                format!("{}-{}", teams[i].id, teams[j].id),
                teams[i].clone(),
                teams[j].clone(),
            ));
        }
    }
    matches
}

/// Pair consecutive teams: (0,1), (2,3), ... Match ids are
/// `"ko-<teamA.id>-<teamB.id>"`, scores all zero.
///
/// An odd team at the end is silently dropped; there is no bye mechanism.
pub fn generate_knockout_matches(teams: &[Team]) -> Vec<Match> {
    teams
        .chunks_exact(2)
        .map(|pair| {
            Match::new(
                format!("ko-{}-{}", pair[0].id, pair[1].id),
                pair[0].clone(),
                pair[1].clone(),
            )
        })
        .collect()
}
