//! Score ledger: applies individual set-score edits to the fixture set.

use crate::models::{SetSlot, Side, Tournament, TournamentError};

/// Replace one side's points in one set of one match.
///
/// The match is located by id across all fixture groups; everything except
/// the targeted cell is left untouched. An unknown id signals
/// [`TournamentError::MatchNotFound`], which callers should treat as a stale
/// snapshot and resynchronize.
///
/// The ledger does not know which groups the current phase ranks, so the
/// caller must re-run the standings calculation afterwards.
pub fn apply_score_edit(
    tournament: &mut Tournament,
    match_id: &str,
    slot: SetSlot,
    side: Side,
    value: u32,
) -> Result<(), TournamentError> {
    let m = tournament
        .find_match_mut(match_id)
        .ok_or_else(|| TournamentError::MatchNotFound(match_id.to_string()))?;
    *m.score.set_mut(slot).side_mut(side) = value;
    Ok(())
}
