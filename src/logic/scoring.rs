//! Recording and resetting results, and keeping standings current.

use crate::logic::bracket::{progress_winner, propagate_byes, retract_dependents};
use crate::logic::ranking::compute_ranking;
use crate::models::{
    Format, MatchRef, Score, ScoreEntry, ScoringMode, Tournament, TournamentError,
};

/// Most games either side can take in one set, tie-breaks counted as games.
const MAX_SET_GAMES: u32 = 99;

/// Turn raw input into a [`Score`] for the given mode.
///
/// Sets: `(0, 0)` sets are dropped; at least one and at most `best_of` sets must remain,
/// each with no more than [`MAX_SET_GAMES`] games per side.
/// Americano: one side may be omitted and becomes the complement of the total;
/// if both are given they must sum to the total.
pub fn validate_score(entry: ScoreEntry, mode: ScoringMode) -> Result<Score, TournamentError> {
    match (entry, mode) {
        (ScoreEntry::Sets(sets), ScoringMode::Sets { best_of }) => {
            let sets: Vec<(u32, u32)> =
                sets.into_iter().filter(|&(a, b)| a != 0 || b != 0).collect();
            if sets.is_empty() {
                return Err(TournamentError::MalformedScore("no set has any games".into()));
            }
            if sets.len() > best_of as usize {
                return Err(TournamentError::MalformedScore(format!(
                    "{} sets entered for a best of {}",
                    sets.len(),
                    best_of
                )));
            }
            if let Some(&(a, b)) = sets.iter().find(|&&(a, b)| a.max(b) > MAX_SET_GAMES) {
                return Err(TournamentError::MalformedScore(format!(
                    "{}-{} is more than {} games in a set",
                    a, b, MAX_SET_GAMES
                )));
            }
            Ok(Score::Sets(sets))
        }
        (ScoreEntry::Points { a, b }, ScoringMode::Americano { total_points }) => {
            let over = |p: u32| {
                TournamentError::MalformedScore(format!(
                    "{} points is more than the {} total",
                    p, total_points
                ))
            };
            let (a, b) = match (a, b) {
                (Some(a), Some(b)) => {
                    if a.checked_add(b) != Some(total_points) {
                        return Err(TournamentError::MalformedScore(format!(
                            "{} + {} does not add up to {}",
                            a, b, total_points
                        )));
                    }
                    (a, b)
                }
                (Some(a), None) => (a, total_points.checked_sub(a).ok_or_else(|| over(a))?),
                (None, Some(b)) => (total_points.checked_sub(b).ok_or_else(|| over(b))?, b),
                (None, None) => {
                    return Err(TournamentError::MalformedScore("no points entered".into()));
                }
            };
            Ok(Score::Points(a, b))
        }
        (ScoreEntry::Sets(_), ScoringMode::Americano { .. }) => {
            Err(TournamentError::MalformedScore(
                "expected americano points, got games per set".into(),
            ))
        }
        (ScoreEntry::Points { .. }, ScoringMode::Sets { .. }) => {
            Err(TournamentError::MalformedScore(
                "expected games per set, got americano points".into(),
            ))
        }
    }
}

/// Record a result. In a playoff the winner advances and byes are re-settled before
/// standings are recomputed. Nothing changes if any step fails.
pub fn record_score(
    t: &mut Tournament,
    at: MatchRef,
    entry: ScoreEntry,
) -> Result<(), TournamentError> {
    let m = t.match_at(at)?;
    if m.score.is_some() {
        return Err(TournamentError::ScoreAlreadyRecorded(at));
    }
    if m.side_a.is_none() || m.side_b.is_none() {
        return Err(TournamentError::MatchNotReady(at));
    }
    let score = validate_score(entry, t.config.scoring)?;

    if t.format == Format::Playoff {
        let mut staged = t.schedule.clone();
        if let Some(m) = staged.get_mut(at.round).and_then(|r| r.get_mut(at.index)) {
            m.score = Some(score);
        }
        progress_winner(&mut staged, at)?;
        propagate_byes(&mut staged, !t.bracket_open())?;
        t.schedule = staged;
    } else {
        t.match_at_mut(at)?.score = Some(score);
    }

    refresh_standings(t);
    Ok(())
}

/// Clear a result. In a playoff the advanced winner is removed from later rounds,
/// and any later result that depended on it is cleared as well.
pub fn reset_score(t: &mut Tournament, at: MatchRef) -> Result<(), TournamentError> {
    if t.match_at(at)?.score.is_none() {
        return Ok(());
    }

    if t.format == Format::Playoff {
        let mut staged = t.schedule.clone();
        if let Some(m) = staged.get_mut(at.round).and_then(|r| r.get_mut(at.index)) {
            m.score = None;
        }
        let cleared = retract_dependents(&mut staged, !t.bracket_open())?;
        if cleared > 0 {
            log::info!(
                "Reset of round {} match {} also cleared {} later results",
                at.round + 1,
                at.index + 1,
                cleared
            );
        }
        t.schedule = staged;
    } else {
        t.match_at_mut(at)?.score = None;
    }

    refresh_standings(t);
    Ok(())
}

/// Recompute standings. A failure is logged and leaves `standings` empty until the next mutation.
pub fn refresh_standings(t: &mut Tournament) {
    match compute_ranking(t) {
        Ok(ranking) => t.standings = Some(ranking),
        Err(e) => {
            log::error!("Ranking unavailable for tournament {}: {}", t.id, e);
            t.standings = None;
        }
    }
}
