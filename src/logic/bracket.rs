//! Single-elimination bracket: construction, winner progression and bye propagation.
//!
//! Round 0 holds the placed teams. Every later slot is derived from the match
//! feeding it: the winner of a scored match, the lone side of a bye, or empty.
//! A slot is *vacant* when it can never be filled: an empty first-round slot
//! once the pool of unplaced players is closed, or a later slot whose feeder
//! has two vacant slots. Only a side facing a vacant slot advances on a bye.

use crate::models::{Match, MatchRef, Schedule, Side, Slot, Team, TournamentError};
use rand::seq::SliceRandom;
use rand::Rng;

/// Seeded bracket: teams shuffled into first-round slots, byes spread and propagated.
///
/// With `b = size - teams` byes, the `b` first-round matches that come first in
/// bit-reversed order get a lone team, so byes land in both halves and no
/// first-round match is empty.
pub fn generate_playoff_bracket<R: Rng + ?Sized>(
    teams: &[Team],
    courts: u32,
    rng: &mut R,
) -> Result<Schedule, TournamentError> {
    if courts == 0 {
        return Err(TournamentError::InvalidCourts);
    }
    let mut shuffled: Vec<Team> = teams.to_vec();
    shuffled.shuffle(rng);

    let size = bracket_size(teams.len());
    let mut schedule = empty_rounds(size, courts);
    let Some(first) = schedule.first_mut() else {
        return Ok(schedule);
    };

    let byes = size - teams.len();
    let bits = first.len().trailing_zeros();
    let mut bye_matches = vec![false; first.len()];
    for k in 0..byes {
        bye_matches[reverse_bits(k, bits)] = true;
    }

    let mut placed = shuffled.into_iter();
    for (m, &bye) in first.iter_mut().zip(&bye_matches) {
        m.side_a = placed.next().map(Side::Team);
        m.side_b = if bye { None } else { placed.next().map(Side::Team) };
    }

    let passes = propagate_byes(&mut schedule, true)?;
    log::debug!(
        "Bracket: {} teams, size {}, {} byes, settled in {} passes",
        teams.len(),
        size,
        byes,
        passes
    );
    Ok(schedule)
}

/// Empty bracket sized for `ceil(num_players / 2)` teams; all slots open for manual placement.
pub fn generate_empty_bracket(
    num_players: usize,
    courts: u32,
) -> Result<Schedule, TournamentError> {
    if courts == 0 {
        return Err(TournamentError::InvalidCourts);
    }
    Ok(empty_rounds(bracket_size(num_players.div_ceil(2)), courts))
}

/// Next power of two at or above `teams`.
pub fn bracket_size(teams: usize) -> usize {
    teams.max(1).next_power_of_two()
}

fn empty_rounds(size: usize, courts: u32) -> Schedule {
    let mut schedule = Schedule::new();
    let mut matches = size / 2;
    while matches >= 1 {
        let round_number = schedule.len() as u32 + 1;
        let round = (0..matches)
            .map(|i| Match::new(round_number, (i as u32 % courts) + 1, None, None))
            .collect();
        schedule.push(round);
        matches /= 2;
    }
    schedule
}

fn reverse_bits(k: usize, bits: u32) -> usize {
    (0..bits).fold(0, |acc, b| (acc << 1) | ((k >> b) & 1))
}

/// Write the winner of the scored match at `at` into its slot in the next round.
/// Returns the winner; `None` on a tie, which advances nobody.
pub fn progress_winner(
    schedule: &mut Schedule,
    at: MatchRef,
) -> Result<Option<Side>, TournamentError> {
    let m = schedule
        .get(at.round)
        .and_then(|r| r.get(at.index))
        .ok_or(TournamentError::MatchNotFound(at))?;
    if m.score.is_none() {
        return Err(TournamentError::MatchNotReady(at));
    }
    let winner = m.winner().cloned();
    if winner.is_none() {
        log::warn!(
            "Bracket match {} in round {} is tied; nobody advances",
            at.index + 1,
            at.round + 1
        );
    }
    if at.round + 1 < schedule.len() {
        set_parent_slot(schedule, at, winner.clone())?;
    }
    Ok(winner)
}

fn set_parent_slot(
    schedule: &mut Schedule,
    at: MatchRef,
    value: Option<Side>,
) -> Result<(), TournamentError> {
    let (parent, slot) = at.parent();
    let target = schedule
        .get_mut(parent.round)
        .and_then(|r| r.get_mut(parent.index))
        .ok_or(TournamentError::MatchNotFound(parent))?;
    if *target.side_mut(slot) == value {
        return Ok(());
    }
    if target.score.is_some() {
        return Err(TournamentError::DownstreamMatchCompleted(parent));
    }
    *target.side_mut(slot) = value;
    Ok(())
}

/// Re-derive every later-round slot until nothing changes; returns the number of passes.
///
/// Each pass walks rounds in order, so a pass settles the whole bracket and the
/// next one confirms it: the loop runs at most twice, well inside the
/// `rounds + 1` bound. Idempotent. Fails without partial rollback if a scored
/// match would lose or change a side, so callers stage it on a copy.
pub fn propagate_byes(
    schedule: &mut Schedule,
    first_round_closed: bool,
) -> Result<usize, TournamentError> {
    settle(schedule, first_round_closed, false).map(|(passes, _)| passes)
}

/// Settle the bracket after a result or a placement was taken back.
///
/// A scored later match that loses or changes a side has its score cleared,
/// which in turn retracts whatever it advanced. Returns how many scores were cleared.
pub fn retract_dependents(
    schedule: &mut Schedule,
    first_round_closed: bool,
) -> Result<usize, TournamentError> {
    settle(schedule, first_round_closed, true).map(|(_, cleared)| cleared)
}

fn settle(
    schedule: &mut Schedule,
    first_round_closed: bool,
    clear_scored: bool,
) -> Result<(usize, usize), TournamentError> {
    let mut passes = 0;
    let mut cleared = 0;
    loop {
        passes += 1;
        let mut changed = false;
        let mut dead_feeders: Vec<bool> = Vec::new();

        for r in 0..schedule.len().saturating_sub(1) {
            let (head, tail) = schedule.split_at_mut(r + 1);
            let current = &head[r];
            let next = &mut tail[0];
            let mut dead_here = Vec::with_capacity(current.len());

            for (i, m) in current.iter().enumerate() {
                let vacant = |slot: Slot| {
                    m.side(slot).is_none()
                        && if r == 0 {
                            first_round_closed
                        } else {
                            let feeder = 2 * i + usize::from(slot == Slot::B);
                            dead_feeders.get(feeder).copied().unwrap_or(false)
                        }
                };
                dead_here.push(vacant(Slot::A) && vacant(Slot::B));

                let outcome = if m.score.is_some() {
                    m.winner().cloned()
                } else {
                    match (&m.side_a, &m.side_b) {
                        (Some(a), None) if vacant(Slot::B) => Some(a.clone()),
                        (None, Some(b)) if vacant(Slot::A) => Some(b.clone()),
                        _ => None,
                    }
                };

                let (parent, slot) = MatchRef::new(r, i).parent();
                let target = next
                    .get_mut(parent.index)
                    .ok_or(TournamentError::MatchNotFound(parent))?;
                if *target.side_mut(slot) != outcome {
                    if target.score.is_some() {
                        if !clear_scored {
                            return Err(TournamentError::DownstreamMatchCompleted(parent));
                        }
                        target.score = None;
                        cleared += 1;
                    }
                    *target.side_mut(slot) = outcome;
                    changed = true;
                }
            }
            dead_feeders = dead_here;
        }

        if !changed {
            return Ok((passes, cleared));
        }
    }
}

/// Winner of the final, once it has been played.
pub fn champion(schedule: &Schedule) -> Option<&Side> {
    schedule.last()?.first()?.winner()
}
