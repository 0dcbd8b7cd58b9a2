//! Standings computed from completed matches.
//!
//! Three engines, picked by format: per team (match, fixed), per player
//! (rotating, free) and ladder. Every registered participant gets a row, even
//! before their first match. Each sort ends on name, then participant id, so
//! the order is total.

use crate::models::{
    Format, ParticipantId, RankingEntry, Score, ScoringMode, Slot, Tournament, TournamentError,
};
use std::cmp::Ordering;
use std::collections::HashMap;

/// What one side got out of one completed match.
#[derive(Clone, Copy, Debug, Default)]
struct SideResult {
    won: bool,
    lost: bool,
    sets_won: u32,
    sets_lost: u32,
    games_won: u32,
    games_lost: u32,
    /// Americano only: 2 for a win, 1 for a tie.
    bonus: u32,
}

#[derive(Clone, Copy, PartialEq)]
enum Engine {
    Team,
    Player,
    Ladder,
}

/// Compute standings for the tournament's format. Playoffs have no running standings.
pub fn compute_ranking(t: &Tournament) -> Result<Vec<RankingEntry>, TournamentError> {
    let engine = match t.format {
        Format::Playoff => return Ok(Vec::new()),
        Format::Match | Format::Fixed => Engine::Team,
        Format::Rotating | Format::Free => Engine::Player,
        Format::Ladder => Engine::Ladder,
    };
    let mode = t.config.scoring;

    let mut entries: Vec<RankingEntry> = match engine {
        Engine::Team => t
            .teams
            .iter()
            .map(|team| RankingEntry::new(ParticipantId::Team(team.id), team.name.clone()))
            .collect(),
        Engine::Player | Engine::Ladder => t
            .players
            .iter()
            .map(|p| RankingEntry::new(ParticipantId::Player(p.id), p.name.clone()))
            .collect(),
    };
    let mut index: HashMap<ParticipantId, usize> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (e.participant, i))
        .collect();

    for m in t.all_matches() {
        let Some(score) = &m.score else { continue };
        let results = side_results(score, mode)?;
        for (slot, result) in [(Slot::A, results[0]), (Slot::B, results[1])] {
            let Some(side) = m.side(slot) else {
                return Err(TournamentError::MalformedScore(format!(
                    "scored match {} has no side {:?}",
                    m.id, slot
                )));
            };
            match engine {
                Engine::Team => {
                    let team = side.team().ok_or(TournamentError::ParticipantsMismatch(t.format))?;
                    let key = ParticipantId::Team(team.id);
                    let i = *index.entry(key).or_insert_with(|| {
                        entries.push(RankingEntry::new(key, team.name.clone()));
                        entries.len() - 1
                    });
                    credit(&mut entries[i], result, mode, engine)?;
                }
                Engine::Player | Engine::Ladder => {
                    for p in side.players() {
                        let i = *index
                            .get(&ParticipantId::Player(p.id))
                            .ok_or(TournamentError::UnknownParticipant(p.id))?;
                        credit(&mut entries[i], result, mode, engine)?;
                    }
                }
            }
        }
    }

    for e in &mut entries {
        e.avg_points = if e.matches > 0 {
            f64::from(e.total_points) / f64::from(e.matches)
        } else {
            0.0
        };
    }

    entries.sort_by(|a, b| order(a, b, mode, engine));
    Ok(entries)
}

fn side_results(score: &Score, mode: ScoringMode) -> Result<[SideResult; 2], TournamentError> {
    match (score, mode) {
        (Score::Sets(_), ScoringMode::Sets { .. })
        | (Score::Points(..), ScoringMode::Americano { .. }) => {}
        (Score::Sets(_), ScoringMode::Americano { .. }) => {
            return Err(TournamentError::MalformedScore(
                "set score stored in an americano tournament".into(),
            ))
        }
        (Score::Points(..), ScoringMode::Sets { .. }) => {
            return Err(TournamentError::MalformedScore(
                "americano score stored in a sets tournament".into(),
            ))
        }
    }

    let (sets_a, sets_b) = score.sets_won();
    let (games_a, games_b) = score
        .games()
        .ok_or_else(|| TournamentError::MalformedScore("game totals overflow".into()))?;
    let winner = score.winner();
    let bonus = |slot: Slot| match (mode, winner) {
        (ScoringMode::Sets { .. }, _) => 0,
        (_, None) => 1,
        (_, Some(w)) if w == slot => 2,
        _ => 0,
    };

    let a = SideResult {
        won: winner == Some(Slot::A),
        lost: winner == Some(Slot::B),
        sets_won: sets_a,
        sets_lost: sets_b,
        games_won: games_a,
        games_lost: games_b,
        bonus: bonus(Slot::A),
    };
    let b = SideResult {
        won: a.lost,
        lost: a.won,
        sets_won: sets_b,
        sets_lost: sets_a,
        games_won: games_b,
        games_lost: games_a,
        bonus: bonus(Slot::B),
    };
    Ok([a, b])
}

fn credit(
    e: &mut RankingEntry,
    r: SideResult,
    mode: ScoringMode,
    engine: Engine,
) -> Result<(), TournamentError> {
    e.matches = add(e.matches, 1)?;
    e.wins = add(e.wins, u32::from(r.won))?;
    e.sets_won = add(e.sets_won, r.sets_won)?;
    e.sets_lost = add(e.sets_lost, r.sets_lost)?;
    e.games_won = add(e.games_won, r.games_won)?;
    e.games_lost = add(e.games_lost, r.games_lost)?;
    if mode.is_americano() {
        // games_won holds the raw points for americano scores; losses are not counted
        let earned = add(r.games_won, r.bonus)?;
        e.total_points = add(e.total_points, earned)?;
        if engine == Engine::Ladder {
            e.points = add(e.points, earned)?;
        }
    } else {
        e.losses = add(e.losses, u32::from(r.lost))?;
        e.points = add(e.points, u32::from(r.won))?;
    }
    Ok(())
}

fn add(total: u32, n: u32) -> Result<u32, TournamentError> {
    total
        .checked_add(n)
        .ok_or_else(|| TournamentError::MalformedScore("standings totals overflow".into()))
}

fn order(a: &RankingEntry, b: &RankingEntry, mode: ScoringMode, engine: Engine) -> Ordering {
    let primary = match (engine, mode.is_americano()) {
        (Engine::Ladder, _) => b.points.cmp(&a.points).then(b.wins.cmp(&a.wins)),
        (_, true) => b.wins.cmp(&a.wins).then(b.avg_points.total_cmp(&a.avg_points)),
        (Engine::Team, false) => b
            .wins
            .cmp(&a.wins)
            .then(b.set_diff().cmp(&a.set_diff()))
            .then(b.game_diff().cmp(&a.game_diff())),
        (Engine::Player, false) => b
            .points
            .cmp(&a.points)
            .then(b.game_diff().cmp(&a.game_diff()))
            .then(b.games_won.cmp(&a.games_won)),
    };
    primary
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.participant.cmp(&b.participant))
}

