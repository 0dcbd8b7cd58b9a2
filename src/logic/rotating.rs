//! Rotating-partner schedules: every player partners every other player.
//!
//! Player counts divisible by 4 get an exact schedule from the circle method.
//! Other counts use a greedy heuristic that favours players who have rested
//! longest and played least. The heuristic is not optimal: it may stop with
//! some pairs unscheduled when no player-disjoint second pair is left, and the
//! leftover pairs are dropped rather than forced into smaller matches.

use crate::models::{Match, Player, PlayerId, Schedule, Side, TournamentError};
use std::collections::{HashMap, HashSet};

/// Generate a rotating-partner schedule for `players` on `courts` courts.
pub fn generate_rotating(players: &[Player], courts: u32) -> Result<Schedule, TournamentError> {
    if courts == 0 {
        return Err(TournamentError::InvalidCourts);
    }
    if players.len() < 4 {
        return Ok(Schedule::new());
    }
    let schedule = if players.len() % 4 == 0 {
        balanced(players, courts)
    } else {
        greedy(players, courts)
    };
    log::debug!(
        "Rotating schedule: {} players, {} courts -> {} rounds",
        players.len(),
        courts,
        schedule.len()
    );
    Ok(schedule)
}

/// Circle-method pairings, two pairs per match, regrouped into rounds of `min(courts, n/4)`.
fn balanced(players: &[Player], courts: u32) -> Schedule {
    let n = players.len();
    let mut rotation: Vec<&Player> = players.iter().collect();
    let mut matches: Vec<(Side, Side)> = Vec::with_capacity(n * (n - 1) / 4);

    for _ in 0..n - 1 {
        let pairs: Vec<Side> = (0..n / 2)
            .map(|i| Side::pair(rotation[i].clone(), rotation[n - 1 - i].clone()))
            .collect();
        let mut pairs = pairs.into_iter();
        while let (Some(a), Some(b)) = (pairs.next(), pairs.next()) {
            matches.push((a, b));
        }
        if let Some(last) = rotation.pop() {
            rotation.insert(1, last);
        }
    }

    let per_round = (courts as usize).min(n / 4);
    let mut schedule = Schedule::new();
    let mut matches = matches.into_iter().peekable();
    while matches.peek().is_some() {
        let round_number = schedule.len() as u32 + 1;
        let round = matches
            .by_ref()
            .take(per_round)
            .zip(1..)
            .map(|((a, b), court)| Match::new(round_number, court, Some(a), Some(b)))
            .collect();
        schedule.push(round);
    }
    schedule
}

#[derive(Clone, Copy, Default)]
struct RestStats {
    matches_played: u32,
    consecutive_rest: u32,
}

struct Candidate<'a> {
    p1: &'a Player,
    p2: &'a Player,
    scheduled: bool,
}

impl Candidate<'_> {
    fn shares_player(&self, other: &Candidate<'_>) -> bool {
        let ids = [self.p1.id, self.p2.id];
        ids.contains(&other.p1.id) || ids.contains(&other.p2.id)
    }

    /// Priority scaled by 10 to stay in integers: `10 * rest - played`.
    fn priority(&self, stats: &HashMap<PlayerId, RestStats>) -> i64 {
        let s1 = stats.get(&self.p1.id).copied().unwrap_or_default();
        let s2 = stats.get(&self.p2.id).copied().unwrap_or_default();
        10 * i64::from(s1.consecutive_rest + s2.consecutive_rest)
            - i64::from(s1.matches_played + s2.matches_played)
    }
}

/// Greedy fallback for player counts not divisible by 4.
fn greedy(players: &[Player], courts: u32) -> Schedule {
    let p = players.len();
    let mut candidates: Vec<Candidate<'_>> = Vec::with_capacity(p * (p - 1) / 2);
    for i in 0..p {
        for j in i + 1..p {
            candidates.push(Candidate {
                p1: &players[i],
                p2: &players[j],
                scheduled: false,
            });
        }
    }
    let mut stats: HashMap<PlayerId, RestStats> =
        players.iter().map(|pl| (pl.id, RestStats::default())).collect();
    let per_round = (p / 4).min(courts as usize).max(1);
    let mut schedule = Schedule::new();

    while candidates.iter().any(|c| !c.scheduled) {
        let mut used: HashSet<PlayerId> = HashSet::new();
        let mut round: Vec<Match> = Vec::new();
        let round_number = schedule.len() as u32 + 1;

        while round.len() < per_round {
            let mut open: Vec<usize> = (0..candidates.len())
                .filter(|&k| {
                    let c = &candidates[k];
                    !c.scheduled && !used.contains(&c.p1.id) && !used.contains(&c.p2.id)
                })
                .collect();
            if open.len() < 2 {
                break;
            }
            // Stable: equal priorities keep enumeration order.
            open.sort_by_key(|&k| std::cmp::Reverse(candidates[k].priority(&stats)));
            let first = open[0];
            let Some(second) = open[1..]
                .iter()
                .copied()
                .find(|&k| !candidates[k].shares_player(&candidates[first]))
            else {
                break;
            };

            for k in [first, second] {
                let c = &mut candidates[k];
                c.scheduled = true;
                used.insert(c.p1.id);
                used.insert(c.p2.id);
            }
            let court = (round.len() as u32 % courts) + 1;
            let side = |k: usize| Side::pair(candidates[k].p1.clone(), candidates[k].p2.clone());
            round.push(Match::new(round_number, court, Some(side(first)), Some(side(second))));
        }

        if round.is_empty() {
            let left = candidates.iter().filter(|c| !c.scheduled).count();
            log::warn!(
                "Rotating schedule for {} players stopped with {} partner pairs unscheduled",
                p,
                left
            );
            break;
        }
        for pl in players {
            let st = stats.entry(pl.id).or_default();
            if used.contains(&pl.id) {
                st.matches_played += 1;
                st.consecutive_rest = 0;
            } else {
                st.consecutive_rest += 1;
            }
        }
        schedule.push(round);
    }
    schedule
}
