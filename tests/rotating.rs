//! Integration tests for rotating-partner schedules.

use padel_match_center::logic::generate_rotating;
use padel_match_center::models::{Player, PlayerId, Schedule};
use std::collections::HashSet;

fn players(n: usize) -> Vec<Player> {
    (0..n).map(|i| Player::new(format!("P{}", i))).collect()
}

fn partner_pairs(schedule: &Schedule) -> Vec<(PlayerId, PlayerId)> {
    schedule
        .iter()
        .flatten()
        .flat_map(|m| [m.side_a.as_ref().unwrap(), m.side_b.as_ref().unwrap()])
        .map(|side| {
            let [p, q] = side.players();
            (p.id.min(q.id), p.id.max(q.id))
        })
        .collect()
}

fn assert_rounds_disjoint(schedule: &Schedule) {
    for round in schedule {
        let mut seen = HashSet::new();
        for m in round {
            for side in [m.side_a.as_ref().unwrap(), m.side_b.as_ref().unwrap()] {
                for p in side.players() {
                    assert!(seen.insert(p.id), "player {} twice in round {}", p.name, m.round);
                }
            }
        }
    }
}

#[test]
fn balanced_every_player_partners_everyone_once() {
    for (n, courts) in [(4, 1), (8, 2), (12, 2), (16, 4)] {
        let schedule = generate_rotating(&players(n), courts).unwrap();
        let pairs = partner_pairs(&schedule);
        assert_eq!(pairs.len(), n * (n - 1) / 2, "{} players", n);
        let unique: HashSet<_> = pairs.iter().collect();
        assert_eq!(unique.len(), pairs.len(), "{} players: partners repeat", n);
    }
}

#[test]
fn balanced_rounds_use_available_courts() {
    let schedule = generate_rotating(&players(8), 2).unwrap();
    assert_eq!(schedule.len(), 7);
    assert!(schedule.iter().all(|round| round.len() == 2));
    assert_rounds_disjoint(&schedule);

    let single = generate_rotating(&players(8), 1).unwrap();
    assert_eq!(single.len(), 14);
}

#[test]
fn fallback_terminates_with_valid_rounds() {
    for n in [5, 6, 7, 9, 10, 11, 13, 14, 15] {
        let schedule = generate_rotating(&players(n), 2).unwrap();
        assert!(!schedule.is_empty(), "{} players", n);
        assert_rounds_disjoint(&schedule);

        let pairs = partner_pairs(&schedule);
        let unique: HashSet<_> = pairs.iter().collect();
        assert_eq!(unique.len(), pairs.len(), "{} players: partners repeat", n);
        assert!(pairs.len() <= n * (n - 1) / 2);

        let per_round = (n / 4).min(2);
        assert!(schedule.iter().all(|round| round.len() <= per_round));
    }
}

#[test]
fn fallback_rotates_the_resting_player() {
    let ps = players(5);
    let schedule = generate_rotating(&ps, 1).unwrap();
    assert_eq!(schedule.len(), 5);
    assert_eq!(partner_pairs(&schedule).len(), 10);

    let resting: Vec<PlayerId> = schedule
        .iter()
        .map(|round| {
            let playing: HashSet<PlayerId> = round
                .iter()
                .flat_map(|m| [m.side_a.as_ref().unwrap(), m.side_b.as_ref().unwrap()])
                .flat_map(|side| side.players().iter().map(|p| p.id))
                .collect();
            let idle: Vec<PlayerId> =
                ps.iter().map(|p| p.id).filter(|id| !playing.contains(id)).collect();
            assert_eq!(idle.len(), 1);
            idle[0]
        })
        .collect();
    for pair in resting.windows(2) {
        assert_ne!(pair[0], pair[1], "a player rested twice in a row");
    }
    let distinct: HashSet<_> = resting.iter().collect();
    assert_eq!(distinct.len(), 5);
}

#[test]
fn fallback_courts_and_round_numbers() {
    let schedule = generate_rotating(&players(10), 2).unwrap();
    for (r, round) in schedule.iter().enumerate() {
        for (i, m) in round.iter().enumerate() {
            assert_eq!(m.round, r as u32 + 1);
            assert_eq!(m.court, i as u32 + 1);
        }
    }
}

#[test]
fn too_few_players_gives_empty_schedule() {
    assert!(generate_rotating(&players(3), 1).unwrap().is_empty());
}
