//! Integration tests for the fixed-partner round robin.

use padel_match_center::logic::{append_leg, generate_round_robin};
use padel_match_center::models::{Player, Schedule, Team, TeamId, TournamentError};
use std::collections::{HashMap, HashSet};

fn teams(n: usize) -> Vec<Team> {
    (0..n)
        .map(|i| {
            Team::new(
                i as TeamId,
                [Player::new(format!("P{}a", i)), Player::new(format!("P{}b", i))],
            )
        })
        .collect()
}

fn team_ids(schedule: &Schedule) -> Vec<(TeamId, TeamId)> {
    schedule
        .iter()
        .flatten()
        .map(|m| {
            let a = m.side_a.as_ref().and_then(|s| s.team()).unwrap().id;
            let b = m.side_b.as_ref().and_then(|s| s.team()).unwrap().id;
            (a.min(b), a.max(b))
        })
        .collect()
}

#[test]
fn every_pair_meets_exactly_once() {
    for n in 2..=9 {
        let schedule = generate_round_robin(&teams(n), 2).unwrap();
        let pairs = team_ids(&schedule);
        assert_eq!(pairs.len(), n * (n - 1) / 2, "{} teams", n);
        let unique: HashSet<_> = pairs.iter().collect();
        assert_eq!(unique.len(), pairs.len(), "{} teams: a pair repeats", n);
        assert!(pairs.iter().all(|(a, b)| a != b));
    }
}

#[test]
fn four_teams_on_one_court() {
    let schedule = generate_round_robin(&teams(4), 1).unwrap();
    // 3 logical rounds of 2 matches, split into single-court rounds
    assert_eq!(schedule.len(), 6);
    assert!(schedule.iter().all(|round| round.len() == 1));

    let mut appearances: HashMap<TeamId, usize> = HashMap::new();
    for (a, b) in team_ids(&schedule) {
        *appearances.entry(a).or_default() += 1;
        *appearances.entry(b).or_default() += 1;
    }
    assert_eq!(appearances.len(), 4);
    assert!(appearances.values().all(|&n| n == 3));
}

#[test]
fn four_teams_on_two_courts() {
    let schedule = generate_round_robin(&teams(4), 2).unwrap();
    assert_eq!(schedule.len(), 3);
    for (r, round) in schedule.iter().enumerate() {
        assert_eq!(round.len(), 2);
        let mut seen = HashSet::new();
        for (court, m) in round.iter().enumerate() {
            assert_eq!(m.round, r as u32 + 1);
            assert_eq!(m.court, court as u32 + 1);
            assert!(seen.insert(m.side_a.as_ref().unwrap().name()));
            assert!(seen.insert(m.side_b.as_ref().unwrap().name()));
        }
    }
}

#[test]
fn odd_count_skips_the_bye() {
    let schedule = generate_round_robin(&teams(5), 3).unwrap();
    assert_eq!(team_ids(&schedule).len(), 10);
    for m in schedule.iter().flatten() {
        assert!(m.side_a.is_some() && m.side_b.is_some());
        assert!(m.court >= 1 && m.court <= 3);
    }
}

#[test]
fn rounds_never_exceed_courts() {
    let schedule = generate_round_robin(&teams(8), 3).unwrap();
    assert!(schedule.iter().all(|round| !round.is_empty() && round.len() <= 3));
    let numbers: Vec<u32> = schedule.iter().map(|round| round[0].round).collect();
    let expected: Vec<u32> = (1..=schedule.len() as u32).collect();
    assert_eq!(numbers, expected);
}

#[test]
fn zero_courts_rejected() {
    assert!(matches!(
        generate_round_robin(&teams(4), 0),
        Err(TournamentError::InvalidCourts)
    ));
}

#[test]
fn second_leg_continues_round_numbers() {
    let teams = teams(4);
    let mut schedule = generate_round_robin(&teams, 2).unwrap();
    let first_leg = schedule.len();
    append_leg(&mut schedule, &teams, 2).unwrap();

    assert_eq!(schedule.len(), 2 * first_leg);
    for (r, round) in schedule.iter().enumerate() {
        assert!(round.iter().all(|m| m.round == r as u32 + 1));
    }
    assert_eq!(team_ids(&schedule).len(), 12);
}
