//! Integration tests for playoff brackets: byes, progression, resets and manual placement.

use padel_match_center::logic::{
    assign_bracket_teams, bracket_size, champion, create_tournament_with_rng, final_classification,
    generate_playoff_bracket, propagate_byes, record_score, reset_score, unassign_bracket_teams,
};
use padel_match_center::models::{
    Format, MatchRef, Player, PlayerId, PlayoffMode, ScoreEntry, Side, Team, TeamId, Tournament,
    TournamentConfig, TournamentError,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn players(n: usize) -> Vec<Player> {
    (0..n).map(|i| Player::new(format!("P{}", i))).collect()
}

fn teams(n: usize) -> Vec<Team> {
    (0..n)
        .map(|i| {
            Team::new(
                i as TeamId,
                [Player::new(format!("T{}a", i)), Player::new(format!("T{}b", i))],
            )
        })
        .collect()
}

fn playoff(n_players: usize, mode: PlayoffMode, seed: u64) -> Tournament {
    let config = TournamentConfig {
        playoff_mode: mode,
        ..TournamentConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(seed);
    create_tournament_with_rng(Format::Playoff, players(n_players), config, &mut rng).unwrap()
}

fn a_wins() -> ScoreEntry {
    ScoreEntry::Sets(vec![(6, 3), (6, 4)])
}

fn ids(t: &Tournament, range: std::ops::Range<usize>) -> Vec<PlayerId> {
    t.unassigned_players[range].iter().map(|p| p.id).collect()
}

#[test]
fn bracket_size_is_next_power_of_two() {
    assert_eq!(bracket_size(2), 2);
    assert_eq!(bracket_size(5), 8);
    assert_eq!(bracket_size(8), 8);
    assert_eq!(bracket_size(9), 16);
}

#[test]
fn five_teams_get_three_byes_into_round_two() {
    let schedule = generate_playoff_bracket(&teams(5), 2, &mut StdRng::seed_from_u64(7)).unwrap();
    assert_eq!(schedule.len(), 3);
    assert_eq!(schedule[0].len(), 4);
    assert_eq!(schedule[1].len(), 2);
    assert_eq!(schedule[2].len(), 1);

    let lone = schedule[0]
        .iter()
        .filter(|m| m.side_a.is_some() != m.side_b.is_some())
        .count();
    assert_eq!(lone, 3);
    assert!(schedule[0].iter().all(|m| m.side_a.is_some() || m.side_b.is_some()));

    let advanced = schedule[1]
        .iter()
        .flat_map(|m| [&m.side_a, &m.side_b])
        .filter(|s| s.is_some())
        .count();
    assert_eq!(advanced, 3);
    assert!(schedule.iter().flatten().all(|m| m.score.is_none()));
    assert!(schedule[2][0].side_a.is_none() && schedule[2][0].side_b.is_none());
}

#[test]
fn full_bracket_has_no_byes() {
    let schedule = generate_playoff_bracket(&teams(8), 4, &mut StdRng::seed_from_u64(1)).unwrap();
    assert!(schedule[0].iter().all(|m| m.side_a.is_some() && m.side_b.is_some()));
    assert!(schedule[1].iter().all(|m| m.side_a.is_none() && m.side_b.is_none()));
}

#[test]
fn propagation_is_idempotent_and_bounded() {
    for n in 2..=16 {
        let mut rng = StdRng::seed_from_u64(n as u64);
        let mut schedule = generate_playoff_bracket(&teams(n), 2, &mut rng).unwrap();
        let settled = schedule.clone();
        let passes = propagate_byes(&mut schedule, true).unwrap();
        assert_eq!(passes, 1, "{} teams", n);
        assert_eq!(schedule, settled);
        assert!(passes <= schedule.len() + 1);
    }
}

#[test]
fn winner_advances_and_reset_undoes_it() {
    let mut t = playoff(10, PlayoffMode::ManualTeamsRandomPlacement, 3);
    assert_eq!(t.teams.len(), 5);
    let full = t.schedule[0]
        .iter()
        .position(|m| m.side_a.is_some() && m.side_b.is_some())
        .unwrap();
    let at = MatchRef::new(0, full);
    let before = t.schedule.clone();

    record_score(&mut t, at, a_wins()).unwrap();
    let winner = t.schedule[0][full].side_a.clone();
    let (parent, slot) = at.parent();
    assert_eq!(t.match_at(parent).unwrap().side(slot).cloned(), winner);

    reset_score(&mut t, at).unwrap();
    assert_eq!(t.schedule, before);
}

#[test]
fn reset_clears_results_that_depended_on_it() {
    let mut t = playoff(10, PlayoffMode::ManualTeamsRandomPlacement, 3);
    let full = t.schedule[0]
        .iter()
        .position(|m| m.side_a.is_some() && m.side_b.is_some())
        .unwrap();
    let at = MatchRef::new(0, full);
    record_score(&mut t, at, a_wins()).unwrap();
    let (parent, slot) = at.parent();
    record_score(&mut t, parent, a_wins()).unwrap();
    let (final_at, final_slot) = parent.parent();
    assert!(t.match_at(final_at).unwrap().side(final_slot).is_some());

    reset_score(&mut t, at).unwrap();
    assert!(t.match_at(at).unwrap().score.is_none());
    let next = t.match_at(parent).unwrap();
    assert!(next.score.is_none());
    assert!(next.side(slot).is_none());
    assert!(next.side(slot.other()).is_some());
    assert!(t.match_at(final_at).unwrap().side(final_slot).is_none());
}

#[test]
fn retraction_follows_byes_down_to_the_final() {
    let mut t = playoff(12, PlayoffMode::ManualTeamsManualPlacement, 1);
    for index in 0..3 {
        let pool = ids(&t, 0..4);
        assign_bracket_teams(&mut t, MatchRef::new(0, index), &pool[..2], &pool[2..]).unwrap();
    }
    for at in [MatchRef::new(0, 0), MatchRef::new(0, 1), MatchRef::new(1, 0), MatchRef::new(0, 2)] {
        record_score(&mut t, at, a_wins()).unwrap();
    }
    let final_at = MatchRef::new(2, 0);
    record_score(&mut t, final_at, a_wins()).unwrap();
    assert!(champion(&t.schedule).is_some());

    // match 2's winner reached the final on a bye
    reset_score(&mut t, MatchRef::new(0, 2)).unwrap();
    let final_match = t.match_at(final_at).unwrap();
    assert!(final_match.score.is_none());
    assert!(final_match.side_b.is_none());
    assert!(final_match.side_a.is_some());
    assert!(t.schedule[1][1].side_a.is_none());
    assert!(t.schedule[1][0].score.is_some());

    unassign_bracket_teams(&mut t, MatchRef::new(0, 0)).unwrap();
    assert!(t.bracket_open());
    assert!(t.schedule[1][0].score.is_none());
    assert!(t.schedule[1][0].side_a.is_none());
    assert!(t.schedule[2][0].side_a.is_none());
    assert!(t.schedule[0][1].score.is_some());
}

#[test]
fn score_needs_both_sides() {
    let mut t = playoff(10, PlayoffMode::ManualTeamsRandomPlacement, 3);
    let final_at = MatchRef::new(2, 0);
    assert!(matches!(
        record_score(&mut t, final_at, a_wins()),
        Err(TournamentError::MatchNotReady(_))
    ));
}

#[test]
fn tied_bracket_match_advances_nobody() {
    let mut t = playoff(8, PlayoffMode::ManualTeamsRandomPlacement, 5);
    let at = MatchRef::new(0, 0);
    record_score(&mut t, at, ScoreEntry::Sets(vec![(6, 4), (4, 6)])).unwrap();
    assert!(t.match_at(at).unwrap().score.is_some());
    assert!(t.match_at(MatchRef::new(1, 0)).unwrap().side_a.is_none());
}

#[test]
fn played_through_to_a_champion() {
    let mut t = playoff(8, PlayoffMode::RandomTeamsRandomPlacement, 11);
    assert!(matches!(final_classification(&t), Err(TournamentError::IncompleteResults)));

    for round in 0..t.schedule.len() {
        for index in 0..t.schedule[round].len() {
            record_score(&mut t, MatchRef::new(round, index), a_wins()).unwrap();
        }
    }
    let winner = champion(&t.schedule).unwrap().name();
    let final_match = &t.schedule[1][0];
    assert_eq!(final_match.side_a.as_ref().unwrap().name(), winner);

    let classification = final_classification(&t).unwrap();
    assert_eq!(classification.podium, vec![winner, final_match.side_b.as_ref().unwrap().name()]);
    assert!(t.standings.as_ref().unwrap().is_empty());
}

#[test]
fn manual_placement_fills_pool_then_byes() {
    let mut t = playoff(12, PlayoffMode::ManualTeamsManualPlacement, 1);
    assert_eq!(t.schedule.len(), 3);
    assert_eq!(t.unassigned_players.len(), 12);
    assert!(t.bracket_open());

    for index in 0..3 {
        let pool = ids(&t, 0..4);
        assign_bracket_teams(&mut t, MatchRef::new(0, index), &pool[..2], &pool[2..]).unwrap();
    }
    assert!(t.unassigned_players.is_empty());
    assert_eq!(t.assigned_players.len(), 12);
    assert_eq!(t.teams.len(), 6);
    assert_eq!(t.next_team_id, 6);
    assert!(!t.bracket_open());

    // Match 3 stays empty: the winner of match 2 gets a bye through round 2.
    record_score(&mut t, MatchRef::new(0, 2), a_wins()).unwrap();
    let winner = t.schedule[0][2].side_a.clone();
    assert_eq!(t.schedule[1][1].side_a, winner);
    assert!(t.schedule[1][1].side_b.is_none());
    assert_eq!(t.schedule[2][0].side_b, winner);

    reset_score(&mut t, MatchRef::new(0, 2)).unwrap();
    assert!(t.schedule[1][1].side_a.is_none());
    assert!(t.schedule[2][0].side_b.is_none());
}

#[test]
fn unassign_returns_players_and_reopens_pool() {
    let mut t = playoff(8, PlayoffMode::ManualTeamsManualPlacement, 1);
    let pool = ids(&t, 0..4);
    let (a, b) = assign_bracket_teams(&mut t, MatchRef::new(0, 0), &pool[..2], &pool[2..]).unwrap();
    assert_eq!(t.unassigned_players.len(), 4);
    assert!(t.teams.iter().any(|team| team.id == a.id));

    unassign_bracket_teams(&mut t, MatchRef::new(0, 0)).unwrap();
    assert_eq!(t.unassigned_players.len(), 8);
    assert!(t.assigned_players.is_empty());
    assert!(t.teams.iter().all(|team| team.id != a.id && team.id != b.id));
    assert!(t.schedule[0][0].side_a.is_none());
}

#[test]
fn assignment_errors_leave_state_unchanged() {
    let mut t = playoff(8, PlayoffMode::ManualTeamsManualPlacement, 1);
    let pool = ids(&t, 0..4);
    let stranger = Player::new("Stranger").id;

    assert!(matches!(
        assign_bracket_teams(&mut t, MatchRef::new(1, 0), &pool[..2], &pool[2..]),
        Err(TournamentError::NotFirstRound(_))
    ));
    assert!(matches!(
        assign_bracket_teams(&mut t, MatchRef::new(0, 0), &pool[..1], &pool[2..]),
        Err(TournamentError::IncompleteTeamSelection { selected: 1, .. })
    ));
    assert!(matches!(
        assign_bracket_teams(&mut t, MatchRef::new(0, 0), &[pool[0], stranger], &pool[2..]),
        Err(TournamentError::PlayerNotFound(id)) if id == stranger
    ));
    assert!(matches!(
        assign_bracket_teams(&mut t, MatchRef::new(0, 0), &pool[..2], &[pool[1], pool[2]]),
        Err(TournamentError::PlayerOnBothSides(_))
    ));
    assert_eq!(t.unassigned_players.len(), 8);
    assert!(t.teams.is_empty());
    assert_eq!(t.next_team_id, 0);

    assign_bracket_teams(&mut t, MatchRef::new(0, 0), &pool[..2], &pool[2..]).unwrap();
    let more = ids(&t, 0..4);
    assert!(matches!(
        assign_bracket_teams(&mut t, MatchRef::new(0, 0), &more[..2], &more[2..]),
        Err(TournamentError::TeamsAlreadyAssigned(_))
    ));
}

#[test]
fn seeded_bracket_sides_are_teams() {
    let t = playoff(6, PlayoffMode::ManualTeamsRandomPlacement, 2);
    assert_eq!(t.teams.len(), 3);
    assert!(t
        .all_matches()
        .flat_map(|m| [&m.side_a, &m.side_b])
        .flatten()
        .all(|side| matches!(side, Side::Team(_))));
}
