//! Manual match entry and deletion for non-bracket formats.

use crate::logic::scoring::refresh_standings;
use crate::models::{
    Format, Match, MatchRef, Player, PlayerId, Side, Slot, Team, Tournament, TournamentError,
};

/// Add a match between two hand-picked pairs, appended as its own round on court 1.
///
/// Match and fixed formats play as registered teams: an existing team with the
/// same two players is reused, otherwise a new team is registered. Other
/// formats store the players as a plain pair.
pub fn add_match(
    t: &mut Tournament,
    side_a: &[PlayerId],
    side_b: &[PlayerId],
) -> Result<MatchRef, TournamentError> {
    if t.format == Format::Playoff {
        return Err(TournamentError::UnsupportedForFormat {
            operation: "add a match",
            format: t.format,
        });
    }
    let [a1, a2] = pick_side(t, Slot::A, side_a)?;
    let [b1, b2] = pick_side(t, Slot::B, side_b)?;
    for p in [&b1, &b2] {
        if p.id == a1.id || p.id == a2.id {
            return Err(TournamentError::PlayerOnBothSides(p.id));
        }
    }

    let (side_a, side_b) = match t.format {
        Format::Match | Format::Fixed => {
            let a = team_for(t, [a1, a2]);
            let b = team_for(t, [b1, b2]);
            (Side::Team(a), Side::Team(b))
        }
        _ => (Side::pair(a1, a2), Side::pair(b1, b2)),
    };

    let round_number = t.schedule.len() as u32 + 1;
    log::info!("Match added: {} vs {} (round {})", side_a.name(), side_b.name(), round_number);
    t.schedule
        .push(vec![Match::new(round_number, 1, Some(side_a), Some(side_b))]);
    let at = MatchRef::new(t.schedule.len() - 1, 0);

    refresh_standings(t);
    Ok(at)
}

/// Check one side's selection: exactly two distinct registered players.
fn pick_side(t: &Tournament, slot: Slot, ids: &[PlayerId]) -> Result<[Player; 2], TournamentError> {
    let &[p, q] = ids else {
        return Err(TournamentError::IncompleteTeamSelection {
            slot,
            selected: ids.len(),
        });
    };
    if p == q {
        return Err(TournamentError::DuplicatePlayer(p));
    }
    let find = |id: PlayerId| t.player(id).cloned().ok_or(TournamentError::PlayerNotFound(id));
    Ok([find(p)?, find(q)?])
}

/// Registered team with exactly these players, or a newly registered one.
fn team_for(t: &mut Tournament, players: [Player; 2]) -> Team {
    if let Some(team) = t
        .teams
        .iter()
        .find(|team| team.same_players(players[0].id, players[1].id))
    {
        return team.clone();
    }
    let team = t.mint_team(players);
    t.teams.push(team.clone());
    team
}

/// Delete a match. A round left empty is removed; later round numbers are kept as they are.
pub fn delete_match(t: &mut Tournament, at: MatchRef) -> Result<Match, TournamentError> {
    if t.format == Format::Playoff {
        return Err(TournamentError::UnsupportedForFormat {
            operation: "delete a match",
            format: t.format,
        });
    }
    t.match_at(at)?;
    let removed = t.schedule[at.round].remove(at.index);
    if t.schedule[at.round].is_empty() {
        t.schedule.remove(at.round);
    }
    log::info!(
        "Match deleted: round {}, {}",
        removed.round,
        if removed.is_completed() { "with score" } else { "unplayed" }
    );

    refresh_standings(t);
    Ok(removed)
}
