//! Manual placement of playoff teams into first-round bracket matches.
//!
//! Players move between `unassigned_players` and `assigned_players`. When the
//! unassigned pool drops below four nobody can fill another match, so empty
//! first-round slots become byes; unassigning reopens them.

use crate::logic::bracket::{propagate_byes, retract_dependents};
use crate::logic::scoring::refresh_standings;
use crate::models::{
    Format, MatchRef, Player, PlayerId, Side, Slot, Team, TeamId, Tournament, TournamentError,
};

/// Form two teams from the unassigned pool and place them in the first-round match at `at`.
pub fn assign_bracket_teams(
    t: &mut Tournament,
    at: MatchRef,
    side_a: &[PlayerId],
    side_b: &[PlayerId],
) -> Result<(Team, Team), TournamentError> {
    check_playoff(t, "assign bracket teams")?;
    if at.round != 0 {
        return Err(TournamentError::NotFirstRound(at));
    }
    let m = t.match_at(at)?;
    if m.side_a.is_some() || m.side_b.is_some() {
        return Err(TournamentError::TeamsAlreadyAssigned(at));
    }
    for (slot, ids) in [(Slot::A, side_a), (Slot::B, side_b)] {
        if ids.len() != 2 {
            return Err(TournamentError::IncompleteTeamSelection {
                slot,
                selected: ids.len(),
            });
        }
    }
    let selected: Vec<PlayerId> = side_a.iter().chain(side_b).copied().collect();
    for (i, id) in selected.iter().enumerate() {
        if selected[..i].contains(id) {
            return Err(if i >= 2 && side_a.contains(id) {
                TournamentError::PlayerOnBothSides(*id)
            } else {
                TournamentError::DuplicatePlayer(*id)
            });
        }
    }

    let mut unassigned = t.unassigned_players.clone();
    let mut assigned = t.assigned_players.clone();
    let mut take = |id: PlayerId| -> Result<Player, TournamentError> {
        let pos = unassigned
            .iter()
            .position(|p| p.id == id)
            .ok_or(TournamentError::PlayerNotFound(id))?;
        let p = unassigned.remove(pos);
        assigned.push(p.clone());
        Ok(p)
    };
    let team_a = Team::new(t.next_team_id, [take(side_a[0])?, take(side_a[1])?]);
    let team_b = Team::new(t.next_team_id + 1, [take(side_b[0])?, take(side_b[1])?]);

    let mut staged = t.schedule.clone();
    if let Some(m) = staged.get_mut(at.round).and_then(|r| r.get_mut(at.index)) {
        m.side_a = Some(Side::Team(team_a.clone()));
        m.side_b = Some(Side::Team(team_b.clone()));
    }
    propagate_byes(&mut staged, unassigned.len() < 4)?;

    t.schedule = staged;
    t.unassigned_players = unassigned;
    t.assigned_players = assigned;
    t.next_team_id += 2;
    t.teams.push(team_a.clone());
    t.teams.push(team_b.clone());
    log::info!(
        "Bracket match {}: {} vs {} ({} players left to place)",
        at.index + 1,
        team_a.name,
        team_b.name,
        t.unassigned_players.len()
    );

    refresh_standings(t);
    Ok((team_a, team_b))
}

/// Take both teams out of the first-round match at `at`; their players return to the pool.
pub fn unassign_bracket_teams(t: &mut Tournament, at: MatchRef) -> Result<(), TournamentError> {
    check_playoff(t, "unassign bracket teams")?;
    if at.round != 0 {
        return Err(TournamentError::NotFirstRound(at));
    }
    let m = t.match_at(at)?;
    let sides: Vec<Side> = m.side_a.iter().chain(m.side_b.iter()).cloned().collect();
    if sides.is_empty() {
        return Ok(());
    }

    let mut unassigned = t.unassigned_players.clone();
    let mut assigned = t.assigned_players.clone();
    for p in sides.iter().flat_map(|s| s.players()) {
        assigned.retain(|a| a.id != p.id);
        if !unassigned.iter().any(|u| u.id == p.id) {
            unassigned.push(p.clone());
        }
    }

    let mut staged = t.schedule.clone();
    if let Some(m) = staged.get_mut(at.round).and_then(|r| r.get_mut(at.index)) {
        m.side_a = None;
        m.side_b = None;
        m.score = None;
    }
    let cleared = retract_dependents(&mut staged, unassigned.len() < 4)?;

    let removed: Vec<TeamId> = sides.iter().filter_map(|s| s.team().map(|team| team.id)).collect();
    t.schedule = staged;
    t.unassigned_players = unassigned;
    t.assigned_players = assigned;
    t.teams.retain(|team| !removed.contains(&team.id));
    log::info!(
        "Bracket match {} cleared with {} later results ({} players left to place)",
        at.index + 1,
        cleared,
        t.unassigned_players.len()
    );

    refresh_standings(t);
    Ok(())
}

fn check_playoff(t: &Tournament, operation: &'static str) -> Result<(), TournamentError> {
    if t.format == Format::Playoff {
        Ok(())
    } else {
        Err(TournamentError::UnsupportedForFormat {
            operation,
            format: t.format,
        })
    }
}
