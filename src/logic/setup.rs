//! Setup: create a tournament from selected players and configuration.

use crate::logic::round_robin::append_leg;
use crate::logic::schedule::{generate_schedule, Participants};
use crate::logic::scoring::refresh_standings;
use crate::models::{
    Format, Player, PlayoffMode, TeamFormation, Team, Tournament, TournamentConfig, TournamentError,
};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Create a tournament, checking player count and config first. Uses the thread rng for shuffles.
pub fn create_tournament(
    format: Format,
    players: Vec<Player>,
    config: TournamentConfig,
) -> Result<Tournament, TournamentError> {
    create_tournament_with_rng(format, players, config, &mut rand::thread_rng())
}

/// [`create_tournament`] with a caller-supplied rng.
pub fn create_tournament_with_rng<R: Rng + ?Sized>(
    format: Format,
    mut players: Vec<Player>,
    config: TournamentConfig,
    rng: &mut R,
) -> Result<Tournament, TournamentError> {
    config.validate()?;
    check_player_count(format, players.len())?;
    let mut seen = HashSet::new();
    for p in &players {
        if p.name.trim().is_empty() {
            return Err(TournamentError::EmptyName);
        }
        if !seen.insert(p.id) {
            return Err(TournamentError::DuplicatePlayer(p.id));
        }
    }
    if !config.use_handicap {
        for p in &mut players {
            p.handicap = 0;
        }
    }

    let courts = config.courts;
    let mut t = Tournament::new(format, config);
    t.players = players.clone();

    match format {
        Format::Match | Format::Fixed => {
            if format == Format::Fixed && config.team_formation == TeamFormation::Random {
                players.shuffle(rng);
            }
            t.teams = pair_up(&mut t, &players);
            t.schedule = generate_schedule(format, Participants::Teams(&t.teams), courts, rng)?;
        }
        Format::Rotating => {
            players.shuffle(rng);
            t.schedule = generate_schedule(format, Participants::Players(&players), courts, rng)?;
        }
        Format::Free | Format::Ladder => {}
        Format::Playoff => match config.playoff_mode {
            PlayoffMode::ManualTeamsManualPlacement => {
                t.schedule =
                    generate_schedule(format, Participants::Players(&players), courts, rng)?;
                t.unassigned_players = players;
            }
            PlayoffMode::ManualTeamsRandomPlacement | PlayoffMode::RandomTeamsRandomPlacement => {
                if config.playoff_mode == PlayoffMode::RandomTeamsRandomPlacement {
                    players.shuffle(rng);
                }
                t.teams = pair_up(&mut t, &players);
                t.assigned_players = players;
                t.schedule = generate_schedule(format, Participants::Teams(&t.teams), courts, rng)?;
            }
        },
    }

    refresh_standings(&mut t);
    log::info!(
        "Created {} tournament: {} players, {} teams, {} rounds, {} court(s)",
        t.format,
        t.players.len(),
        t.teams.len(),
        t.schedule.len(),
        courts
    );
    Ok(t)
}

/// Check the player count against the format's range and parity.
pub fn check_player_count(format: Format, count: usize) -> Result<(), TournamentError> {
    let (min, max, even) = format.player_rule();
    if count < min || count > max {
        return Err(TournamentError::PlayerCount { format, got: count });
    }
    if even && count % 2 != 0 {
        return Err(TournamentError::OddPlayerCount { format, got: count });
    }
    Ok(())
}

/// Consecutive players become teams: (0, 1), (2, 3), ...
fn pair_up(t: &mut Tournament, players: &[Player]) -> Vec<Team> {
    players
        .chunks_exact(2)
        .map(|pair| t.mint_team([pair[0].clone(), pair[1].clone()]))
        .collect()
}

/// Fixed format: append a second round robin between the same teams, after the current schedule.
pub fn add_second_round(t: &mut Tournament) -> Result<(), TournamentError> {
    if t.format != Format::Fixed {
        return Err(TournamentError::UnsupportedForFormat {
            operation: "add a second round",
            format: t.format,
        });
    }
    append_leg(&mut t.schedule, &t.teams, t.config.courts)?;
    refresh_standings(t);
    log::info!("Second round added: schedule now has {} rounds", t.schedule.len());
    Ok(())
}
