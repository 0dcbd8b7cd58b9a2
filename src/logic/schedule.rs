//! Format dispatch for schedule generation.

use crate::logic::bracket::{generate_empty_bracket, generate_playoff_bracket};
use crate::logic::rotating::generate_rotating;
use crate::logic::round_robin::generate_round_robin;
use crate::models::{Format, Player, Schedule, Team, TournamentError};
use rand::Rng;

/// What a generator schedules: pre-formed teams or individual players.
#[derive(Clone, Copy, Debug)]
pub enum Participants<'a> {
    Teams(&'a [Team]),
    Players(&'a [Player]),
}

/// Build the initial schedule for `format`.
///
/// - match, fixed: teams → round robin.
/// - rotating: players → rotating-partner schedule.
/// - playoff: teams → seeded bracket; players → empty bracket for manual placement.
/// - free, ladder: nothing up front; matches are added by hand.
pub fn generate_schedule<R: Rng + ?Sized>(
    format: Format,
    participants: Participants<'_>,
    courts: u32,
    rng: &mut R,
) -> Result<Schedule, TournamentError> {
    if courts == 0 {
        return Err(TournamentError::InvalidCourts);
    }
    match (format, participants) {
        (Format::Match | Format::Fixed, Participants::Teams(teams)) => {
            generate_round_robin(teams, courts)
        }
        (Format::Rotating, Participants::Players(players)) => generate_rotating(players, courts),
        (Format::Playoff, Participants::Teams(teams)) => {
            generate_playoff_bracket(teams, courts, rng)
        }
        (Format::Playoff, Participants::Players(players)) => {
            generate_empty_bracket(players.len(), courts)
        }
        (Format::Free | Format::Ladder, _) => Ok(Schedule::new()),
        (format, _) => Err(TournamentError::ParticipantsMismatch(format)),
    }
}
