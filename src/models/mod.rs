//! Data structures for padel tournaments: players, teams, matches, standings, tournament state.

mod game;
mod player;
mod roster;
mod standing;
mod team;
mod tournament;

pub use game::{Match, MatchId, MatchRef, Round, Schedule, Score, ScoreEntry, Slot};
pub use player::{Player, PlayerId};
pub use roster::{parse_player_list, Roster};
pub use standing::{ParticipantId, RankingEntry};
pub use team::{Side, Team, TeamId};
pub use tournament::{
    ErrorKind, Format, PlayoffMode, ScoringMode, TeamFormation, Tournament, TournamentConfig,
    TournamentError, TournamentId, MAX_AMERICANO_POINTS,
};
