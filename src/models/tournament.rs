//! Tournament, its configuration, and the error type.

use crate::models::game::{Match, MatchRef, Schedule, Slot};
use crate::models::player::{Player, PlayerId};
use crate::models::standing::RankingEntry;
use crate::models::team::{Team, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Player count outside the format's range.
    PlayerCount { format: Format, got: usize },
    /// Format needs an even number of players.
    OddPlayerCount { format: Format, got: usize },
    /// Same player listed twice.
    DuplicatePlayer(PlayerId),
    /// Player not registered (or not in the pool the operation draws from).
    PlayerNotFound(PlayerId),
    /// Player names must not be empty.
    EmptyName,
    /// Courts must be at least 1.
    InvalidCourts,
    /// Best-of must be 1, 3 or 5.
    InvalidBestOf(u32),
    /// Americano total must be between 1 and [`MAX_AMERICANO_POINTS`].
    InvalidAmericanoTotal,
    /// A side needs exactly two players.
    IncompleteTeamSelection { slot: Slot, selected: usize },
    /// The same player appears on both sides of a match.
    PlayerOnBothSides(PlayerId),
    /// Teams, players or schedule don't fit what the generator for this format takes.
    ParticipantsMismatch(Format),
    /// No match at this position.
    MatchNotFound(MatchRef),
    /// Match doesn't have both sides yet.
    MatchNotReady(MatchRef),
    /// Bracket match already has teams assigned.
    TeamsAlreadyAssigned(MatchRef),
    /// Teams can only be assigned to first-round bracket matches.
    NotFirstRound(MatchRef),
    /// Match already has a score; reset it first.
    ScoreAlreadyRecorded(MatchRef),
    /// Operation not available for this format.
    UnsupportedForFormat { operation: &'static str, format: Format },
    /// Score shape doesn't fit the scoring mode.
    MalformedScore(String),
    /// A later bracket match that depends on this one already has a score.
    DownstreamMatchCompleted(MatchRef),
    /// A completed match references a player missing from the registry.
    UnknownParticipant(PlayerId),
    /// Not all matches needed for the result have been played.
    IncompleteResults,
}

/// Broad classes of [`TournamentError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad input, rejected before any state change.
    Validation,
    /// Input or state that would break a data-model invariant.
    Invariant,
}

impl TournamentError {
    pub fn kind(&self) -> ErrorKind {
        use TournamentError::*;
        match self {
            MalformedScore(_) | DownstreamMatchCompleted(_) | UnknownParticipant(_) => {
                ErrorKind::Invariant
            }
            _ => ErrorKind::Validation,
        }
    }
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::PlayerCount { format, got } => {
                let (min, max, _) = format.player_rule();
                write!(f, "A {} tournament needs {}-{} players (got {})", format, min, max, got)
            }
            TournamentError::OddPlayerCount { format, got } => {
                write!(f, "A {} tournament needs an even number of players (got {})", format, got)
            }
            TournamentError::DuplicatePlayer(_) => write!(f, "A player was selected twice"),
            TournamentError::PlayerNotFound(_) => write!(f, "Player not found"),
            TournamentError::EmptyName => write!(f, "Player name must not be empty"),
            TournamentError::InvalidCourts => write!(f, "Need at least one court"),
            TournamentError::InvalidBestOf(n) => {
                write!(f, "Best of {} sets is not allowed (use 1, 3 or 5)", n)
            }
            TournamentError::InvalidAmericanoTotal => write!(
                f,
                "Americano points total must be between 1 and {}",
                MAX_AMERICANO_POINTS
            ),
            TournamentError::IncompleteTeamSelection { slot, selected } => {
                write!(f, "Select exactly two players for side {:?} (selected {})", slot, selected)
            }
            TournamentError::PlayerOnBothSides(_) => {
                write!(f, "The same player cannot be on both teams")
            }
            TournamentError::ParticipantsMismatch(format) => {
                write!(f, "Participants don't fit a {} schedule", format)
            }
            TournamentError::MatchNotFound(at) => {
                write!(f, "No match {} in round {}", at.index + 1, at.round + 1)
            }
            TournamentError::MatchNotReady(_) => {
                write!(f, "Both teams must be known before entering a score")
            }
            TournamentError::TeamsAlreadyAssigned(_) => write!(f, "This match already has teams"),
            TournamentError::NotFirstRound(_) => {
                write!(f, "Teams can only be placed in the first round")
            }
            TournamentError::ScoreAlreadyRecorded(_) => {
                write!(f, "Match already has a score; reset it first")
            }
            TournamentError::UnsupportedForFormat { operation, format } => {
                write!(f, "Cannot {} in a {} tournament", operation, format)
            }
            TournamentError::MalformedScore(msg) => write!(f, "Invalid score: {}", msg),
            TournamentError::DownstreamMatchCompleted(at) => write!(
                f,
                "Round {} match {} already has a score that depends on this result",
                at.round + 1,
                at.index + 1
            ),
            TournamentError::UnknownParticipant(_) => {
                write!(f, "A match references an unregistered player")
            }
            TournamentError::IncompleteResults => write!(f, "Not all matches have a result"),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Tournament format.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    /// One official match: two teams of two.
    Match,
    /// Fixed partners, round robin between teams.
    Fixed,
    /// Partners rotate; every player pairs with everyone.
    Rotating,
    /// Matches entered by hand, player ranking.
    Free,
    /// Matches entered by hand, ladder points.
    Ladder,
    /// Single-elimination bracket.
    Playoff,
}

impl Format {
    /// `(min, max, even_only)` player counts accepted at creation.
    pub fn player_rule(self) -> (usize, usize, bool) {
        match self {
            Format::Match => (4, 4, false),
            Format::Fixed => (6, 16, true),
            Format::Rotating => (4, 16, false),
            Format::Free | Format::Ladder => (2, 30, false),
            Format::Playoff => (4, 32, true),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Format::Match => "match",
            Format::Fixed => "fixed partner",
            Format::Rotating => "rotating partner",
            Format::Free => "free",
            Format::Ladder => "ladder",
            Format::Playoff => "playoff",
        };
        f.write_str(name)
    }
}

/// How results are scored.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Games per set, best of `best_of` sets.
    Sets {
        #[serde(default = "default_best_of")]
        best_of: u32,
    },
    /// Points summing to `total_points` per match.
    Americano {
        #[serde(default = "default_americano_points")]
        total_points: u32,
    },
}

impl ScoringMode {
    pub fn is_americano(self) -> bool {
        matches!(self, ScoringMode::Americano { .. })
    }
}

impl Default for ScoringMode {
    fn default() -> Self {
        ScoringMode::Sets {
            best_of: default_best_of(),
        }
    }
}

/// Upper bound on the americano points total of a match.
pub const MAX_AMERICANO_POINTS: u32 = 999;

fn default_best_of() -> u32 {
    3
}

fn default_americano_points() -> u32 {
    24
}

fn default_courts() -> u32 {
    1
}

/// How fixed-format teams are formed from the selected players.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamFormation {
    /// Shuffle, then pair consecutively.
    #[default]
    Random,
    /// Pair consecutively in the given order.
    Manual,
}

/// How playoff teams are formed and placed in the bracket.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayoffMode {
    /// Empty bracket; the organiser assigns teams to first-round matches.
    #[default]
    ManualTeamsManualPlacement,
    /// Teams paired in the given order, placed randomly.
    ManualTeamsRandomPlacement,
    /// Teams formed randomly, placed randomly.
    RandomTeamsRandomPlacement,
}

/// Tournament settings chosen on the configuration page.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    #[serde(default)]
    pub scoring: ScoringMode,
    #[serde(default = "default_courts")]
    pub courts: u32,
    #[serde(default)]
    pub use_handicap: bool,
    #[serde(default)]
    pub team_formation: TeamFormation,
    #[serde(default)]
    pub playoff_mode: PlayoffMode,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringMode::default(),
            courts: default_courts(),
            use_handicap: false,
            team_formation: TeamFormation::default(),
            playoff_mode: PlayoffMode::default(),
        }
    }
}

impl TournamentConfig {
    pub fn americano(total_points: u32) -> Self {
        Self {
            scoring: ScoringMode::Americano { total_points },
            ..Self::default()
        }
    }

    pub fn sets(best_of: u32) -> Self {
        Self {
            scoring: ScoringMode::Sets { best_of },
            ..Self::default()
        }
    }

    pub fn with_courts(mut self, courts: u32) -> Self {
        self.courts = courts;
        self
    }

    pub fn validate(&self) -> Result<(), TournamentError> {
        if self.courts == 0 {
            return Err(TournamentError::InvalidCourts);
        }
        match self.scoring {
            ScoringMode::Sets { best_of } if !matches!(best_of, 1 | 3 | 5) => {
                Err(TournamentError::InvalidBestOf(best_of))
            }
            ScoringMode::Americano { total_points }
                if !(1..=MAX_AMERICANO_POINTS).contains(&total_points) =>
            {
                Err(TournamentError::InvalidAmericanoTotal)
            }
            _ => Ok(()),
        }
    }
}

/// Full tournament state: participants, schedule, scores and standings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub created_at: DateTime<Utc>,
    pub format: Format,
    pub config: TournamentConfig,
    /// Every player taking part.
    pub players: Vec<Player>,
    /// Registered teams (empty for player-ranked formats).
    pub teams: Vec<Team>,
    pub schedule: Schedule,
    /// Playoff: players not yet placed in a first-round match.
    #[serde(default)]
    pub unassigned_players: Vec<Player>,
    /// Playoff: players placed in a first-round match.
    #[serde(default)]
    pub assigned_players: Vec<Player>,
    pub next_team_id: TeamId,
    /// Latest standings; None when ranking failed this cycle.
    #[serde(default)]
    pub standings: Option<Vec<RankingEntry>>,
}

impl Tournament {
    /// Create an empty tournament of the given format.
    /// Schedule and participants are filled in by setup.
    pub fn new(format: Format, config: TournamentConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            format,
            config,
            players: Vec::new(),
            teams: Vec::new(),
            schedule: Vec::new(),
            unassigned_players: Vec::new(),
            assigned_players: Vec::new(),
            next_team_id: 0,
            standings: Some(Vec::new()),
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Mint a new team with the next id. Does not register it.
    pub fn mint_team(&mut self, players: [Player; 2]) -> Team {
        let team = Team::new(self.next_team_id, players);
        self.next_team_id += 1;
        team
    }

    pub fn match_at(&self, at: MatchRef) -> Result<&Match, TournamentError> {
        self.schedule
            .get(at.round)
            .and_then(|round| round.get(at.index))
            .ok_or(TournamentError::MatchNotFound(at))
    }

    pub fn match_at_mut(&mut self, at: MatchRef) -> Result<&mut Match, TournamentError> {
        self.schedule
            .get_mut(at.round)
            .and_then(|round| round.get_mut(at.index))
            .ok_or(TournamentError::MatchNotFound(at))
    }

    /// Position of the match with this id.
    pub fn locate(&self, id: crate::models::MatchId) -> Option<MatchRef> {
        self.schedule.iter().enumerate().find_map(|(r, round)| {
            round
                .iter()
                .position(|m| m.id == id)
                .map(|i| MatchRef::new(r, i))
        })
    }

    /// Playoff: first-round slots can still be filled from the unassigned pool.
    pub fn bracket_open(&self) -> bool {
        self.format == Format::Playoff && self.unassigned_players.len() >= 4
    }

    pub fn all_matches(&self) -> impl Iterator<Item = &Match> {
        self.schedule.iter().flatten()
    }
}
