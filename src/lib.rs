//! Padel match center: library with models and the scheduling/ranking engine.

pub mod logic;
pub mod models;

pub use logic::{
    add_match, add_second_round, assign_bracket_teams, compute_ranking, create_tournament,
    create_tournament_with_rng, delete_match, final_classification, generate_schedule,
    record_score, reset_score, unassign_bracket_teams, FinalClassification, Participants,
};
pub use models::{
    Format, Match, MatchId, MatchRef, Player, PlayerId, RankingEntry, Roster, Schedule, Score,
    ScoreEntry, ScoringMode, Side, Team, Tournament, TournamentConfig, TournamentError,
    TournamentId,
};
