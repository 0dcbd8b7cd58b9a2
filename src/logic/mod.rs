//! Tournament engine: schedule generators, bracket progression, scoring, ranking.

mod bracket;
mod classification;
mod matches;
mod ranking;
mod rotating;
mod round_robin;
mod schedule;
mod scoring;
mod setup;
mod team_selection;

pub use bracket::{
    bracket_size, champion, generate_empty_bracket, generate_playoff_bracket, progress_winner,
    propagate_byes, retract_dependents,
};
pub use classification::{final_classification, FinalClassification};
pub use matches::{add_match, delete_match};
pub use ranking::compute_ranking;
pub use rotating::generate_rotating;
pub use round_robin::{append_leg, generate_round_robin};
pub use schedule::{generate_schedule, Participants};
pub use scoring::{record_score, refresh_standings, reset_score, validate_score};
pub use setup::{
    add_second_round, check_player_count, create_tournament, create_tournament_with_rng,
};
pub use team_selection::{assign_bracket_teams, unassign_bracket_teams};
