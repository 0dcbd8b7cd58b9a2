//! Ranking rows.

use crate::models::player::PlayerId;
use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Who a ranking row belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum ParticipantId {
    Team(TeamId),
    Player(PlayerId),
}

impl PartialOrd for ParticipantId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Teams sort before players; within a kind, by id.
impl Ord for ParticipantId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (ParticipantId::Team(a), ParticipantId::Team(b)) => a.cmp(b),
            (ParticipantId::Player(a), ParticipantId::Player(b)) => a.cmp(b),
            (ParticipantId::Team(_), ParticipantId::Player(_)) => Ordering::Less,
            (ParticipantId::Player(_), ParticipantId::Team(_)) => Ordering::Greater,
        }
    }
}

/// Aggregated results for one team or player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub participant: ParticipantId,
    pub name: String,
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub games_won: u32,
    pub games_lost: u32,
    /// Americano: raw points plus win/tie bonus.
    pub total_points: u32,
    /// Sets scoring: match points (1 per match won). Ladder: ladder points.
    pub points: u32,
    /// `total_points / matches`, 0 before the first match.
    pub avg_points: f64,
}

impl RankingEntry {
    pub fn new(participant: ParticipantId, name: impl Into<String>) -> Self {
        Self {
            participant,
            name: name.into(),
            matches: 0,
            wins: 0,
            losses: 0,
            sets_won: 0,
            sets_lost: 0,
            games_won: 0,
            games_lost: 0,
            total_points: 0,
            points: 0,
            avg_points: 0.0,
        }
    }

    pub fn set_diff(&self) -> i64 {
        i64::from(self.sets_won) - i64::from(self.sets_lost)
    }

    pub fn game_diff(&self) -> i64 {
        i64::from(self.games_won) - i64::from(self.games_lost)
    }
}
