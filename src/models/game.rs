//! Match (game), Score, Slot and the schedule shape.

use crate::models::team::Side;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// One round: matches played at the same time on different courts.
pub type Round = Vec<Match>;

/// Ordered rounds of a tournament.
pub type Schedule = Vec<Round>;

/// Which side of a match (A is listed first).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    #[default]
    A,
    B,
}

impl Slot {
    /// Slot a feeder match's winner occupies in the next bracket round.
    pub fn for_feeder(match_index: usize) -> Self {
        if match_index % 2 == 0 {
            Slot::A
        } else {
            Slot::B
        }
    }

    pub fn other(self) -> Self {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }
}

/// Position of a match in the schedule: zero-based round and match indices.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct MatchRef {
    pub round: usize,
    pub index: usize,
}

impl MatchRef {
    pub fn new(round: usize, index: usize) -> Self {
        Self { round, index }
    }

    /// The bracket match this one feeds into, and the slot its winner takes there.
    pub fn parent(self) -> (MatchRef, Slot) {
        (
            MatchRef::new(self.round + 1, self.index / 2),
            Slot::for_feeder(self.index),
        )
    }
}

/// A recorded result.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Score {
    /// Games per set, `(games_a, games_b)`, one entry per set played.
    Sets(Vec<(u32, u32)>),
    /// Americano points `(points_a, points_b)`; the two always sum to the configured total.
    Points(u32, u32),
}

impl Score {
    /// Sets won by each side. Points scores count as zero sets.
    pub fn sets_won(&self) -> (u32, u32) {
        match self {
            Score::Sets(sets) => sets.iter().fold((0, 0), |(a, b), &(ga, gb)| {
                if ga > gb {
                    (a + 1, b)
                } else if gb > ga {
                    (a, b + 1)
                } else {
                    (a, b)
                }
            }),
            Score::Points(..) => (0, 0),
        }
    }

    /// Total games (sets scoring) or points (americano) per side. `None` if a total overflows.
    pub fn games(&self) -> Option<(u32, u32)> {
        match self {
            Score::Sets(sets) => sets.iter().try_fold((0u32, 0u32), |(a, b), &(ga, gb)| {
                Some((a.checked_add(ga)?, b.checked_add(gb)?))
            }),
            Score::Points(a, b) => Some((*a, *b)),
        }
    }

    /// More sets won, or more points. `None` on a tie.
    pub fn winner(&self) -> Option<Slot> {
        let (a, b) = match self {
            Score::Sets(_) => self.sets_won(),
            Score::Points(a, b) => (*a, *b),
        };
        match a.cmp(&b) {
            std::cmp::Ordering::Greater => Some(Slot::A),
            std::cmp::Ordering::Less => Some(Slot::B),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Raw score input, validated against the tournament's scoring mode before it becomes a [`Score`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreEntry {
    /// Games per set; `(0, 0)` sets are dropped.
    Sets(Vec<(u32, u32)>),
    /// Americano points for either or both sides; a missing side is the complement of the total.
    Points {
        #[serde(default)]
        a: Option<u32>,
        #[serde(default)]
        b: Option<u32>,
    },
}

/// A single match between two sides. Bracket matches may have empty sides.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    /// 1-based display round.
    pub round: u32,
    /// 1-based court.
    pub court: u32,
    pub side_a: Option<Side>,
    pub side_b: Option<Side>,
    /// None if not yet played.
    pub score: Option<Score>,
}

impl Match {
    pub fn new(round: u32, court: u32, side_a: Option<Side>, side_b: Option<Side>) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            court,
            side_a,
            side_b,
            score: None,
        }
    }

    pub fn side(&self, slot: Slot) -> Option<&Side> {
        match slot {
            Slot::A => self.side_a.as_ref(),
            Slot::B => self.side_b.as_ref(),
        }
    }

    pub fn side_mut(&mut self, slot: Slot) -> &mut Option<Side> {
        match slot {
            Slot::A => &mut self.side_a,
            Slot::B => &mut self.side_b,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.score.is_some()
    }

    /// The winning side, if the match is scored and not tied.
    pub fn winner(&self) -> Option<&Side> {
        let slot = self.score.as_ref()?.winner()?;
        self.side(slot)
    }
}
