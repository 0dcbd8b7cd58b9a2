//! Teams and match sides.

use crate::models::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};

/// Team identifier, minted from the tournament's `next_team_id` counter.
pub type TeamId = u32;

/// A pre-formed team of exactly two distinct players.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub players: [Player; 2],
}

impl Team {
    /// Build a team named after its players ("Ana & Bea").
    pub fn new(id: TeamId, players: [Player; 2]) -> Self {
        let name = pair_name(&players);
        Self { id, name, players }
    }

    /// True if this team consists of exactly these two players, in either order.
    pub fn same_players(&self, a: PlayerId, b: PlayerId) -> bool {
        let [p, q] = &self.players;
        (p.id == a && q.id == b) || (p.id == b && q.id == a)
    }
}

fn pair_name(players: &[Player; 2]) -> String {
    format!("{} & {}", players[0].name, players[1].name)
}

/// One side of a match: either a registered team (fixed, match and playoff formats)
/// or a transient pair of players (rotating, free and ladder formats).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Side {
    Team(Team),
    Pair { players: [Player; 2] },
}

impl Side {
    pub fn pair(a: Player, b: Player) -> Self {
        Side::Pair { players: [a, b] }
    }

    /// Display name for either shape.
    pub fn name(&self) -> String {
        match self {
            Side::Team(team) => team.name.clone(),
            Side::Pair { players } => pair_name(players),
        }
    }

    pub fn players(&self) -> &[Player; 2] {
        match self {
            Side::Team(team) => &team.players,
            Side::Pair { players } => players,
        }
    }

    pub fn team(&self) -> Option<&Team> {
        match self {
            Side::Team(team) => Some(team),
            Side::Pair { .. } => None,
        }
    }
}
