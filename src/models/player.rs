//! Player data structure.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in matches and lookups).
pub type PlayerId = Uuid;

/// A registered player. Identity is the id; two players may share a name.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub handicap: i32,
}

impl Player {
    /// Create a new player with the given name and no handicap.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            handicap: 0,
        }
    }

    pub fn with_handicap(mut self, handicap: i32) -> Self {
        self.handicap = handicap;
        self
    }
}
