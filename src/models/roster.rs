//! Roster: players registered for the session before a tournament is created.

use crate::models::player::{Player, PlayerId};
use crate::models::tournament::TournamentError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Registered players, in registration order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub players: Vec<Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a player. Names are trimmed and may repeat; identity is the id.
    pub fn add_player(&mut self, name: impl Into<String>) -> Result<PlayerId, TournamentError> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::EmptyName);
        }
        let player = Player::new(name);
        let id = player.id;
        self.players.push(player);
        Ok(id)
    }

    pub fn remove_player(&mut self, id: PlayerId) -> Result<(), TournamentError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or(TournamentError::PlayerNotFound(id))?;
        self.players.remove(idx);
        Ok(())
    }

    pub fn set_handicap(&mut self, id: PlayerId, handicap: i32) -> Result<(), TournamentError> {
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(TournamentError::PlayerNotFound(id))?;
        player.handicap = handicap;
        Ok(())
    }

    /// Import a pasted list ("1. Ana, 2. Bea\nCarla"). Names already present
    /// (case-insensitive) are skipped. Returns how many players were added.
    pub fn import_list(&mut self, text: &str) -> usize {
        let mut known: HashSet<String> =
            self.players.iter().map(|p| p.name.to_lowercase()).collect();
        let mut added = 0;
        for name in parse_player_list(text) {
            if known.insert(name.to_lowercase()) {
                self.players.push(Player::new(name));
                added += 1;
            }
        }
        added
    }

    /// Resolve ids into players, in the order given.
    pub fn select(&self, ids: &[PlayerId]) -> Result<Vec<Player>, TournamentError> {
        ids.iter()
            .map(|&id| {
                self.players
                    .iter()
                    .find(|p| p.id == id)
                    .cloned()
                    .ok_or(TournamentError::PlayerNotFound(id))
            })
            .collect()
    }
}

/// Split on commas and newlines, strip bullet numbering ("1.", "2)", "3-", "4:"), drop blanks.
pub fn parse_player_list(text: &str) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let mut names = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Skipping unreadable line in player list: {}", e);
                continue;
            }
        };
        for field in record.iter() {
            let name = strip_numbering(field);
            if !name.is_empty() {
                names.push(name.to_string());
            }
        }
    }
    names
}

fn strip_numbering(field: &str) -> &str {
    let rest = field.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == field.len() {
        return field.trim();
    }
    let rest = rest.trim_start();
    let rest = rest
        .strip_prefix(|c: char| matches!(c, '.' | ')' | '-' | ':'))
        .unwrap_or(rest);
    rest.trim()
}
