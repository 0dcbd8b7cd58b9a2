//! Final classification shown when a tournament is finished.

use crate::logic::bracket::champion;
use crate::logic::ranking::compute_ranking;
use crate::models::{Format, Slot, Tournament, TournamentError};
use serde::{Deserialize, Serialize};

/// Podium names in finishing order, then everyone else.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct FinalClassification {
    pub podium: Vec<String>,
    pub others: Vec<String>,
}

/// Build the final classification.
///
/// Playoff: champion then runner-up; the final must be scored and not tied.
/// Match format: winner then loser. Other formats: top three of the ranking.
pub fn final_classification(t: &Tournament) -> Result<FinalClassification, TournamentError> {
    if t.format == Format::Playoff {
        let final_match = t
            .schedule
            .last()
            .and_then(|r| r.first())
            .ok_or(TournamentError::IncompleteResults)?;
        let winner = champion(&t.schedule).ok_or(TournamentError::IncompleteResults)?;
        let runner_up = final_match
            .score
            .as_ref()
            .and_then(|s| s.winner())
            .and_then(|slot: Slot| final_match.side(slot.other()))
            .ok_or(TournamentError::IncompleteResults)?;
        return Ok(FinalClassification {
            podium: vec![winner.name(), runner_up.name()],
            others: Vec::new(),
        });
    }

    let podium_size = if t.format == Format::Match { 2 } else { 3 };
    let mut names = compute_ranking(t)?.into_iter().map(|e| e.name);
    let podium: Vec<String> = names.by_ref().take(podium_size).collect();
    Ok(FinalClassification {
        podium,
        others: names.collect(),
    })
}
