//! Fixed-partner round robin (circle method), split into court-sized rounds.

use crate::models::{Match, Schedule, Side, Team, TournamentError};

/// Generate a round robin where every team meets every other team once.
///
/// 1. Odd team count: add a bye placeholder (its pairings are skipped).
/// 2. Circle method: keep index 0 fixed, rotate the rest; `n - 1` logical rounds,
///    pairing position `m` with `n - 1 - m`.
/// 3. Each logical round is split into output rounds of at most `courts` matches,
///    numbered sequentially, courts `1..=courts`.
pub fn generate_round_robin(teams: &[Team], courts: u32) -> Result<Schedule, TournamentError> {
    if courts == 0 {
        return Err(TournamentError::InvalidCourts);
    }
    let mut slots: Vec<Option<&Team>> = teams.iter().map(Some).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }
    let n = slots.len();
    let mut schedule = Schedule::new();
    if n < 2 {
        return Ok(schedule);
    }

    let mut indices: Vec<usize> = (0..n).collect();
    for _ in 0..n - 1 {
        let pairings: Vec<(&Team, &Team)> = (0..n / 2)
            .filter_map(|m| match (slots[indices[m]], slots[indices[n - 1 - m]]) {
                (Some(a), Some(b)) => Some((a, b)),
                _ => None,
            })
            .collect();

        for chunk in pairings.chunks(courts as usize) {
            let round_number = schedule.len() as u32 + 1;
            let round = chunk
                .iter()
                .zip(1..)
                .map(|(&(a, b), court)| {
                    Match::new(
                        round_number,
                        court,
                        Some(Side::Team(a.clone())),
                        Some(Side::Team(b.clone())),
                    )
                })
                .collect();
            schedule.push(round);
        }

        if let Some(last) = indices.pop() {
            indices.insert(1, last);
        }
    }

    log::debug!(
        "Round robin: {} teams, {} courts -> {} rounds",
        teams.len(),
        courts,
        schedule.len()
    );
    Ok(schedule)
}

/// Append another full round robin after `schedule`, continuing its round numbers.
pub fn append_leg(
    schedule: &mut Schedule,
    teams: &[Team],
    courts: u32,
) -> Result<(), TournamentError> {
    let offset = schedule.len() as u32;
    let mut leg = generate_round_robin(teams, courts)?;
    for m in leg.iter_mut().flatten() {
        m.round += offset;
    }
    schedule.append(&mut leg);
    Ok(())
}
