//! Double-elimination bracket topology: winners bracket, losers bracket, grand final, and every
//! winner-advance / loser-drop edge between them.
//!
//! Generation is pure: the same (tournament, group) always yields the same ids and edges, so a
//! failed write can be retried by generating again.

use crate::logic::bracket_size::BracketSize;
use crate::logic::match_id::generate_match_id;
use crate::models::{Bracket, BracketError, BracketMatch};
use std::collections::HashMap;

/// Generate the 63-match bracket for a 32-team group.
///
/// Order is winners bracket, then losers bracket, then the two grand-final matches.
pub fn generate_double_elimination(tournament_id: &str, group_id: &str) -> Vec<BracketMatch> {
    generate_bracket(BracketSize::default(), tournament_id, group_id)
}

/// Generate a full bracket for any supported size (`2N - 1` matches).
pub fn generate_bracket(size: BracketSize, tournament_id: &str, group_id: &str) -> Vec<BracketMatch> {
    let mut winners = create_rounds(tournament_id, group_id, Bracket::Winners, &size.winners_round_sizes());
    let mut losers = create_rounds(tournament_id, group_id, Bracket::Losers, &size.losers_round_sizes());

    link_loser_paths(size, &mut winners, &losers);

    let grand_final = create_grand_final(tournament_id, group_id, size.winners_rounds() + 1);
    let gf1_id = grand_final[0].id.clone();

    // Both bracket finals meet in the first grand-final match.
    for final_round in [winners.last_mut(), losers.last_mut()].into_iter().flatten() {
        for m in final_round.iter_mut() {
            m.next_match_winner_id = Some(gf1_id.clone());
        }
    }

    let mut matches = Vec::with_capacity(size.match_count());
    matches.extend(winners.into_iter().flatten());
    matches.extend(losers.into_iter().flatten());
    matches.extend(grand_final);
    matches
}

/// Slot in a round of width `to` fed by `slot` of a round of width `from`.
/// Identity when the widths match, halving when `from` is twice as wide.
fn feed_slot(slot: u32, from: u32, to: u32) -> u32 {
    slot * to / from
}

/// Create every round of one bracket with its intra-bracket winner edges.
/// The last round is left without a winner edge.
fn create_rounds(
    tournament_id: &str,
    group_id: &str,
    bracket: Bracket,
    round_sizes: &[u32],
) -> Vec<Vec<BracketMatch>> {
    round_sizes
        .iter()
        .enumerate()
        .map(|(idx, &width)| {
            let round = idx as u32 + 1;
            let next_width = round_sizes.get(idx + 1).copied();
            (0..width)
                .map(|slot| {
                    let id = generate_match_id(tournament_id, bracket, round, slot);
                    let mut m = BracketMatch::new(id, tournament_id, group_id, bracket, round, slot);
                    m.next_match_winner_id = next_width.map(|next| {
                        generate_match_id(tournament_id, bracket, round + 1, feed_slot(slot, width, next))
                    });
                    m
                })
                .collect()
        })
        .collect()
}

/// Point every winners match's loser edge at the losers intake round for its round.
fn link_loser_paths(size: BracketSize, winners: &mut [Vec<BracketMatch>], losers: &[Vec<BracketMatch>]) {
    for (idx, round) in winners.iter_mut().enumerate() {
        let intake = size.losers_intake_round(idx as u32 + 1) as usize;
        let Some(target) = losers.get(intake - 1) else {
            continue;
        };
        let (from, to) = (round.len() as u32, target.len() as u32);
        for m in round.iter_mut() {
            let slot = feed_slot(m.match_number_in_round, from, to) as usize;
            m.next_match_loser_id = Some(target[slot].id.clone());
        }
    }
}

/// Grand final and bracket reset, numbered after the winners final.
fn create_grand_final(tournament_id: &str, group_id: &str, first_round: u32) -> Vec<BracketMatch> {
    let reset_round = first_round + 1;
    let mut grand_final = BracketMatch::new(
        generate_match_id(tournament_id, Bracket::Winners, first_round, 0),
        tournament_id,
        group_id,
        Bracket::Winners,
        first_round,
        0,
    );
    grand_final.is_grand_final = true;

    let mut reset = BracketMatch::new(
        generate_match_id(tournament_id, Bracket::Winners, reset_round, 0),
        tournament_id,
        group_id,
        Bracket::Winners,
        reset_round,
        0,
    );
    reset.is_grand_final = true;
    reset.is_bracket_reset = true;

    grand_final.next_match_winner_id = Some(reset.id.clone());
    vec![grand_final, reset]
}

fn invalid(msg: impl Into<String>) -> BracketError {
    BracketError::PreconditionFailed(msg.into())
}

/// Check a generated bracket before it is persisted.
///
/// Verifies the match count, id uniqueness, that every edge lands inside the set, that loser
/// edges drop into the losers bracket, and that every match is fed by exactly two entrants
/// (first-round winners matches are seeded; the bracket reset is fed by the grand final alone).
pub fn verify_bracket(matches: &[BracketMatch], size: BracketSize) -> Result<(), BracketError> {
    let expected = size.match_count();
    if matches.len() != expected {
        return Err(invalid(format!("expected {} matches, generated {}", expected, matches.len())));
    }

    let by_id: HashMap<&str, &BracketMatch> = matches.iter().map(|m| (m.id.as_str(), m)).collect();
    if by_id.len() != matches.len() {
        return Err(invalid("match ids are not unique"));
    }

    let grand_finals: Vec<&BracketMatch> = matches.iter().filter(|m| m.is_grand_final).collect();
    let (gf1, gf2) = match grand_finals.as_slice() {
        [a, b] if !a.is_bracket_reset && b.is_bracket_reset => (*a, *b),
        _ => return Err(invalid("expected one grand final followed by one bracket reset")),
    };
    if gf1.next_match_winner_id.as_deref() != Some(gf2.id.as_str()) {
        return Err(invalid("grand final does not advance into the bracket reset"));
    }
    if gf2.next_match_winner_id.is_some() || gf2.next_match_loser_id.is_some() {
        return Err(invalid("bracket reset must be terminal"));
    }

    let mut incoming: HashMap<&str, usize> = HashMap::new();
    for m in matches {
        if let Some(next) = m.next_match_winner_id.as_deref() {
            if !by_id.contains_key(next) {
                return Err(invalid(format!("{} advances into unknown match {}", m.id, next)));
            }
            *incoming.entry(next).or_default() += 1;
        } else if !m.is_bracket_reset {
            return Err(invalid(format!("{} has no winner edge", m.id)));
        }

        match (m.bracket, m.is_grand_final, m.next_match_loser_id.as_deref()) {
            (Bracket::Winners, false, Some(next)) => match by_id.get(next) {
                Some(target) if target.bracket == Bracket::Losers => {
                    *incoming.entry(next).or_default() += 1;
                }
                _ => return Err(invalid(format!("{} drops its loser outside the losers bracket", m.id))),
            },
            (Bracket::Winners, false, None) => {
                return Err(invalid(format!("{} has no loser edge", m.id)));
            }
            (_, _, Some(_)) => {
                return Err(invalid(format!("{} must not have a loser edge", m.id)));
            }
            _ => {}
        }
    }

    let winners_final = size.winners_rounds();
    let losers_final = size.losers_round_sizes().len() as u32;
    for m in matches {
        let is_bracket_final = !m.is_grand_final
            && match m.bracket {
                Bracket::Winners => m.round_number == winners_final,
                Bracket::Losers => m.round_number == losers_final,
            };
        if is_bracket_final && m.next_match_winner_id.as_deref() != Some(gf1.id.as_str()) {
            return Err(invalid(format!("{} does not advance into the grand final", m.id)));
        }

        let fed = incoming.get(m.id.as_str()).copied().unwrap_or(0);
        let expected_entrants = if m.is_bracket_reset {
            1
        } else if m.bracket == Bracket::Winners && !m.is_grand_final && m.round_number == 1 {
            0
        } else {
            2
        };
        if fed != expected_entrants {
            return Err(invalid(format!(
                "{} is fed by {} matches, expected {}",
                m.id, fed, expected_entrants
            )));
        }
    }

    Ok(())
}
