//! Rookie reserve estimates from draft-pick counts.

use crate::round_dollars;
use rust_decimal::Decimal;

pub const DRAFT_ROUNDS: u32 = 7;
pub const PICKS_PER_ROUND: u32 = 32;
/// Slot used when only the number of picks in a round is known.
pub const MID_ROUND_SLOT: u32 = 16;

/// Year-1 cap hit for the first and last pick of each round, in dollars.
const ROUND_SLOT_RANGES: [(i64, i64); DRAFT_ROUNDS as usize] = [
    (9_000_000, 2_250_000),
    (2_000_000, 1_450_000),
    (1_350_000, 1_100_000),
    (1_080_000, 960_000),
    (950_000, 880_000),
    (870_000, 720_000),
    (700_000, 650_000),
];

/// Estimated year-1 cap hit for `pick` (1-32) in `round` (1-7), linearly
/// interpolated across the round. Unknown rounds estimate to zero.
///
/// Example:
/// assert_eq!(estimate_rookie_year1_for_slot(1, 1), Decimal::new(9_000_000, 0));
pub fn estimate_rookie_year1_for_slot(round: u32, pick: u32) -> Decimal {
    let Some(&(start, end)) = round
        .checked_sub(1)
        .and_then(|r| ROUND_SLOT_RANGES.get(r as usize))
    else {
        return Decimal::ZERO;
    };
    let pick = pick.clamp(1, PICKS_PER_ROUND);
    let start = Decimal::from(start);
    let end = Decimal::from(end);
    let t = Decimal::from(pick - 1) / Decimal::from(PICKS_PER_ROUND - 1);
    round_dollars(start + (end - start) * t)
}

/// Reserve for a draft class given pick counts per round (`round_counts[0]`
/// is round 1). Each pick is costed at the mid-round slot.
pub fn estimate_rookie_reserve_for_picks(round_counts: &[u32]) -> Decimal {
    round_counts
        .iter()
        .take(DRAFT_ROUNDS as usize)
        .enumerate()
        .map(|(i, &count)| {
            estimate_rookie_year1_for_slot(i as u32 + 1, MID_ROUND_SLOT) * Decimal::from(count)
        })
        .sum()
}
