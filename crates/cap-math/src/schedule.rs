//! Base-salary amortization and signing-bonus proration.

use crate::round_dollars;
use cap_core::{Player, MAX_CONTRACT_YEARS};
use rust_decimal::Decimal;

/// Longest window a signing bonus may be spread over.
pub const MAX_PRORATION_YEARS: u32 = 5;

/// Back-loaded base-salary weights for contract lengths 2..=7, in tenths of a
/// percent. Rows are normalized by their own sum.
const BASE_WEIGHTS: [&[u32]; 6] = [
    &[488, 512],
    &[317, 333, 350],
    &[232, 244, 256, 268],
    &[182, 191, 200, 209, 218],
    &[148, 156, 164, 172, 180, 180],
    &[126, 132, 138, 144, 150, 153, 157],
];

fn base_weights(length: u32) -> Option<&'static [u32]> {
    match length {
        2..=7 => BASE_WEIGHTS.get((length - 2) as usize).copied(),
        _ => None,
    }
}

/// Per-year base salary for a contract of `length` years.
///
/// Lengths 2..=7 follow the weight table, rounded to whole dollars with the
/// last year absorbing the remainder so the rows sum to `total_salary`.
/// Any other length is split evenly, as is a total too large to weight.
/// `length` is clamped to `[1, MAX_CONTRACT_YEARS]`.
///
/// Example:
/// let s = build_base_schedule(Decimal::new(30_000_000, 0), 3);
/// assert_eq!(s[0], Decimal::new(9_510_000, 0));
pub fn build_base_schedule(total_salary: Decimal, length: u32) -> Vec<Decimal> {
    let length = length.clamp(1, MAX_CONTRACT_YEARS);
    match base_weights(length) {
        Some(weights) => weighted_schedule(total_salary, length, weights),
        None => even_schedule(total_salary, length),
    }
}

pub(crate) fn weighted_schedule(total: Decimal, length: u32, weights: &[u32]) -> Vec<Decimal> {
    let weight_sum: u32 = weights.iter().sum();
    if weights.len() != length as usize || weight_sum == 0 {
        return even_schedule(total, length);
    }
    let denom = Decimal::from(weight_sum);
    let mut rows = Vec::with_capacity(weights.len());
    let mut allocated = Decimal::ZERO;
    for w in &weights[..weights.len() - 1] {
        let Some(share) = total
            .checked_mul(Decimal::from(*w))
            .and_then(|v| v.checked_div(denom))
        else {
            return even_schedule(total, length);
        };
        let amount = round_dollars(share);
        allocated += amount;
        rows.push(amount);
    }
    rows.push(total - allocated);
    rows
}

fn even_schedule(total: Decimal, length: u32) -> Vec<Decimal> {
    let length = length.max(1);
    vec![total / Decimal::from(length); length as usize]
}

/// Bonus amortization window: `years` clamped to `[1, 5]`.
pub fn proration_years(years: u32) -> u32 {
    years.clamp(1, MAX_PRORATION_YEARS)
}

/// Even per-year share of `total_bonus` over the proration window of `years`.
pub fn bonus_per_year(total_bonus: Decimal, years: u32) -> Decimal {
    total_bonus / Decimal::from(proration_years(years))
}

/// Per-year proration of the player's existing signing bonus.
pub fn player_bonus_per_year(player: &Player) -> Decimal {
    bonus_per_year(player.contract_bonus, player.effective_length())
}

/// Base salary of the player's contract in schedule year `index`, if the
/// total salary is known and the index falls inside the contract.
pub(crate) fn scheduled_base(player: &Player, index: u32) -> Option<Decimal> {
    if player.contract_salary <= Decimal::ZERO {
        return None;
    }
    build_base_schedule(player.contract_salary, player.effective_length())
        .get(index as usize)
        .copied()
}
