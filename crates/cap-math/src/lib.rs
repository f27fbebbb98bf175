#![deny(warnings)]

//! Cap math: pure salary-cap computations over a team baseline, a roster and
//! a list of scenario moves.
//!
//! This crate provides:
//! - Base-salary amortization schedules and bonus proration windows
//! - One simulator per move kind (release, quick trade, trade-in, extension,
//!   conversion, signing)
//! - The current-year cap summary and the multi-year projection
//! - Year-context previews of a contract N seasons out
//! - Rookie reserve estimates from draft-pick counts
//!
//! Every function is deterministic and never fails: degenerate input is
//! clamped, and divisors are always at least one.

pub mod context;
pub mod moves;
pub mod projection;
pub mod rookie;
pub mod schedule;
pub mod summary;

pub use context::{contextualize_player, YearContext};
pub use moves::{
    simulate_conversion, simulate_extension, simulate_release, simulate_signing,
    simulate_trade_in, simulate_trade_quick, split_dead_money, ConversionPreview, ConversionTerms,
    DeadMoneySplit, ExtensionPreview, ExtensionTerms, ReleasePreview, SigningOffer,
    SigningPreview, TradeInPreview,
};
pub use projection::{
    cap_room_for_year, derive_conversion_increments, derive_dead_money_schedule,
    project_player_cap_hits, project_team_caps,
};
pub use rookie::{estimate_rookie_reserve_for_picks, estimate_rookie_year1_for_slot};
pub use schedule::{build_base_schedule, player_bonus_per_year, proration_years};
pub use summary::calc_cap_summary;

use rust_decimal::{Decimal, RoundingStrategy};

/// Round to whole dollars, halves away from zero.
pub(crate) fn round_dollars(v: Decimal) -> Decimal {
    v.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
