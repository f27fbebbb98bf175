//! Year-context previews: how a contract reads N seasons from now.

use crate::moves::split_dead_money;
use crate::projection::project_player_cap_hits;
use crate::schedule::{bonus_per_year, proration_years, scheduled_base};
use cap_core::{Player, Team};
use rust_decimal::Decimal;
use tracing::trace;

/// A player's contract fields re-expressed at a future year offset.
#[derive(Clone, Debug, PartialEq)]
pub struct YearContext {
    pub year_offset: u32,
    /// League year of the preview, when the team baseline carries one.
    pub season: Option<i32>,
    /// Copy of the player with years left, free-agency, cap hit and release
    /// fields moved to the offset.
    pub player: Player,
    pub bonus_per_year: Decimal,
    pub remaining_proration: u32,
    pub penalty_current_year: Decimal,
    pub penalty_next_year: Decimal,
    pub approx_base: Decimal,
}

/// Per-year bonus proration, inferred from today's release penalty when the
/// total bonus is missing. The penalty is taken to be the unamortized bonus
/// still to be charged over the rest of the proration window.
fn effective_bonus_per_year(player: &Player) -> Decimal {
    let length = player.effective_length();
    if player.contract_bonus > Decimal::ZERO {
        return bonus_per_year(player.contract_bonus, length);
    }
    let window = proration_years(length);
    let remaining_today = window.saturating_sub(player.years_elapsed());
    if remaining_today == 0 || player.cap_release_penalty <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let inferred_total =
        player.cap_release_penalty / Decimal::from(remaining_today) * Decimal::from(window);
    bonus_per_year(inferred_total, length)
}

/// Preview `player` as the contract would read `offset` seasons from now.
///
/// Nothing is mutated. At or past the end of the contract the player reads as
/// a free agent with zero cap hit, penalty and savings.
pub fn contextualize_player(player: &Player, team: &Team, offset: u32) -> YearContext {
    let length = player.effective_length();
    let years_left = player.effective_years_left().saturating_sub(offset);
    let is_free_agent = player.is_free_agent || years_left == 0;

    let cap_hit = if is_free_agent {
        Decimal::ZERO
    } else {
        project_player_cap_hits(player, offset as usize + 1)
            .get(offset as usize)
            .copied()
            .unwrap_or(Decimal::ZERO)
    };

    let years_elapsed = length - years_left;
    let remaining_proration = proration_years(length).saturating_sub(years_elapsed);
    let per_year = effective_bonus_per_year(player);

    let (penalty_total, split, approx_base, net_savings) = if is_free_agent {
        (
            Decimal::ZERO,
            split_dead_money(Decimal::ZERO, 0),
            Decimal::ZERO,
            Decimal::ZERO,
        )
    } else {
        let penalty_total = per_year * Decimal::from(remaining_proration);
        let split = split_dead_money(penalty_total, years_left);
        let current_proration = if remaining_proration > 0 {
            per_year
        } else {
            Decimal::ZERO
        };
        let approx_base = scheduled_base(player, years_elapsed)
            .unwrap_or_else(|| (cap_hit - current_proration).max(Decimal::ZERO));
        let net_savings = approx_base - split.current_year;
        (penalty_total, split, approx_base, net_savings)
    };

    let mut ctx = player.clone();
    ctx.contract_years_left = years_left;
    ctx.is_free_agent = is_free_agent;
    ctx.cap_hit = cap_hit;
    ctx.cap_release_penalty = penalty_total;
    ctx.cap_release_net_savings = net_savings;

    trace!(player = %player.id, offset, years_left, %cap_hit, %penalty_total, "contextualized player");
    YearContext {
        year_offset: offset,
        season: team
            .calendar_year
            .and_then(|y| i32::try_from(offset).ok().and_then(|o| y.checked_add(o))),
        player: ctx,
        bonus_per_year: per_year,
        remaining_proration,
        penalty_current_year: split.current_year,
        penalty_next_year: split.next_year,
        approx_base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{free_agent, m, team, veteran};
    use crate::moves::simulate_release;

    #[test]
    fn offset_zero_matches_today() {
        let p = veteran("a");
        let ctx = contextualize_player(&p, &team(), 0);
        assert_eq!(ctx.player.cap_hit, p.cap_hit);
        assert_eq!(ctx.player.contract_years_left, 3);
        assert_eq!(ctx.season, Some(2026));
        // 3 proration years left at 5M
        assert_eq!(ctx.player.cap_release_penalty, m(15));
        assert_eq!(ctx.penalty_next_year, m(6));
        assert_eq!(ctx.approx_base, Decimal::new(14_640_000, 0));
        assert_eq!(ctx.player.cap_release_net_savings, Decimal::new(5_640_000, 0));
    }

    #[test]
    fn one_year_out() {
        let ctx = contextualize_player(&veteran("a"), &team(), 1);
        assert_eq!(ctx.season, Some(2027));
        assert_eq!(ctx.player.contract_years_left, 2);
        assert!(!ctx.player.is_free_agent);
        assert_eq!(ctx.player.cap_hit, Decimal::new(20_360_000, 0));
        assert_eq!(ctx.remaining_proration, 2);
        assert_eq!(ctx.player.cap_release_penalty, m(10));
        assert_eq!(ctx.penalty_current_year, m(6));
        assert_eq!(ctx.approx_base, Decimal::new(15_360_000, 0));

        // the previewed record feeds straight back into the release simulator
        let release = simulate_release(&team(), &ctx.player);
        assert_eq!(release.penalty_next_year, m(4));
    }

    #[test]
    fn past_contract_is_free_agent() {
        let p = veteran("a");
        for offset in [3, 4, 10] {
            let ctx = contextualize_player(&p, &team(), offset);
            assert!(ctx.player.is_free_agent);
            assert_eq!(ctx.player.cap_hit, Decimal::ZERO);
            assert_eq!(ctx.player.cap_release_penalty, Decimal::ZERO);
            assert_eq!(ctx.player.cap_release_net_savings, Decimal::ZERO);
        }
        let fa = contextualize_player(&free_agent("fa"), &team(), 0);
        assert!(fa.player.is_free_agent);
        assert_eq!(fa.player.cap_hit, Decimal::ZERO);
    }

    #[test]
    fn season_out_of_range_is_none() {
        let ctx = contextualize_player(&veteran("a"), &team(), u32::MAX);
        assert_eq!(ctx.season, None);
        assert!(ctx.player.is_free_agent);
        let mut late = team();
        late.calendar_year = Some(i32::MAX);
        assert_eq!(contextualize_player(&veteran("a"), &late, 1).season, None);
        assert_eq!(contextualize_player(&veteran("a"), &late, 0).season, Some(i32::MAX));
    }

    #[test]
    fn bonus_inferred_from_penalty() {
        let mut p = veteran("a");
        p.contract_bonus = Decimal::ZERO;
        // 15M penalty over 3 remaining proration years => 5M per year
        let ctx = contextualize_player(&p, &team(), 1);
        assert_eq!(ctx.bonus_per_year, m(5));
        assert_eq!(ctx.player.cap_release_penalty, m(10));
        assert_eq!(ctx.player.contract_bonus, Decimal::ZERO);
    }

    #[test]
    fn input_is_untouched() {
        let p = veteran("a");
        let before = p.clone();
        let _ = contextualize_player(&p, &team(), 2);
        assert_eq!(p, before);
    }
}
