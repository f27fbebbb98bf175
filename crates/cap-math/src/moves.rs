//! Single-move cap simulators.
//!
//! Each simulator previews the cap effect of one roster action and returns the
//! [`ScenarioMove`] that replays it. Nothing here mutates the team or player.

use crate::round_dollars;
use crate::schedule::{player_bonus_per_year, proration_years, scheduled_base};
use cap_core::{
    ConvertMove, ExtendMove, Player, ReleaseMove, ScenarioMove, SignMove, Team, TradeInMove,
};
use rust_decimal::Decimal;
use tracing::trace;

/// Share of release dead money deferred to next year when two or more
/// contract years remain.
pub const NEXT_YEAR_DEAD_SHARE: Decimal = Decimal::from_parts(4, 0, 0, false, 1);

/// Offers below this fraction of a free agent's asking terms are lowballs.
pub const LOWBALL_THRESHOLD: Decimal = Decimal::from_parts(9, 0, 0, false, 1);

/// Dead money split between the current and the next league year.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeadMoneySplit {
    pub current_year: Decimal,
    pub next_year: Decimal,
}

/// Split `total` dead money 60/40 across this year and next when at least two
/// contract years remain; otherwise it all lands this year.
pub fn split_dead_money(total: Decimal, years_left: u32) -> DeadMoneySplit {
    if years_left >= 2 {
        let next_year = round_dollars(total * NEXT_YEAR_DEAD_SHARE);
        DeadMoneySplit {
            current_year: total - next_year,
            next_year,
        }
    } else {
        DeadMoneySplit {
            current_year: total,
            next_year: Decimal::ZERO,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReleasePreview {
    pub penalty_total: Decimal,
    pub penalty_current_year: Decimal,
    pub penalty_next_year: Decimal,
    /// Current-year savings, net of the current-year penalty.
    pub savings: Decimal,
    pub new_cap_space: Decimal,
    pub action: ScenarioMove,
}

/// Preview releasing `player`.
pub fn simulate_release(team: &Team, player: &Player) -> ReleasePreview {
    departure(team, player, ScenarioMove::Release)
}

/// Preview dumping `player` in a quick trade. Cap math matches a release.
pub fn simulate_trade_quick(team: &Team, player: &Player) -> ReleasePreview {
    departure(team, player, ScenarioMove::TradeQuick)
}

fn departure(team: &Team, player: &Player, tag: fn(ReleaseMove) -> ScenarioMove) -> ReleasePreview {
    let penalty_total = player.cap_release_penalty;
    let split = split_dead_money(penalty_total, player.effective_years_left());
    let savings = player.cap_release_net_savings;
    let action = tag(ReleaseMove {
        player_id: player.id.clone(),
        penalty: split.current_year,
        savings,
    });
    trace!(player = %player.id, kind = action.kind(), %penalty_total, %savings, "simulated departure");
    ReleasePreview {
        penalty_total,
        penalty_current_year: split.current_year,
        penalty_next_year: split.next_year,
        savings,
        new_cap_space: team.cap_available + savings,
        action,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TradeInPreview {
    pub year1_cap_hit: Decimal,
    pub remaining_cap_after: Decimal,
    pub can_trade_in: bool,
    pub action: ScenarioMove,
}

/// Preview acquiring `player` by trade.
///
/// The acquiring team takes on base salary only; bonus proration stays with
/// the original team. Year-1 salary comes from the contract's schedule at the
/// current contract year, or from `cap_hit` minus bonus proration when the
/// total salary is unknown.
pub fn simulate_trade_in(team: &Team, player: &Player) -> TradeInPreview {
    let year1_cap_hit = scheduled_base(player, player.years_elapsed())
        .unwrap_or_else(|| player.cap_hit - player_bonus_per_year(player))
        .max(Decimal::ZERO);
    let remaining_cap_after = team.cap_available - year1_cap_hit;
    trace!(player = %player.id, %year1_cap_hit, %remaining_cap_after, "simulated trade-in");
    TradeInPreview {
        year1_cap_hit,
        remaining_cap_after,
        can_trade_in: remaining_cap_after >= Decimal::ZERO,
        action: ScenarioMove::TradeIn(TradeInMove {
            player_id: player.id.clone(),
            year1_cap_hit,
        }),
    }
}

/// Terms for extending a rostered player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtensionTerms {
    pub years: u32,
    pub total_salary: Decimal,
    pub signing_bonus: Decimal,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExtensionPreview {
    pub new_cap_hit: Decimal,
    pub cap_hit_delta: Decimal,
    pub action: ScenarioMove,
}

/// Preview an extension using a flat average of the new money over its years.
pub fn simulate_extension(player: &Player, terms: ExtensionTerms) -> ExtensionPreview {
    let years = terms.years.max(1);
    let new_cap_hit = (terms.total_salary + terms.signing_bonus) / Decimal::from(years);
    let cap_hit_delta = new_cap_hit - player.cap_hit;
    trace!(player = %player.id, years, %new_cap_hit, %cap_hit_delta, "simulated extension");
    ExtensionPreview {
        new_cap_hit,
        cap_hit_delta,
        action: ScenarioMove::Extend(ExtendMove {
            player_id: player.id.clone(),
            years,
            salary: terms.total_salary,
            bonus: terms.signing_bonus,
            cap_hit_delta,
        }),
    }
}

/// Base-salary-to-bonus restructure request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConversionTerms {
    pub convert_amount: Decimal,
    pub years_remaining: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConversionPreview {
    /// Requested amount clamped to the convertible base salary.
    pub convert_amount: Decimal,
    pub proration_years: u32,
    pub per_year_proration: Decimal,
    pub new_current_year_cap_hit: Decimal,
    /// Change to this year's cap hit; negative when cap is freed.
    pub cap_hit_delta: Decimal,
    /// Added cap charge in each following year of the proration window.
    pub future_years: Vec<Decimal>,
    pub action: ScenarioMove,
}

/// Preview converting base salary into prorated bonus.
pub fn simulate_conversion(player: &Player, terms: ConversionTerms) -> ConversionPreview {
    let p_years = proration_years(terms.years_remaining);
    let convertible = (player.cap_hit - player_bonus_per_year(player)).max(Decimal::ZERO);
    let convert_amount = terms.convert_amount.clamp(Decimal::ZERO, convertible);
    let per_year_proration = convert_amount / Decimal::from(p_years);
    let new_current_year_cap_hit = player.cap_hit - convert_amount + per_year_proration;
    let cap_hit_delta = new_current_year_cap_hit - player.cap_hit;
    trace!(player = %player.id, %convert_amount, p_years, %cap_hit_delta, "simulated conversion");
    ConversionPreview {
        convert_amount,
        proration_years: p_years,
        per_year_proration,
        new_current_year_cap_hit,
        cap_hit_delta,
        future_years: vec![per_year_proration; (p_years - 1) as usize],
        action: ScenarioMove::Convert(ConvertMove {
            player_id: player.id.clone(),
            convert_amount,
            years_remaining: terms.years_remaining,
            cap_hit_delta,
        }),
    }
}

/// Contract offer to a free agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SigningOffer {
    pub years: u32,
    pub salary: Decimal,
    pub bonus: Decimal,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SigningPreview {
    pub year1_cap_hit: Decimal,
    pub remaining_cap_after: Decimal,
    pub can_sign: bool,
    /// Some offered term sits below 90% of what the player asks for.
    pub warn_lowball: bool,
    pub action: ScenarioMove,
}

/// Preview signing a free agent: year-1 salary plus one year of bonus proration.
pub fn simulate_signing(team: &Team, player: &Player, offer: SigningOffer) -> SigningPreview {
    let p_years = proration_years(offer.years);
    let year1_cap_hit = offer.salary + offer.bonus / Decimal::from(p_years);
    let remaining_cap_after = team.cap_available - year1_cap_hit;
    let warn_lowball = below_ask(offer.salary, player.desired_salary)
        || below_ask(offer.bonus, player.desired_bonus)
        || below_ask(
            Decimal::from(offer.years),
            Decimal::from(player.desired_length),
        );
    trace!(player = %player.id, %year1_cap_hit, warn_lowball, "simulated signing");
    SigningPreview {
        year1_cap_hit,
        remaining_cap_after,
        can_sign: remaining_cap_after >= Decimal::ZERO,
        warn_lowball,
        action: ScenarioMove::Sign(SignMove {
            player_id: player.id.clone(),
            years: offer.years.max(1),
            salary: offer.salary,
            bonus: offer.bonus,
            year1_cap_hit,
        }),
    }
}

// A zero ask places no constraint.
fn below_ask(offered: Decimal, desired: Decimal) -> bool {
    desired > Decimal::ZERO && offered < desired * LOWBALL_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{free_agent, m, team, veteran};

    #[test]
    fn release_splits_when_two_years_left() {
        let mut p = veteran("a");
        p.contract_years_left = 2;
        p.cap_release_penalty = m(10);
        let r = simulate_release(&team(), &p);
        assert_eq!(r.penalty_next_year, m(4));
        assert_eq!(r.penalty_current_year, m(6));
        assert_eq!(r.new_cap_space, m(35));
        match r.action {
            ScenarioMove::Release(mv) => {
                assert_eq!(mv.penalty, m(6));
                assert_eq!(mv.savings, m(5));
            }
            other => panic!("unexpected move {other:?}"),
        }
    }

    #[test]
    fn final_year_release_is_all_current() {
        let mut p = veteran("a");
        p.contract_years_left = 1;
        let r = simulate_release(&team(), &p);
        assert_eq!(r.penalty_current_year, m(15));
        assert_eq!(r.penalty_next_year, Decimal::ZERO);
    }

    #[test]
    fn next_year_share_rounds_half_away() {
        let s = split_dead_money(Decimal::new(1_000_001, 0), 3);
        // 400_000.4 rounds down, 0.5 would round up
        assert_eq!(s.next_year, Decimal::new(400_000, 0));
        assert_eq!(s.current_year, Decimal::new(600_001, 0));
        let h = split_dead_money(Decimal::new(5, 0) / Decimal::new(4, 0), 2);
        assert_eq!(h.next_year, Decimal::ONE);
    }

    #[test]
    fn quick_trade_matches_release() {
        let p = veteran("a");
        let r = simulate_release(&team(), &p);
        let t = simulate_trade_quick(&team(), &p);
        assert_eq!(r.penalty_current_year, t.penalty_current_year);
        assert_eq!(r.new_cap_space, t.new_cap_space);
        assert_eq!(t.action.kind(), "tradeQuick");
    }

    #[test]
    fn trade_in_takes_scheduled_salary_only() {
        // 4-year $60M schedule: 13.92 / 14.64 / 15.36 / 16.08; second contract year.
        let t = simulate_trade_in(&team(), &veteran("a"));
        assert_eq!(t.year1_cap_hit, Decimal::new(14_640_000, 0));
        assert_eq!(t.remaining_cap_after, Decimal::new(15_360_000, 0));
        assert!(t.can_trade_in);
    }

    #[test]
    fn trade_in_without_salary_uses_cap_hit() {
        let mut p = veteran("a");
        p.contract_salary = Decimal::ZERO;
        p.cap_hit = m(40);
        let t = simulate_trade_in(&team(), &p);
        assert_eq!(t.year1_cap_hit, m(35));
        assert!(!t.can_trade_in);
    }

    #[test]
    fn extension_is_flat_average() {
        let e = simulate_extension(
            &veteran("a"),
            ExtensionTerms {
                years: 4,
                total_salary: m(100),
                signing_bonus: m(20),
            },
        );
        assert_eq!(e.new_cap_hit, m(30));
        assert_eq!(e.cap_hit_delta, m(10));
        let zero = simulate_extension(
            &veteran("a"),
            ExtensionTerms {
                years: 0,
                total_salary: m(10),
                signing_bonus: Decimal::ZERO,
            },
        );
        assert_eq!(zero.new_cap_hit, m(10));
    }

    #[test]
    fn conversion_prorates_over_window() {
        let mut p = veteran("a");
        p.cap_hit = m(25);
        let c = simulate_conversion(
            &p,
            ConversionTerms {
                convert_amount: m(9),
                years_remaining: 3,
            },
        );
        assert_eq!(c.per_year_proration, m(3));
        assert_eq!(c.new_current_year_cap_hit, m(25) - m(9) + m(3));
        assert_eq!(c.cap_hit_delta, -m(6));
        assert_eq!(c.future_years, vec![m(3), m(3)]);
    }

    #[test]
    fn conversion_clamps_to_base_salary() {
        // cap hit 20M with 5M/yr proration leaves 15M convertible
        let c = simulate_conversion(
            &veteran("a"),
            ConversionTerms {
                convert_amount: m(50),
                years_remaining: 9,
            },
        );
        assert_eq!(c.convert_amount, m(15));
        assert_eq!(c.proration_years, 5);
        assert_eq!(c.per_year_proration, m(3));
        assert_eq!(c.future_years.len(), 4);
    }

    #[test]
    fn signing_year_one() {
        let s = simulate_signing(
            &team(),
            &free_agent("fa"),
            SigningOffer {
                years: 3,
                salary: m(10),
                bonus: m(6),
            },
        );
        assert_eq!(s.year1_cap_hit, m(12));
        assert_eq!(s.remaining_cap_after, m(18));
        assert!(s.can_sign);
        assert!(!s.warn_lowball);
    }

    #[test]
    fn signing_lowball_and_overspend() {
        let fa = free_agent("fa");
        let low = simulate_signing(
            &team(),
            &fa,
            SigningOffer {
                years: 2,
                salary: m(40),
                bonus: m(6),
            },
        );
        assert!(low.warn_lowball, "two years against a three-year ask");
        assert!(!low.can_sign);

        let mut no_ask = fa.clone();
        no_ask.desired_salary = Decimal::ZERO;
        no_ask.desired_bonus = Decimal::ZERO;
        no_ask.desired_length = 0;
        let ok = simulate_signing(
            &team(),
            &no_ask,
            SigningOffer {
                years: 1,
                salary: Decimal::ONE,
                bonus: Decimal::ZERO,
            },
        );
        assert!(!ok.warn_lowball);
    }
}
