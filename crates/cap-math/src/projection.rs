//! Multi-year cap projection.
//!
//! Year 0 is anchored to the live baseline math from [`calc_cap_summary`];
//! later years are rebuilt from roster contracts, release dead money and
//! conversion proration, then adjusted by the optional overlays in
//! [`ProjectionOptions`].

use crate::moves::simulate_release;
use crate::round_dollars;
use crate::schedule::{build_base_schedule, player_bonus_per_year, proration_years};
use crate::summary::calc_cap_summary;
use cap_core::{overlay_at, Player, PlayerId, ProjectionOptions, ScenarioMove, Team, YearProjection};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace};

/// Per-year cap hits for one player over `years` seasons.
///
/// Index 0 is the live `cap_hit`, which already reflects applied moves. Later
/// years take base salary from the contract schedule (or a flat value inferred
/// from the current cap hit when total salary is unknown) plus bonus proration
/// while the proration window lasts. Years past the contract contribute zero.
pub fn project_player_cap_hits(player: &Player, years: usize) -> Vec<Decimal> {
    let mut hits = Vec::with_capacity(years);
    if years == 0 {
        return hits;
    }
    hits.push(player.cap_hit);

    let length = player.effective_length();
    let years_left = player.effective_years_left();
    let elapsed = player.years_elapsed();
    let bonus_per_year = player_bonus_per_year(player);
    let remaining_proration = proration_years(length).saturating_sub(elapsed);
    let schedule = (player.contract_salary > Decimal::ZERO)
        .then(|| build_base_schedule(player.contract_salary, length));
    let current_proration = if remaining_proration > 0 {
        bonus_per_year
    } else {
        Decimal::ZERO
    };
    let flat_base = (player.cap_hit - current_proration).max(Decimal::ZERO);

    for i in 1..years as u32 {
        if i >= years_left {
            hits.push(Decimal::ZERO);
            continue;
        }
        let base = match &schedule {
            Some(rows) => rows
                .get((elapsed + i) as usize)
                .copied()
                .unwrap_or(Decimal::ZERO),
            None => flat_base,
        };
        let proration = if i < remaining_proration {
            bonus_per_year
        } else {
            Decimal::ZERO
        };
        hits.push(base + proration);
    }
    hits
}

/// Dead money by year from departures: each one re-runs the release split
/// against the named player. Unknown players fall back to the move's recorded
/// current-year penalty.
pub fn derive_dead_money_schedule(
    team: &Team,
    players: &[Player],
    moves: &[ScenarioMove],
    years: usize,
) -> Vec<Decimal> {
    let mut dead = vec![Decimal::ZERO; years];
    if years == 0 {
        return dead;
    }
    let by_id: BTreeMap<&PlayerId, &Player> = players.iter().map(|p| (&p.id, p)).collect();
    for mv in moves {
        let (ScenarioMove::Release(r) | ScenarioMove::TradeQuick(r)) = mv else {
            continue;
        };
        match by_id.get(&r.player_id) {
            Some(player) => {
                let preview = simulate_release(team, player);
                dead[0] += preview.penalty_current_year;
                if years > 1 {
                    dead[1] += preview.penalty_next_year;
                }
            }
            None => {
                debug!(player = %r.player_id, "departed player not in roster; using recorded penalty");
                dead[0] += r.penalty;
            }
        }
    }
    dead
}

/// Future-year cap increases from conversions, keyed by player.
///
/// Each conversion adds `convert_amount / proration_years` to offsets
/// `1..proration_years` (the current year is already in the cap-hit delta).
pub fn derive_conversion_increments(
    moves: &[ScenarioMove],
    years: usize,
) -> BTreeMap<PlayerId, Vec<Decimal>> {
    let mut increments: BTreeMap<PlayerId, Vec<Decimal>> = BTreeMap::new();
    for mv in moves {
        let ScenarioMove::Convert(c) = mv else {
            continue;
        };
        let p_years = proration_years(c.years_remaining);
        let per_year = c.convert_amount / Decimal::from(p_years);
        let row = increments
            .entry(c.player_id.clone())
            .or_insert_with(|| vec![Decimal::ZERO; years]);
        for offset in 1..(p_years as usize).min(years) {
            row[offset] += per_year;
        }
    }
    increments
}

/// League cap for a year offset: the team's actual figure now, published
/// forward caps next, then compounding growth from the current figure.
pub fn cap_room_for_year(team: &Team, year: usize, opts: &ProjectionOptions) -> Decimal {
    if year == 0 {
        return team.cap_room;
    }
    if let Some(cap) = opts.forward_league_caps.get(year - 1) {
        return *cap;
    }
    let factor = Decimal::ONE + opts.growth_rate;
    let mut room = team.cap_room;
    for _ in 0..year {
        room = match room.checked_mul(factor) {
            Some(v) => v,
            None => return Decimal::MAX,
        };
    }
    round_dollars(room)
}

/// Project the team's cap position for `years` seasons.
pub fn project_team_caps(
    team: &Team,
    players: &[Player],
    moves: &[ScenarioMove],
    years: usize,
    opts: &ProjectionOptions,
) -> Vec<YearProjection> {
    debug!(team = %team.abbr_name, players = players.len(), moves = moves.len(), years, "projecting team caps");
    let removed: BTreeSet<&PlayerId> = moves
        .iter()
        .filter(|mv| mv.removes_player())
        .map(|mv| mv.player_id())
        .collect();
    let summary = calc_cap_summary(team, moves);
    let dead = derive_dead_money_schedule(team, players, moves, years);
    let increments = derive_conversion_increments(moves, years);

    let mut roster_totals = vec![Decimal::ZERO; years];
    for player in players
        .iter()
        .filter(|p| p.is_rostered_by(&team.abbr_name) && !removed.contains(&p.id))
    {
        let hits = project_player_cap_hits(player, years);
        let extra = increments.get(&player.id);
        for (i, total) in roster_totals.iter_mut().enumerate() {
            *total += hits[i];
            if let Some(row) = extra {
                *total += row[i];
            }
        }
    }

    let mut out = Vec::with_capacity(years);
    let mut available_y0 = Decimal::ZERO;
    for (i, roster_total) in roster_totals.into_iter().enumerate() {
        let cap_room = cap_room_for_year(team, i, opts);
        let mut dead_money = dead[i];
        let (roster_cap, mut total_spent, mut cap_space) = if i == 0 {
            let total_spent = summary.cap_spent;
            (
                (total_spent - dead_money).max(Decimal::ZERO),
                total_spent,
                summary.cap_available,
            )
        } else {
            let total_spent = roster_total + dead_money;
            (roster_total, total_spent, cap_room - total_spent)
        };

        if i > 0 {
            let rookies = overlay_at(&opts.rookie_reserve_by_year, i);
            if !rookies.is_zero() {
                total_spent += rookies;
                cap_space = cap_room - total_spent;
            }
        }
        if i > 0 || opts.baseline_dead_money_in_current_year {
            let baseline_dead = overlay_at(&opts.baseline_dead_money_by_year, i);
            if !baseline_dead.is_zero() {
                total_spent += baseline_dead;
                dead_money += baseline_dead;
                cap_space = cap_room - total_spent;
            }
        }
        if i > 0 {
            let extra = overlay_at(&opts.extra_spending_by_year, i);
            if !extra.is_zero() {
                total_spent += extra;
                cap_space = cap_room - total_spent;
            }
        }

        if i == 0 {
            available_y0 = cap_space;
        }
        if i == 1 {
            if let Some(requested) = opts.rollover_requested {
                let rollover = requested
                    .min(opts.rollover_max)
                    .min(available_y0)
                    .max(Decimal::ZERO);
                cap_space += rollover;
            }
        }

        trace!(year = i, %cap_room, %roster_cap, %dead_money, %total_spent, %cap_space, "projected year");
        out.push(YearProjection {
            year_offset: i as u32,
            cap_room,
            roster_cap,
            dead_money,
            total_spent,
            cap_space,
        });
    }
    out
}
