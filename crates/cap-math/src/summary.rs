//! Current-year cap snapshot.

use cap_core::{CapSnapshot, ScenarioMove, Team};
use rust_decimal::Decimal;
use tracing::debug;

/// Fold already-decided moves onto the team's baseline.
///
/// Departures subtract their net savings from spend and carry their
/// current-year penalty as dead money; extensions and conversions add their
/// cap-hit delta; signings and trade-ins add their year-1 cap hit. Move order
/// does not matter.
pub fn calc_cap_summary(team: &Team, moves: &[ScenarioMove]) -> CapSnapshot {
    let mut delta_spent = Decimal::ZERO;
    let mut dead_money = Decimal::ZERO;
    for mv in moves {
        match mv {
            ScenarioMove::Release(r) | ScenarioMove::TradeQuick(r) => {
                delta_spent -= r.savings;
                dead_money += r.penalty;
            }
            ScenarioMove::Extend(e) => delta_spent += e.cap_hit_delta,
            ScenarioMove::Convert(c) => delta_spent += c.cap_hit_delta,
            ScenarioMove::Sign(s) => delta_spent += s.year1_cap_hit,
            ScenarioMove::TradeIn(t) => delta_spent += t.year1_cap_hit,
        }
    }
    let cap_available = team.cap_available - delta_spent;
    debug!(team = %team.abbr_name, moves = moves.len(), %delta_spent, %dead_money, "cap summary");
    CapSnapshot {
        cap_room: team.cap_room,
        cap_spent: team.cap_spent + delta_spent,
        cap_available,
        dead_money,
        baseline_available: team.cap_available,
        delta_available: cap_available - team.cap_available,
    }
}
