//! Roster edits implied by committed moves.

use cap_core::{MoveRecord, Player, ScenarioMove, Team};
use cap_math::{contextualize_player, simulate_extension, ExtensionTerms};
use rust_decimal::Decimal;
use tracing::warn;

/// Recompute release penalty and net savings from the player's contract as it
/// reads today.
fn refresh_release_fields(team: &Team, player: &mut Player) {
    let ctx = contextualize_player(player, team, 0);
    player.cap_release_penalty = ctx.player.cap_release_penalty;
    player.cap_release_net_savings = ctx.player.cap_release_net_savings;
}

/// Apply the roster edit of one committed move. Returns `false` when the move
/// names a player that is not in `players`.
pub fn apply_move(team: &Team, players: &mut [Player], action: &ScenarioMove) -> bool {
    let Some(player) = players.iter_mut().find(|p| &p.id == action.player_id()) else {
        warn!(player = %action.player_id(), kind = action.kind(), "move names unknown player");
        return false;
    };
    match action {
        ScenarioMove::Release(_) | ScenarioMove::TradeQuick(_) => {
            // contract fields stay: dead money is re-derived from them
            player.is_free_agent = true;
            player.team.clear();
        }
        ScenarioMove::TradeIn(t) => {
            player.team = team.abbr_name.clone();
            player.is_free_agent = false;
            player.cap_hit = t.year1_cap_hit;
            // bonus proration stays with the trading team
            player.contract_bonus = Decimal::ZERO;
            player.cap_release_penalty = Decimal::ZERO;
            player.cap_release_net_savings = t.year1_cap_hit;
        }
        ScenarioMove::Extend(e) => {
            let preview = simulate_extension(
                player,
                ExtensionTerms {
                    years: e.years,
                    total_salary: e.salary,
                    signing_bonus: e.bonus,
                },
            );
            player.cap_hit = preview.new_cap_hit;
            player.contract_length = e.years;
            player.contract_years_left = e.years;
            player.contract_salary = e.salary;
            player.contract_bonus = e.bonus;
            refresh_release_fields(team, player);
        }
        ScenarioMove::Convert(c) => {
            // future proration is carried by the move itself
            player.cap_hit += c.cap_hit_delta;
        }
        ScenarioMove::Sign(s) => {
            player.team = team.abbr_name.clone();
            player.is_free_agent = false;
            player.cap_hit = s.year1_cap_hit;
            player.contract_length = s.years;
            player.contract_years_left = s.years;
            player.contract_salary = s.salary * Decimal::from(s.years.max(1));
            player.contract_bonus = s.bonus;
            refresh_release_fields(team, player);
        }
    }
    true
}

/// Rebuild the live roster: baseline records, replaced or extended by user
/// edits, with every committed move applied in order.
pub fn replay(
    team: &Team,
    baseline: &[Player],
    roster_edits: &[Player],
    moves: &[MoveRecord],
) -> Vec<Player> {
    let mut players = baseline.to_vec();
    for edit in roster_edits {
        match players.iter_mut().find(|p| p.id == edit.id) {
            Some(slot) => *slot = edit.clone(),
            None => players.push(edit.clone()),
        }
    }
    for record in moves {
        apply_move(team, &mut players, &record.action);
    }
    players
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::{fixture_players, fixture_team, m};
    use cap_math::{
        simulate_conversion, simulate_release, simulate_signing, simulate_trade_in,
        ConversionTerms, SigningOffer,
    };

    #[test]
    fn release_makes_free_agent_and_keeps_contract() {
        let team = fixture_team();
        let mut players = fixture_players();
        let before = players[0].clone();
        let r = simulate_release(&team, &players[0]);
        assert!(apply_move(&team, &mut players, &r.action));
        assert!(players[0].is_free_agent);
        assert!(players[0].team.is_empty());
        assert_eq!(players[0].cap_release_penalty, before.cap_release_penalty);
        assert_eq!(players[0].contract_years_left, before.contract_years_left);
    }

    #[test]
    fn signing_puts_free_agent_on_roster() {
        let team = fixture_team();
        let mut players = fixture_players();
        let fa = players.iter().position(|p| p.is_free_agent).unwrap();
        let s = simulate_signing(
            &team,
            &players[fa],
            SigningOffer {
                years: 3,
                salary: m(10),
                bonus: m(6),
            },
        );
        apply_move(&team, &mut players, &s.action);
        let p = &players[fa];
        assert!(p.is_rostered_by("KC"));
        assert_eq!(p.cap_hit, m(12));
        assert_eq!(p.contract_salary, m(30));
        assert_eq!(p.contract_years_left, 3);
        // fresh 6M bonus, three years to go: 60/40 split of the whole bonus
        assert_eq!(p.cap_release_penalty, m(6));
    }

    #[test]
    fn trade_in_drops_bonus() {
        let team = fixture_team();
        let mut players = fixture_players();
        let other = players.iter().position(|p| p.team == "LV").unwrap();
        let t = simulate_trade_in(&team, &players[other]);
        apply_move(&team, &mut players, &t.action);
        assert!(players[other].is_rostered_by("KC"));
        assert_eq!(players[other].contract_bonus, Decimal::ZERO);
        assert_eq!(players[other].cap_hit, t.year1_cap_hit);
    }

    #[test]
    fn conversion_moves_cap_hit_only() {
        let team = fixture_team();
        let mut players = fixture_players();
        let before = players[1].clone();
        let c = simulate_conversion(
            &players[1],
            ConversionTerms {
                convert_amount: m(6),
                years_remaining: 3,
            },
        );
        apply_move(&team, &mut players, &c.action);
        assert_eq!(players[1].cap_hit, before.cap_hit - m(4));
        assert_eq!(players[1].contract_bonus, before.contract_bonus);
    }

    #[test]
    fn unknown_player_is_reported() {
        let team = fixture_team();
        let mut players = fixture_players();
        let mut ghost = players[0].clone();
        ghost.id = "ghost".into();
        let r = simulate_release(&team, &ghost);
        assert!(!apply_move(&team, &mut players, &r.action));
    }

    #[test]
    fn edits_replace_or_append() {
        let team = fixture_team();
        let baseline = fixture_players();
        let mut edited = baseline[0].clone();
        edited.cap_hit = m(1);
        let mut added = baseline[0].clone();
        added.id = "new".into();
        let players = replay(&team, &baseline, &[edited, added], &[]);
        assert_eq!(players.len(), baseline.len() + 1);
        assert_eq!(players[0].cap_hit, m(1));
    }
}
