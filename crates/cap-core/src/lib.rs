#![deny(warnings)]

//! Core roster and scenario models for the cap lab.
//!
//! This crate defines the serializable records exchanged between external
//! roster loaders, the cap-math engine and the host application, plus
//! loader-side validation helpers. Money is always [`Decimal`] dollars.

pub mod coerce;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Unique player identifier as supplied by the roster source.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        PlayerId(s.to_string())
    }
}

/// A team's financial baseline for the current league year.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    /// Short identifier, e.g. "KC".
    pub abbr_name: String,
    /// Total cap budget for the current year.
    #[serde(default, deserialize_with = "coerce::money")]
    pub cap_room: Decimal,
    /// Cap already committed, as loaded.
    #[serde(default, deserialize_with = "coerce::money")]
    pub cap_spent: Decimal,
    /// Cap space, as loaded.
    #[serde(default, deserialize_with = "coerce::money")]
    pub cap_available: Decimal,
    /// League year the baseline describes.
    #[serde(default)]
    pub calendar_year: Option<i32>,
}

/// Longest contract the engine will schedule; longer lengths are clamped.
pub const MAX_CONTRACT_YEARS: u32 = 30;

/// A rostered player or free agent with contract and release-impact fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: String,
    /// Abbreviation of the team holding the contract; empty for free agents.
    #[serde(default)]
    pub team: String,
    #[serde(default, deserialize_with = "coerce::flag")]
    pub is_free_agent: bool,
    /// Current-year cap charge. Reflects moves already applied to the roster.
    #[serde(default, deserialize_with = "coerce::money")]
    pub cap_hit: Decimal,
    /// Total remaining base salary; zero when unknown.
    #[serde(default, deserialize_with = "coerce::money")]
    pub contract_salary: Decimal,
    /// Total signing bonus; zero when unknown.
    #[serde(default, deserialize_with = "coerce::money")]
    pub contract_bonus: Decimal,
    #[serde(default, deserialize_with = "coerce::years")]
    pub contract_length: u32,
    #[serde(default, deserialize_with = "coerce::years")]
    pub contract_years_left: u32,
    /// Dead money charged if released today (source supplied).
    #[serde(default, deserialize_with = "coerce::money")]
    pub cap_release_penalty: Decimal,
    /// Current-year savings if released today, already net of the penalty.
    #[serde(default, deserialize_with = "coerce::money")]
    pub cap_release_net_savings: Decimal,
    #[serde(default, deserialize_with = "coerce::money")]
    pub desired_salary: Decimal,
    #[serde(default, deserialize_with = "coerce::money")]
    pub desired_bonus: Decimal,
    #[serde(default, deserialize_with = "coerce::years")]
    pub desired_length: u32,
}

impl Player {
    /// Contract length clamped to `[1, MAX_CONTRACT_YEARS]`.
    pub fn effective_length(&self) -> u32 {
        self.contract_length.clamp(1, MAX_CONTRACT_YEARS)
    }

    /// Years left, bounded by the contract length.
    pub fn effective_years_left(&self) -> u32 {
        self.contract_years_left.min(self.effective_length())
    }

    /// Completed contract years, in `[0, length - 1]`.
    pub fn years_elapsed(&self) -> u32 {
        let len = self.effective_length();
        len.saturating_sub(self.effective_years_left()).min(len - 1)
    }

    /// Whether the player counts against `abbr`'s roster.
    pub fn is_rostered_by(&self, abbr: &str) -> bool {
        !self.is_free_agent && self.team == abbr
    }
}

/// Payload shared by releases and quick trades: both shed the contract and
/// leave the unamortized bonus behind as dead money.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseMove {
    pub player_id: PlayerId,
    /// Current-year portion of the dead money.
    pub penalty: Decimal,
    /// Current-year savings, net of `penalty`.
    pub savings: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeInMove {
    pub player_id: PlayerId,
    pub year1_cap_hit: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendMove {
    pub player_id: PlayerId,
    pub years: u32,
    pub salary: Decimal,
    pub bonus: Decimal,
    pub cap_hit_delta: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertMove {
    pub player_id: PlayerId,
    /// Base salary converted to bonus, already clamped to the convertible ceiling.
    pub convert_amount: Decimal,
    pub years_remaining: u32,
    pub cap_hit_delta: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignMove {
    pub player_id: PlayerId,
    pub years: u32,
    pub salary: Decimal,
    pub bonus: Decimal,
    pub year1_cap_hit: Decimal,
}

/// One applied roster action, carrying only what is needed to replay its cap effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ScenarioMove {
    Release(ReleaseMove),
    TradeQuick(ReleaseMove),
    TradeIn(TradeInMove),
    Extend(ExtendMove),
    Convert(ConvertMove),
    Sign(SignMove),
}

impl ScenarioMove {
    pub fn player_id(&self) -> &PlayerId {
        match self {
            ScenarioMove::Release(m) | ScenarioMove::TradeQuick(m) => &m.player_id,
            ScenarioMove::TradeIn(m) => &m.player_id,
            ScenarioMove::Extend(m) => &m.player_id,
            ScenarioMove::Convert(m) => &m.player_id,
            ScenarioMove::Sign(m) => &m.player_id,
        }
    }

    /// Wire tag of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            ScenarioMove::Release(_) => "release",
            ScenarioMove::TradeQuick(_) => "tradeQuick",
            ScenarioMove::TradeIn(_) => "tradeIn",
            ScenarioMove::Extend(_) => "extend",
            ScenarioMove::Convert(_) => "convert",
            ScenarioMove::Sign(_) => "sign",
        }
    }

    /// True for moves that take the player off the roster.
    pub fn removes_player(&self) -> bool {
        matches!(self, ScenarioMove::Release(_) | ScenarioMove::TradeQuick(_))
    }
}

/// A committed move with the time it was applied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub action: ScenarioMove,
}

/// Point-in-time cap read derived from a team baseline and a move list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapSnapshot {
    pub cap_room: Decimal,
    pub cap_spent: Decimal,
    pub cap_available: Decimal,
    pub dead_money: Decimal,
    pub baseline_available: Decimal,
    pub delta_available: Decimal,
}

/// One season of a multi-year projection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearProjection {
    pub year_offset: u32,
    pub cap_room: Decimal,
    pub roster_cap: Decimal,
    pub dead_money: Decimal,
    pub total_spent: Decimal,
    pub cap_space: Decimal,
}

/// Default compounding rate for league cap beyond the published forward figures.
pub const DEFAULT_GROWTH_RATE: Decimal = Decimal::from_parts(9, 0, 0, false, 2);
/// League maximum for unused cap carried into next year.
pub const DEFAULT_ROLLOVER_MAX: Decimal = Decimal::from_parts(35_000_000, 0, 0, false, 0);

/// Externally published league cap for Y+1, Y+2 and Y+3.
pub fn default_forward_league_caps() -> Vec<Decimal> {
    vec![
        Decimal::new(324_000_000, 0),
        Decimal::new(334_000_000, 0),
        Decimal::new(344_000_000, 0),
    ]
}

/// Projection parameters and optional per-year overlays.
///
/// Overlay vectors are indexed by year offset; missing entries count as zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionOptions {
    /// Annual league cap growth applied from Y+4 onwards.
    pub growth_rate: Decimal,
    /// Published league caps for Y+1.. in order.
    pub forward_league_caps: Vec<Decimal>,
    /// Rollover the team wants to carry into Y+1; `None` disables rollover.
    pub rollover_requested: Option<Decimal>,
    pub rollover_max: Decimal,
    pub rookie_reserve_by_year: Vec<Decimal>,
    pub baseline_dead_money_by_year: Vec<Decimal>,
    /// Extra reserved spend, e.g. for re-signing own free agents.
    pub extra_spending_by_year: Vec<Decimal>,
    /// Also fold `baseline_dead_money_by_year[0]` into the current year.
    pub baseline_dead_money_in_current_year: bool,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            growth_rate: DEFAULT_GROWTH_RATE,
            forward_league_caps: default_forward_league_caps(),
            rollover_requested: None,
            rollover_max: DEFAULT_ROLLOVER_MAX,
            rookie_reserve_by_year: vec![],
            baseline_dead_money_by_year: vec![],
            extra_spending_by_year: vec![],
            baseline_dead_money_in_current_year: false,
        }
    }
}

/// Overlay value for a year offset, zero when absent.
pub fn overlay_at(values: &[Decimal], year: usize) -> Decimal {
    values.get(year).copied().unwrap_or(Decimal::ZERO)
}

/// Saved what-if scenario: user roster edits plus the move list to replay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub name: String,
    /// Abbreviation of the team the scenario was built for.
    pub team: String,
    pub saved_at: DateTime<Utc>,
    /// Player records replacing the loaded ones with the same id.
    #[serde(default)]
    pub roster_edits: Vec<Player>,
    #[serde(default)]
    pub moves: Vec<MoveRecord>,
}

/// Listing entry for a stored scenario.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSummary {
    pub name: String,
    pub team: String,
    pub saved_at: DateTime<Utc>,
    pub move_count: usize,
}

impl From<&Scenario> for ScenarioSummary {
    fn from(s: &Scenario) -> Self {
        Self {
            name: s.name.clone(),
            team: s.team.clone(),
            saved_at: s.saved_at,
            move_count: s.moves.len(),
        }
    }
}

/// Loader-side invariant violations. The engine itself clamps instead.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("empty identifier")]
    EmptyIdentifier,
    #[error("player {player}: {years_left} years left exceeds contract length {length}")]
    YearsLeftExceedsLength {
        player: String,
        years_left: u32,
        length: u32,
    },
    #[error("{owner}: negative value in {field}")]
    NegativeMoney { owner: String, field: &'static str },
    #[error("duplicate player id: {0}")]
    DuplicatePlayer(String),
}

/// Validate a team baseline.
pub fn validate_team(team: &Team) -> Result<(), ValidationError> {
    if team.abbr_name.trim().is_empty() {
        return Err(ValidationError::EmptyIdentifier);
    }
    if team.cap_room < Decimal::ZERO {
        return Err(ValidationError::NegativeMoney {
            owner: team.abbr_name.clone(),
            field: "capRoom",
        });
    }
    Ok(())
}

/// Validate a single player record.
pub fn validate_player(p: &Player) -> Result<(), ValidationError> {
    if p.id.0.trim().is_empty() {
        return Err(ValidationError::EmptyIdentifier);
    }
    if p.contract_years_left > p.contract_length {
        return Err(ValidationError::YearsLeftExceedsLength {
            player: p.id.0.clone(),
            years_left: p.contract_years_left,
            length: p.contract_length,
        });
    }
    let money = [
        ("capHit", p.cap_hit),
        ("contractSalary", p.contract_salary),
        ("contractBonus", p.contract_bonus),
        ("capReleasePenalty", p.cap_release_penalty),
    ];
    for (field, value) in money {
        if value < Decimal::ZERO {
            return Err(ValidationError::NegativeMoney {
                owner: p.id.0.clone(),
                field,
            });
        }
    }
    Ok(())
}

/// Validate a team and its players, returning every finding rather than the first.
pub fn validate_roster(team: &Team, players: &[Player]) -> Vec<ValidationError> {
    let mut findings = Vec::new();
    if let Err(e) = validate_team(team) {
        findings.push(e);
    }
    let mut seen: BTreeSet<&PlayerId> = BTreeSet::new();
    for p in players {
        if let Err(e) = validate_player(p) {
            findings.push(e);
        }
        if !seen.insert(&p.id) {
            findings.push(ValidationError::DuplicatePlayer(p.id.0.clone()));
        }
    }
    findings
}
