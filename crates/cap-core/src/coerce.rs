//! Lenient numeric coercion for loosely-typed roster records.
//!
//! Upstream data comes from tabular exports where a money column can be a
//! number, a formatted string (`"$1,250,000"`), an empty cell or garbage.
//! Nothing here fails: anything that is not a finite number becomes zero,
//! and magnitudes beyond [`MAX_MONEY`] are clamped to it.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

/// Largest dollar magnitude a loaded record may carry ($1 trillion).
pub const MAX_MONEY: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

fn clamp_money(d: Decimal) -> Decimal {
    d.clamp(-MAX_MONEY, MAX_MONEY)
}

/// Convert a float to whole cents, mapping NaN, infinities and values outside
/// `Decimal`'s range to zero.
pub fn money_from_f64(v: f64) -> Decimal {
    if !v.is_finite() {
        return Decimal::ZERO;
    }
    Decimal::from_f64(v)
        .map(|d| clamp_money(d.round_dp(2)))
        .unwrap_or(Decimal::ZERO)
}

/// Floor a float to a non-negative whole number of years.
pub fn whole_years_from_f64(v: f64) -> u32 {
    if !v.is_finite() || v <= 0.0 {
        return 0;
    }
    v.floor().min(u32::MAX as f64) as u32
}

/// Parse a money cell such as `"12000000"`, `"$1,250,000.50"` or `"2.5e6"`.
pub fn parse_money(s: &str) -> Decimal {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '_' | ' '))
        .collect();
    if cleaned.is_empty() {
        return Decimal::ZERO;
    }
    if let Ok(d) = Decimal::from_str(&cleaned) {
        return clamp_money(d.round_dp(2));
    }
    cleaned
        .parse::<f64>()
        .map(money_from_f64)
        .unwrap_or(Decimal::ZERO)
}

fn money_from_value(v: &Value) -> Decimal {
    match v {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                clamp_money(Decimal::from(i))
            } else {
                n.as_f64().map(money_from_f64).unwrap_or(Decimal::ZERO)
            }
        }
        Value::String(s) => parse_money(s),
        _ => Decimal::ZERO,
    }
}

fn years_from_value(v: &Value) -> u32 {
    match v {
        Value::Number(n) => n.as_f64().map(whole_years_from_f64).unwrap_or(0),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(whole_years_from_f64)
            .unwrap_or(0),
        _ => 0,
    }
}

fn flag_from_value(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f.is_finite() && f != 0.0).unwrap_or(false),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "y" | "1"
        ),
        _ => false,
    }
}

/// `deserialize_with` helper for dollar fields.
pub fn money<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    Ok(money_from_value(&v))
}

/// `deserialize_with` helper for year-count fields.
pub fn years<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    Ok(years_from_value(&v))
}

/// `deserialize_with` helper for boolean flags exported as text or 0/1.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    Ok(flag_from_value(&v))
}
