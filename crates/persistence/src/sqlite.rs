//! SQLite-backed scenario storage.

use crate::{validate_name, StoreError};
use cap_core::{Scenario, ScenarioSummary};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS scenarios (
    name TEXT PRIMARY KEY NOT NULL,
    team TEXT NOT NULL,
    saved_at TEXT NOT NULL,
    move_count INTEGER NOT NULL,
    payload TEXT NOT NULL
)";

/// Open (creating if needed) the database at `url` and ensure the schema.
///
/// The pool holds a single long-lived connection so `sqlite::memory:`
/// databases survive between calls.
pub async fn init_db(url: &str) -> Result<SqlitePool, StoreError> {
    let opts = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(opts)
        .await?;
    sqlx::query(SCHEMA).execute(&pool).await?;
    info!(url, "scenario database ready");
    Ok(pool)
}

/// Insert or replace a scenario by name.
pub async fn save_scenario(pool: &SqlitePool, scenario: &Scenario) -> Result<(), StoreError> {
    validate_name(&scenario.name)?;
    let payload = serde_json::to_string(scenario)?;
    sqlx::query(
        "INSERT OR REPLACE INTO scenarios (name, team, saved_at, move_count, payload)
        VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(&scenario.name)
    .bind(&scenario.team)
    .bind(scenario.saved_at.to_rfc3339())
    .bind(scenario.moves.len() as i64)
    .bind(payload)
    .execute(pool)
    .await?;
    info!(scenario = %scenario.name, "scenario saved");
    Ok(())
}

pub async fn list_scenarios(pool: &SqlitePool) -> Result<Vec<ScenarioSummary>, StoreError> {
    let rows: Vec<(String, String, String, i64)> = sqlx::query_as(
        "SELECT name, team, saved_at, move_count FROM scenarios ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    rows.into_iter()
        .map(|(name, team, saved_at, move_count)| {
            let saved_at = DateTime::parse_from_rfc3339(&saved_at)
                .map_err(|e| StoreError::Serde(e.to_string()))?
                .with_timezone(&Utc);
            Ok(ScenarioSummary {
                name,
                team,
                saved_at,
                move_count: move_count.max(0) as usize,
            })
        })
        .collect()
}

pub async fn load_scenario(pool: &SqlitePool, name: &str) -> Result<Option<Scenario>, StoreError> {
    validate_name(name)?;
    let payload: Option<String> = sqlx::query_scalar("SELECT payload FROM scenarios WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    match payload {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}

/// Returns whether a scenario was removed.
pub async fn delete_scenario(pool: &SqlitePool, name: &str) -> Result<bool, StoreError> {
    validate_name(name)?;
    let done = sqlx::query("DELETE FROM scenarios WHERE name = $1")
        .bind(name)
        .execute(pool)
        .await?;
    Ok(done.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::scenario;

    #[tokio::test]
    async fn sqlite_roundtrip() {
        let pool = init_db("sqlite::memory:").await.unwrap();
        save_scenario(&pool, &scenario("zeta", 1)).await.unwrap();
        save_scenario(&pool, &scenario("alpha", 2)).await.unwrap();
        save_scenario(&pool, &scenario("alpha", 4)).await.unwrap();

        let list = list_scenarios(&pool).await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "alpha");
        assert_eq!(list[0].move_count, 4);
        assert_eq!(list[0].saved_at, scenario("alpha", 4).saved_at);

        let loaded = load_scenario(&pool, "alpha").await.unwrap().unwrap();
        assert_eq!(loaded, scenario("alpha", 4));
        assert!(load_scenario(&pool, "nope").await.unwrap().is_none());

        assert!(delete_scenario(&pool, "zeta").await.unwrap());
        assert!(!delete_scenario(&pool, "zeta").await.unwrap());
        assert_eq!(list_scenarios(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn sqlite_rejects_bad_names() {
        let pool = init_db("sqlite::memory:").await.unwrap();
        let err = save_scenario(&pool, &scenario("../x", 0)).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidName(_)));
        let err = load_scenario(&pool, "../x").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidName(_)));
        let err = delete_scenario(&pool, "").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidName(_)));
    }
}
