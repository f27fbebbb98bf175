#![deny(warnings)]

//! Headless CLI: load a roster file, replay its moves and print the current
//! cap snapshot and the multi-year projection.

use anyhow::{bail, Context, Result};
use cap_core::{validate_roster, MoveRecord, Player, PlayerId, ProjectionOptions, Team};
use cap_math::estimate_rookie_reserve_for_picks;
use cap_runtime::{CapSession, SessionView};
use persistence::{JsonDirScenarioStore, ScenarioStore};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_YEARS: usize = 5;
const DEFAULT_STORE: &str = "./saves/scenarios";

#[derive(Debug, Default)]
struct Args {
    input: Option<PathBuf>,
    config: Option<PathBuf>,
    years: Option<usize>,
    player: Option<String>,
    offset: Option<u32>,
    scenario: Option<String>,
    save: Option<String>,
    store: Option<PathBuf>,
    json: bool,
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--input" => args.input = it.next().map(PathBuf::from),
            "--config" => args.config = it.next().map(PathBuf::from),
            "--years" => args.years = it.next().and_then(|s| s.parse().ok()),
            "--player" => args.player = it.next(),
            "--offset" => args.offset = it.next().and_then(|s| s.parse().ok()),
            "--scenario" => args.scenario = it.next(),
            "--save" => args.save = it.next(),
            "--store" => args.store = it.next().map(PathBuf::from),
            "--json" => args.json = true,
            _ => {}
        }
    }
    args
}

/// Team baseline, roster and an optional list of moves to replay.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RosterFile {
    team: Team,
    players: Vec<Player>,
    #[serde(default)]
    moves: Vec<MoveRecord>,
}

/// Projection options plus draft picks per round (round 1 first).
#[derive(Debug, Default, Deserialize)]
struct CliConfig {
    #[serde(flatten)]
    projection: ProjectionOptions,
    #[serde(default)]
    draft_picks: Vec<u32>,
}

impl CliConfig {
    fn into_options(self) -> ProjectionOptions {
        let mut opts = self.projection;
        if !self.draft_picks.is_empty() {
            let reserve = estimate_rookie_reserve_for_picks(&self.draft_picks);
            if opts.rookie_reserve_by_year.len() < 2 {
                opts.rookie_reserve_by_year.resize(2, rust_decimal::Decimal::ZERO);
            }
            opts.rookie_reserve_by_year[1] = reserve;
            info!(picks = ?self.draft_picks, %reserve, "rookie reserve from draft picks");
        }
        opts
    }
}

fn load_roster(path: &Path) -> Result<RosterFile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading roster file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing roster file {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<ProjectionOptions> {
    let Some(path) = path else {
        return Ok(ProjectionOptions::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: CliConfig = serde_yaml::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg.into_options())
}

fn print_view(team: &str, view: &SessionView) {
    let s = &view.snapshot;
    println!(
        "{} | room: ${} | spent: ${} | available: ${} ({:+}) | dead: ${}",
        team, s.cap_room, s.cap_spent, s.cap_available, s.delta_available, s.dead_money
    );
    println!(
        "{:>4} {:>14} {:>14} {:>12} {:>14} {:>14}",
        "Y+", "cap room", "roster", "dead", "spent", "space"
    );
    for y in &view.projection {
        println!(
            "{:>4} {:>14} {:>14} {:>12} {:>14} {:>14}",
            y.year_offset, y.cap_room, y.roster_cap, y.dead_money, y.total_spent, y.cap_space
        );
    }
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args();
    let Some(input) = args.input.as_deref() else {
        bail!("usage: cli --input roster.json [--config cfg.yaml] [--years N] [--player ID --offset N] [--scenario NAME] [--save NAME] [--store DIR] [--json]");
    };
    info!(input = %input.display(), years = ?args.years, "starting CLI");

    let roster = load_roster(input)?;
    for finding in validate_roster(&roster.team, &roster.players) {
        warn!(%finding, "roster validation");
    }
    let options = load_config(args.config.as_deref())?;
    let horizon = args.years.unwrap_or(DEFAULT_YEARS);
    let store_dir = args
        .store
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE));
    let mut store = JsonDirScenarioStore::new(&store_dir);

    let mut session = match args.scenario.as_deref() {
        Some(name) => {
            let scenario = store
                .load(name)?
                .with_context(|| format!("no scenario named {name:?} in {}", store_dir.display()))?;
            CapSession::from_scenario(roster.team, roster.players, scenario, horizon, options)
        }
        None => CapSession::new(roster.team, roster.players, horizon, options),
    };
    for record in roster.moves {
        session.commit(record.action, record.at);
    }

    let view = session.view();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_view(&session.team().abbr_name, &view);
    }

    if let Some(id) = args.player.as_deref() {
        let offset = args.offset.unwrap_or(1);
        match session.contextualize(&PlayerId::from(id), offset) {
            Some(ctx) => println!(
                "{} @ Y+{}{} | years left: {} | cap hit: ${} | base: ${} | bonus/yr: ${} ({} left) | cut now: ${} + ${} next year",
                ctx.player.name,
                ctx.year_offset,
                ctx.season.map(|s| format!(" ({s})")).unwrap_or_default(),
                ctx.player.contract_years_left,
                ctx.player.cap_hit,
                ctx.approx_base,
                ctx.bonus_per_year,
                ctx.remaining_proration,
                ctx.penalty_current_year,
                ctx.penalty_next_year
            ),
            None => warn!(player = id, "player not found"),
        }
    }

    if let Some(name) = args.save.as_deref() {
        let scenario = session.to_scenario(name, chrono::Utc::now());
        store.save(&scenario)?;
        println!("Saved scenario {:?} ({} moves)", name, scenario.moves.len());
    }

    Ok(())
}
