//! Observable cap session.

use crate::roster::{apply_move, replay};
use cap_core::{
    CapSnapshot, MoveRecord, Player, PlayerId, ProjectionOptions, Scenario, ScenarioMove, Team,
    YearProjection,
};
use cap_math::{calc_cap_summary, contextualize_player, project_team_caps, YearContext};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

/// Everything the presentation layer renders after a change.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub snapshot: CapSnapshot,
    pub projection: Vec<YearProjection>,
}

/// Handle returned by [`CapSession::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

pub type Observer = Box<dyn FnMut(&SessionView)>;

/// Baseline roster plus user edits and committed moves for one team.
pub struct CapSession {
    team: Team,
    baseline: Vec<Player>,
    roster_edits: Vec<Player>,
    moves: Vec<MoveRecord>,
    players: Vec<Player>,
    horizon: usize,
    options: ProjectionOptions,
    observers: Vec<(ObserverId, Observer)>,
    next_observer: u64,
}

impl CapSession {
    pub fn new(team: Team, players: Vec<Player>, horizon: usize, options: ProjectionOptions) -> Self {
        Self {
            team,
            players: players.clone(),
            baseline: players,
            roster_edits: vec![],
            moves: vec![],
            horizon,
            options,
            observers: vec![],
            next_observer: 0,
        }
    }

    /// Restore a saved scenario on top of a freshly loaded baseline.
    pub fn from_scenario(
        team: Team,
        baseline: Vec<Player>,
        scenario: Scenario,
        horizon: usize,
        options: ProjectionOptions,
    ) -> Self {
        if scenario.team != team.abbr_name {
            debug!(scenario = %scenario.name, saved_for = %scenario.team, team = %team.abbr_name, "scenario built for another team");
        }
        let players = replay(&team, &baseline, &scenario.roster_edits, &scenario.moves);
        info!(scenario = %scenario.name, moves = scenario.moves.len(), "scenario restored");
        Self {
            team,
            baseline,
            roster_edits: scenario.roster_edits,
            moves: scenario.moves,
            players,
            horizon,
            options,
            observers: vec![],
            next_observer: 0,
        }
    }

    pub fn to_scenario(&self, name: &str, saved_at: DateTime<Utc>) -> Scenario {
        Scenario {
            name: name.to_string(),
            team: self.team.abbr_name.clone(),
            saved_at,
            roster_edits: self.roster_edits.clone(),
            moves: self.moves.clone(),
        }
    }

    pub fn team(&self) -> &Team {
        &self.team
    }

    /// Live roster with every committed move applied.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn options(&self) -> &ProjectionOptions {
        &self.options
    }

    fn actions(&self) -> Vec<ScenarioMove> {
        self.moves.iter().map(|r| r.action.clone()).collect()
    }

    fn compute(&self, players: &[Player], actions: &[ScenarioMove]) -> SessionView {
        SessionView {
            snapshot: calc_cap_summary(&self.team, actions),
            projection: project_team_caps(&self.team, players, actions, self.horizon, &self.options),
        }
    }

    /// Current snapshot and projection.
    pub fn view(&self) -> SessionView {
        self.compute(&self.players, &self.actions())
    }

    /// The view the session would hold after committing `action`.
    pub fn preview(&self, action: &ScenarioMove) -> SessionView {
        let mut players = self.players.clone();
        apply_move(&self.team, &mut players, action);
        let mut actions = self.actions();
        actions.push(action.clone());
        self.compute(&players, &actions)
    }

    /// Append a move, apply its roster edit and notify observers. The returned
    /// view equals [`CapSession::preview`] of the same move.
    pub fn commit(&mut self, action: ScenarioMove, at: DateTime<Utc>) -> SessionView {
        apply_move(&self.team, &mut self.players, &action);
        info!(player = %action.player_id(), kind = action.kind(), "move committed");
        self.moves.push(MoveRecord { at, action });
        self.publish()
    }

    /// Drop the most recent move and rebuild the roster from the baseline.
    pub fn undo_last(&mut self) -> Option<MoveRecord> {
        let undone = self.moves.pop()?;
        info!(player = %undone.action.player_id(), kind = undone.action.kind(), "move undone");
        self.rebuild();
        Some(undone)
    }

    pub fn clear_moves(&mut self) {
        if self.moves.is_empty() {
            return;
        }
        info!(moves = self.moves.len(), "moves cleared");
        self.moves.clear();
        self.rebuild();
    }

    /// Record a user edit of a player record; it replaces the loaded record
    /// with the same id (or adds the player) before moves are replayed.
    pub fn edit_player(&mut self, player: Player) {
        debug!(player = %player.id, "roster edit");
        match self.roster_edits.iter_mut().find(|p| p.id == player.id) {
            Some(slot) => *slot = player,
            None => self.roster_edits.push(player),
        }
        self.rebuild();
    }

    pub fn set_options(&mut self, options: ProjectionOptions) {
        self.options = options;
        self.publish();
    }

    pub fn set_horizon(&mut self, horizon: usize) {
        self.horizon = horizon;
        self.publish();
    }

    /// Preview a live player `offset` seasons out.
    pub fn contextualize(&self, id: &PlayerId, offset: u32) -> Option<YearContext> {
        self.player(id)
            .map(|p| contextualize_player(p, &self.team, offset))
    }

    pub fn subscribe(&mut self, observer: Observer) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, observer));
        id
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    fn rebuild(&mut self) {
        self.players = replay(&self.team, &self.baseline, &self.roster_edits, &self.moves);
        self.publish();
    }

    fn publish(&mut self) -> SessionView {
        let view = self.view();
        for (_, observer) in self.observers.iter_mut() {
            observer(&view);
        }
        view
    }
}
