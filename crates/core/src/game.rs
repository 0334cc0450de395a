//! Simulation root: owns the live `GameState`, the event log, and the rewind history.
//! This module exists to compose the focused `impl Game` submodules into one turn engine.
//! It does not own floor generation or journal persistence.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

use slotmap::SlotMap;
use tracing::{debug, trace, warn};

use crate::config::GameConfig;
use crate::content::{self, EdibleEffect, SpitEffect};
use crate::dictionary::Dictionary;
use crate::error::{ActionError, ActionResult, GameError};
use crate::identity::generate_item_identities;
use crate::mapgen::{self, GeneratedFloor, RunRng, STARTING_FLOOR_INDEX};
use crate::state::*;
use crate::tiles::TileKind;
use crate::types::*;

mod actions;
mod ai;
mod body;
mod engine;
mod floor_transition;
mod hash;
mod history;
mod pathfinding;
mod status;
mod view;
mod visibility;

#[cfg(test)]
mod test_support;

pub use actions::{Action, Performed};
pub use history::Snapshot;
pub use view::LookInfo;

pub struct Game {
    config: GameConfig,
    state: GameState,
    log: Vec<LoggedEvent>,
    history: VecDeque<Snapshot>,
    dictionary: Box<dyn Dictionary>,
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("seed", &self.state.world.seed)
            .field("floor", &self.state.world.floor)
            .field("turn", &self.state.world.turn)
            .field("log_len", &self.log.len())
            .finish_non_exhaustive()
    }
}

impl Game {
    /// Starts a run on the first floor. Item identities are drawn once per run.
    pub fn new(
        seed: u64,
        config: GameConfig,
        dictionary: Box<dyn Dictionary>,
    ) -> Result<Self, GameError> {
        let identities = generate_item_identities(seed);
        let floor = mapgen::generate_floor(seed, STARTING_FLOOR_INDEX, &config, &identities)?;
        let world = World {
            seed,
            floor: STARTING_FLOOR_INDEX,
            difficulty: config.difficulty,
            identities,
            turn: 0,
        };
        let mut actors = SlotMap::with_key();
        let player_id = actors.insert(Actor::player(floor.start));
        actors[player_id].id = player_id;
        let state = GameState {
            world,
            map: Map::new(floor.width, floor.height),
            actors,
            items: SlotMap::with_key(),
            player_id,
            stairs: None,
            word_mode: false,
            intents_planned: false,
            outcome: None,
            rng: RunRng::new(seed),
        };

        let mut game = Self::from_state(config, state, dictionary);
        game.install_floor(&floor)?;
        game.history.clear();
        game.push_snapshot();
        debug!(seed, floor = STARTING_FLOOR_INDEX, "run started");
        Ok(game)
    }

    /// Wraps an existing state, e.g. a hand-built scenario or a restored save.
    pub fn from_state(config: GameConfig, state: GameState, dictionary: Box<dyn Dictionary>) -> Self {
        let mut game =
            Self { config, state, log: Vec::new(), history: VecDeque::new(), dictionary };
        game.refresh_player_fov();
        game.state.word_mode = game.body_spells_word();
        game.push_snapshot();
        game
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn log(&self) -> &[LoggedEvent] {
        &self.log
    }

    pub fn turn(&self) -> u64 {
        self.state.world.turn
    }

    pub fn seed(&self) -> u64 {
        self.state.world.seed
    }

    pub fn outcome(&self) -> Option<RunOutcome> {
        self.state.outcome
    }

    pub fn is_word_mode(&self) -> bool {
        self.state.word_mode
    }

    fn push_log(&mut self, event: LogEvent) {
        trace!(turn = self.state.world.turn, %event, "log");
        self.log.push(LoggedEvent { turn: self.state.world.turn, event });
    }

    fn actor(&self, id: EntityId) -> Result<&Actor, GameError> {
        self.state.actors.get(id).ok_or(GameError::MissingActor)
    }

    fn actor_mut(&mut self, id: EntityId) -> Result<&mut Actor, GameError> {
        self.state.actors.get_mut(id).ok_or(GameError::MissingActor)
    }

    fn item(&self, id: ItemId) -> Result<&Item, GameError> {
        self.state.items.get(id).ok_or(GameError::MissingItem)
    }

    fn player_alive(&self) -> bool {
        self.state.player().is_some_and(Actor::is_alive)
    }

    fn actor_name(&self, id: EntityId) -> String {
        self.state.actors.get(id).map(|actor| actor.name.clone()).unwrap_or_default()
    }

    /// Base stats plus active boosts; the player also gains one point per identified
    /// consonant in the body while it spells a word.
    pub fn effective_stats(&self, id: EntityId) -> Stats {
        let Some(actor) = self.state.actors.get(id) else {
            return Stats::default();
        };
        let mut stats = actor.base_stats;
        for status in &actor.statuses {
            if let StatusKind::Boost(stat) = status.kind {
                stats.add(stat, BOOST_AMOUNT);
            }
        }
        if actor.is_player() && self.state.word_mode {
            for letter in self.attached_letters() {
                if !self.state.world.identities.is_identified(letter) {
                    continue;
                }
                if let Ok(Some(template)) = self.state.world.identities.template(letter) {
                    stats.add(template.affinity, 1);
                }
            }
        }
        stats
    }
}

/// Flat bonus a `Boost` status grants to its stat.
pub const BOOST_AMOUNT: i32 = 2;
