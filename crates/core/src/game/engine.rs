//! Turn driver: resolves one player action, then every other actor in a fixed order.
//! This module exists to own turn ordering, the win/lose check, and the per-turn snapshot.
//! It does not own individual action rules or enemy decisions.

use super::*;
use crate::mapgen::is_final_floor;


/// Upper bound on enemy-only cycles run back to back while the player is petrified.
pub(super) const MAX_PETRIFIED_CYCLES: u32 = 64;

impl Game {
    /// Attempts a player action. A refusal is logged and consumes no turn; anything else
    /// is followed by the enemy turn.
    pub fn perform(&mut self, action: &Action) -> Result<TurnOutcome, GameError> {
        if let Some(outcome) = self.state.outcome {
            return Ok(TurnOutcome::Finished(outcome));
        }
        let player_id = self.state.player_id;
        match self.perform_action(player_id, action) {
            Ok(performed) => trace!(?performed, turn = self.state.world.turn, "player acted"),
            Err(ActionError::Impossible(reason)) => {
                self.push_log(LogEvent::Impossible { reason: reason.clone() });
                return Ok(TurnOutcome::Rejected { reason });
            }
            Err(ActionError::UnorderedPickup { pos, items }) => {
                return Ok(TurnOutcome::NeedsPickupOrder { pos, items });
            }
            Err(ActionError::Invariant(err)) => return Err(err),
        }
        self.handle_enemy_turns()?;
        Ok(match self.state.outcome {
            Some(outcome) => TurnOutcome::Finished(outcome),
            None => TurnOutcome::Resolved { turn: self.state.world.turn },
        })
    }

    /// Everything after the player's action. While the player stays petrified the
    /// enemies keep taking turns on their own.
    pub fn handle_enemy_turns(&mut self) -> Result<(), GameError> {
        let mut cycles = 0;
        loop {
            self.resolve_turn()?;
            cycles += 1;
            let petrified = self.state.player().is_some_and(|p| p.is_alive() && p.is_petrified());
            if !petrified || self.state.outcome.is_some() {
                break;
            }
            if cycles >= MAX_PETRIFIED_CYCLES {
                warn!(cycles, "petrified loop cap reached");
                break;
            }
            debug!(turn = self.state.world.turn, "player petrified, enemies act again");
        }
        Ok(())
    }

    fn resolve_turn(&mut self) -> Result<(), GameError> {
        self.run_enemy_phase()?;
        self.player_post_turn();
        self.check_outcome();
        self.state.world.turn += 1;
        self.plan_visible_intents()?;
        self.push_snapshot();
        Ok(())
    }

    /// Pre-turn holds for everyone first, then each survivor acts in id order, then
    /// statuses tick down.
    fn run_enemy_phase(&mut self) -> Result<(), GameError> {
        let ids = self.state.non_player_ids();
        for id in &ids {
            self.enemy_pre_turn(*id)?;
        }
        let use_cache = self.state.intents_planned;
        self.state.intents_planned = false;
        for id in &ids {
            if !self.player_alive() {
                break;
            }
            self.run_enemy(*id, use_cache)?;
        }
        for id in ids {
            if self.state.actors.contains_key(id) {
                self.tick_statuses(id);
            }
        }
        Ok(())
    }

    fn player_post_turn(&mut self) {
        if self.player_alive() {
            self.tick_statuses(self.state.player_id);
        }
    }

    fn check_outcome(&mut self) {
        if self.state.outcome.is_some() {
            return;
        }
        if !self.player_alive() {
            self.state.outcome = Some(RunOutcome::Defeat);
            debug!(turn = self.state.world.turn, "run lost");
            return;
        }
        let boss_alive =
            self.state.actors.values().any(|actor| actor.is_boss && actor.is_alive());
        if is_final_floor(self.state.world.floor) && !boss_alive {
            self.state.outcome = Some(RunOutcome::Victory);
            self.push_log(LogEvent::Victory);
            debug!(turn = self.state.world.turn, "run won");
        }
    }

    /// In word mode the coming turn's intents are planned now so the player can see
    /// them; otherwise nothing is cached and enemies plan as they act.
    fn plan_visible_intents(&mut self) -> Result<(), GameError> {
        let ids = self.state.non_player_ids();
        if !self.state.word_mode || self.state.outcome.is_some() {
            for id in ids {
                self.actor_mut(id)?.intent.clear();
            }
            self.state.intents_planned = false;
            return Ok(());
        }
        for id in ids {
            let intents = self.plan_intent(id)?;
            self.actor_mut(id)?.intent = intents;
        }
        self.state.intents_planned = true;
        Ok(())
    }
}
