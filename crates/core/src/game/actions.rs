//! Actions any actor can attempt, and the validate-then-apply dispatch behind them.
//! Every action is checked against the current state first; a refusal leaves the state
//! untouched. This module does not own turn ordering or AI decisions.

use serde::{Deserialize, Serialize};

use super::*;

mod combat;
mod letters;
mod movement;
mod stairs;


#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Wait,
    /// Move, or attack whatever stands in the way.
    Bump { delta: Delta },
    /// `pickup_order` lists loose items in the order they are swallowed.
    Move { delta: Delta, pickup_order: Option<Vec<ItemId>> },
    Melee { delta: Delta, damage: i32 },
    Digest { item: ItemId },
    Spit { item: ItemId, target: Pos },
    TakeStairs,
}

/// What an accepted action turned into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Performed {
    Waited,
    Moved,
    Attacked,
    Digested,
    Spat,
    Descended,
}

pub(super) const BITE_DAMAGE: i32 = 1;

impl Game {
    pub(super) fn perform_action(&mut self, actor: EntityId, action: &Action) -> ActionResult<Performed> {
        let acting = self.actor(actor)?;
        if !acting.is_alive() {
            return Err(ActionError::impossible("The dead cannot act."));
        }
        match action {
            Action::Wait => Ok(Performed::Waited),
            Action::Bump { delta } => self.bump(actor, *delta),
            Action::Move { delta, pickup_order } => {
                let plan = self.validate_move(actor, *delta, pickup_order.as_deref())?;
                self.apply_move(plan)?;
                Ok(Performed::Moved)
            }
            Action::Melee { delta, damage } => {
                let plan = self.validate_melee(actor, *delta, *damage)?;
                self.apply_melee(plan)?;
                Ok(Performed::Attacked)
            }
            Action::Digest { item } => {
                let plan = self.validate_digest(actor, *item)?;
                self.apply_digest(plan)?;
                Ok(Performed::Digested)
            }
            Action::Spit { item, target } => {
                let plan = self.validate_spit(actor, *item, *target)?;
                self.apply_spit(plan)?;
                Ok(Performed::Spat)
            }
            Action::TakeStairs => {
                self.validate_stairs(actor)?;
                self.descend()?;
                Ok(Performed::Descended)
            }
        }
    }

    /// Bump resolves to an attack when something hostile is in the way, else to a move.
    fn bump(&mut self, actor: EntityId, delta: Delta) -> ActionResult<Performed> {
        if !delta.is_step() {
            return Err(ActionError::impossible("That is not a direction."));
        }
        let acting = self.actor(actor)?;
        let dest = acting.pos.offset(delta);
        let is_player = acting.is_player();
        let own_segment = self.state.solid_segment_at(dest).is_some();
        let occupant = self.state.actor_at(dest);

        let attack = if is_player {
            if own_segment {
                return Err(ActionError::impossible("You would bite your own body."));
            }
            occupant.is_some()
        } else {
            occupant == Some(self.state.player_id) || own_segment
        };

        if attack {
            let plan = self.validate_melee(actor, delta, BITE_DAMAGE)?;
            self.apply_melee(plan)?;
            Ok(Performed::Attacked)
        } else {
            let plan = self.validate_move(actor, delta, None)?;
            self.apply_move(plan)?;
            Ok(Performed::Moved)
        }
    }
}
