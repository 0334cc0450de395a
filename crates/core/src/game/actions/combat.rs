//! Melee resolution, damage, and death.

use super::*;
use crate::content::{Rarity, VOWELS};
use crate::game::body::BodyHit;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum MeleeTarget {
    Actor(EntityId),
    Body(BodyHit),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct MeleePlan {
    attacker: EntityId,
    target: MeleeTarget,
    damage: i32,
}

impl Game {
    pub(super) fn validate_melee(
        &self,
        attacker: EntityId,
        delta: Delta,
        damage: i32,
    ) -> ActionResult<MeleePlan> {
        if !delta.is_step() {
            return Err(ActionError::impossible("That is not a direction."));
        }
        if damage <= 0 {
            return Err(ActionError::impossible("That blow would not hurt."));
        }
        let acting = self.actor(attacker)?;
        if acting.is_petrified() {
            return Err(ActionError::impossible("You are turned to stone."));
        }
        let dest = acting.pos.offset(delta);
        let occupant = self.state.actor_at(dest);
        let segment = self.state.solid_segment_at(dest);

        let target = if acting.is_player() {
            if segment.is_some() {
                return Err(ActionError::impossible("You would bite your own body."));
            }
            occupant.map(MeleeTarget::Actor)
        } else if occupant == Some(self.state.player_id) {
            Some(MeleeTarget::Body(BodyHit::Head))
        } else if let Some(segment) = segment {
            Some(MeleeTarget::Body(BodyHit::Segment(segment)))
        } else {
            occupant.map(MeleeTarget::Actor)
        };

        match target {
            Some(target) => Ok(MeleePlan { attacker, target, damage }),
            None => Err(ActionError::impossible("There is nothing there to attack.")),
        }
    }

    pub(super) fn apply_melee(&mut self, plan: MeleePlan) -> Result<(), GameError> {
        match plan.target {
            MeleeTarget::Body(hit) => {
                self.wound_player(plan.attacker, hit)?;
            }
            MeleeTarget::Actor(victim) => {
                if plan.attacker == self.state.player_id {
                    let target = self.actor_name(victim);
                    self.push_log(LogEvent::PlayerBit { target, damage: plan.damage });
                }
                self.damage_actor(victim, plan.damage)?;
            }
        }
        Ok(())
    }

    /// Subtracts from the displayed health. Returns true when the blow was fatal.
    pub(in crate::game) fn damage_actor(&mut self, victim: EntityId, amount: i32) -> Result<bool, GameError> {
        let actor = self.actor_mut(victim)?;
        actor.health.current -= amount;
        if actor.health.is_dead() {
            self.kill_actor(victim)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Removes a dead actor from the floor; ordinary enemies leave a letter behind.
    pub(in crate::game) fn kill_actor(&mut self, victim: EntityId) -> Result<(), GameError> {
        if victim == self.state.player_id {
            let player = self.actor_mut(victim)?;
            player.ai = None;
            self.push_log(LogEvent::PlayerDied);
            return Ok(());
        }
        let actor = self.state.actors.remove(victim).ok_or(GameError::MissingActor)?;
        debug!(name = %actor.name, pos = ?actor.pos, "actor killed");
        if actor.is_enemy() {
            self.push_log(LogEvent::Killed { name: actor.name.clone() });
        }
        if actor.is_enemy() && !actor.is_boss {
            let letter = self.roll_corpse_letter(actor.drop_tier);
            let id = self.state.items.insert(Item::loose(letter, actor.pos));
            self.state.items[id].id = id;
        }
        Ok(())
    }

    /// Tier 0 drops a vowel; higher tiers drop a consonant of the matching rarity.
    pub(in crate::game) fn roll_corpse_letter(&mut self, drop_tier: u8) -> char {
        let pool = match Rarity::from_drop_tier(drop_tier) {
            Some(rarity) => self.state.world.identities.letters_of_rarity(rarity),
            None => Vec::new(),
        };
        if pool.is_empty() {
            return random_vowel(&mut self.state.rng);
        }
        pool[self.state.rng.below(pool.len())]
    }
}

pub(in crate::game) fn random_vowel(rng: &mut RunRng) -> char {
    VOWELS[rng.below(VOWELS.len())]
}
