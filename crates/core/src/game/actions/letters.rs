//! Digesting and spitting body letters. Both reveal the letter's identity for the run.

use super::combat::random_vowel;
use super::*;
use crate::content::{BASE_SPIT_RANGE, CONFUSION_TURNS, VOWEL_SPIT};
use crate::game::pathfinding::{PathOptions, find_path};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct DigestPlan {
    item: ItemId,
    letter: char,
    effect: EdibleEffect,
    affinity: Option<Stat>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct SpitPlan {
    item: ItemId,
    letter: char,
    target: Pos,
    victim: Option<EntityId>,
    effect: SpitEffect,
}

impl Game {
    fn validate_body_letter(&self, actor: EntityId, item: ItemId) -> ActionResult<char> {
        let acting = self.actor(actor)?;
        if !acting.is_player() {
            return Err(ActionError::impossible("Only the basilisk carries letters."));
        }
        if acting.is_petrified() {
            return Err(ActionError::impossible("You are turned to stone."));
        }
        if !self.attached_segments().contains(&item) {
            return Err(ActionError::impossible("That is not part of you."));
        }
        Ok(self.item(item)?.letter)
    }

    pub(super) fn validate_digest(&self, actor: EntityId, item: ItemId) -> ActionResult<DigestPlan> {
        let letter = self.validate_body_letter(actor, item)?;
        let template = self.state.world.identities.template(letter)?;
        Ok(DigestPlan {
            item,
            letter,
            effect: template.map_or(EdibleEffect::Flavour, |t| t.edible),
            affinity: template.map(|t| t.affinity),
        })
    }

    pub(super) fn apply_digest(&mut self, plan: DigestPlan) -> Result<(), GameError> {
        self.take_segment(plan.item)?;
        self.state.items.remove(plan.item);
        let name = self.identify_letter(plan.letter)?;
        self.push_log(LogEvent::Digested { letter: plan.letter, name });
        self.apply_edible(plan.effect, plan.affinity)?;
        self.refresh_word_mode();
        Ok(())
    }

    pub(super) fn validate_spit(
        &self,
        actor: EntityId,
        item: ItemId,
        target: Pos,
    ) -> ActionResult<SpitPlan> {
        let letter = self.validate_body_letter(actor, item)?;
        if self.attached_segments().first() != Some(&item) {
            return Err(ActionError::impossible("Only the letter behind your head can be spat."));
        }
        let head = self.actor(actor)?.pos;
        if target == head || self.state.solid_segment_at(target).is_some() {
            return Err(ActionError::impossible("You cannot spit at yourself."));
        }
        let map = &self.state.map;
        if !map.is_visible(target) {
            return Err(ActionError::impossible("You cannot see there."));
        }
        if !map.is_walkable(target) {
            return Err(ActionError::impossible("There is no room there."));
        }
        let range = (BASE_SPIT_RANGE + self.effective_stats(actor).tong).max(1) as usize;
        let options = PathOptions { ignore_walls: true, ..PathOptions::default() };
        let reach = find_path(map, &BTreeSet::new(), head, target, options)
            .map_or(usize::MAX, |path| path.steps.len());
        if reach > range {
            return Err(ActionError::impossible("That is out of range."));
        }

        let effect = self.state.world.identities.template(letter)?.map_or(VOWEL_SPIT, |t| t.spit);
        let victim = self.state.actor_at(target);
        let needs_victim =
            matches!(effect, SpitEffect::Petrify | SpitEffect::Confuse | SpitEffect::PhaseOut);
        if needs_victim && victim.is_none() {
            return Err(ActionError::impossible("There is nothing there to hit."));
        }
        if effect == SpitEffect::Decoy && victim.is_some() {
            return Err(ActionError::impossible("There is no room there."));
        }
        Ok(SpitPlan { item, letter, target, victim, effect })
    }

    pub(super) fn apply_spit(&mut self, plan: SpitPlan) -> Result<(), GameError> {
        let player_id = self.state.player_id;
        self.take_segment(plan.item)?;
        if plan.effect.lands() {
            if let Some(item) = self.state.items.get_mut(plan.item) {
                item.pos = plan.target;
            }
        } else {
            self.state.items.remove(plan.item);
        }
        let name = self.identify_letter(plan.letter)?;
        self.push_log(LogEvent::Spat { letter: plan.letter, name });

        let bile = self.effective_stats(player_id).bile;
        match (plan.effect, plan.victim) {
            (SpitEffect::Splat { damage } | SpitEffect::Acid { damage }, Some(victim)) => {
                self.damage_actor(victim, damage + bile)?;
            }
            (SpitEffect::Petrify, Some(victim)) => {
                let duration = self.status_duration_from(player_id, StatusKind::Petrified, victim);
                self.apply_status(victim, StatusKind::Petrified, duration);
            }
            (SpitEffect::PhaseOut, Some(victim)) => {
                let duration = self.status_duration_from(player_id, StatusKind::PhasedOut, victim);
                self.apply_status(victim, StatusKind::PhasedOut, duration);
                if let Some(actor) = self.state.actors.get_mut(victim) {
                    actor.intent.clear();
                }
            }
            (SpitEffect::Confuse, Some(victim)) => {
                let turns = self.confusion_turns(player_id);
                self.confuse(victim, turns);
            }
            (SpitEffect::Decoy, _) => {
                let id = self.state.actors.insert(Actor::decoy(plan.target));
                self.state.actors[id].id = id;
                let duration = self.status_duration_from(player_id, StatusKind::Ephemeral, id);
                self.apply_status(id, StatusKind::Ephemeral, duration);
            }
            _ => {}
        }
        self.refresh_word_mode();
        Ok(())
    }

    /// Reveals the letter and returns its display name.
    fn identify_letter(&mut self, letter: char) -> Result<String, GameError> {
        let newly = self.state.world.identities.identify(letter)?;
        let name = self.state.world.identities.display_name(letter)?;
        if newly {
            self.push_log(LogEvent::Identified { letter, name: name.clone() });
        }
        Ok(name)
    }

    fn apply_edible(&mut self, effect: EdibleEffect, affinity: Option<Stat>) -> Result<(), GameError> {
        let player_id = self.state.player_id;
        match effect {
            EdibleEffect::Flavour => {}
            EdibleEffect::Nourish => {
                if let Some(stat) = affinity {
                    self.actor_mut(player_id)?.base_stats.add(stat, 1);
                }
            }
            EdibleEffect::Phase => {
                let duration = self.status_duration_from(player_id, StatusKind::Phasing, player_id);
                self.apply_status(player_id, StatusKind::Phasing, duration);
            }
            EdibleEffect::Boost(stat) => {
                let kind = StatusKind::Boost(stat);
                let duration = self.status_duration_from(player_id, kind, player_id);
                self.strengthen_status(player_id, kind, duration);
            }
            EdibleEffect::Clairvoyance => {
                let cells: Vec<Pos> = self
                    .state
                    .map
                    .positions()
                    .filter(|pos| self.state.map.tile_at(*pos) != TileKind::Wall)
                    .collect();
                for pos in cells {
                    self.state.map.set_mapped(pos);
                }
            }
            EdibleEffect::PetrifySelf => {
                let duration = self.status_duration_from(player_id, StatusKind::Petrified, player_id);
                self.apply_status(player_id, StatusKind::Petrified, duration);
            }
            EdibleEffect::Regrow => {
                let vowel = random_vowel(&mut self.state.rng);
                self.grow_tail(vowel)?;
            }
            EdibleEffect::IdentifyBody => {
                for letter in self.attached_letters() {
                    self.identify_letter(letter)?;
                }
            }
            EdibleEffect::ConfuseAdjacent => {
                let head = self.actor(player_id)?.pos;
                let turns = self.confusion_turns(player_id);
                for id in self.adjacent_enemies(&[head]) {
                    self.confuse(id, turns);
                }
            }
            EdibleEffect::Shatter => {
                let cells = self.state.body_cells();
                for id in self.adjacent_enemies(&cells) {
                    self.damage_actor(id, 1)?;
                }
            }
        }
        Ok(())
    }

    fn adjacent_enemies(&self, cells: &[Pos]) -> Vec<EntityId> {
        self.state
            .non_player_ids()
            .into_iter()
            .filter(|id| {
                self.state.actors.get(*id).is_some_and(|actor| {
                    actor.is_enemy() && cells.iter().any(|cell| cell.is_adjacent(actor.pos))
                })
            })
            .collect()
    }

    fn confusion_turns(&self, caster: EntityId) -> u32 {
        (CONFUSION_TURNS + self.effective_stats(caster).mind).max(1) as u32
    }

    /// Overrides the actor's mode with a random walk; an existing confusion keeps the
    /// longer countdown.
    pub(in crate::game) fn confuse(&mut self, target: EntityId, turns: u32) {
        let Some(actor) = self.state.actors.get_mut(target) else {
            return;
        };
        if !actor.is_enemy() {
            return;
        }
        actor.ai = match actor.ai.take() {
            Some(AiMode::Confused { turns: remaining, previous }) => {
                Some(AiMode::Confused { turns: remaining.max(turns), previous })
            }
            Some(mode) => Some(AiMode::Confused { turns, previous: Box::new(mode) }),
            None => None,
        };
        actor.intent.clear();
        let name = actor.name.clone();
        trace!(%name, turns, "confused");
    }
}
