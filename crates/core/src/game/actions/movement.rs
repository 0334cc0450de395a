//! Single-step movement for any actor, plus the follow-ups a player move triggers.

use super::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct MovePlan {
    actor: EntityId,
    from: Pos,
    to: Pos,
    /// Crossing a wall on the strength of a phasing charge.
    phase: bool,
    pickups: Vec<ItemId>,
}

impl Game {
    pub(super) fn validate_move(
        &self,
        actor: EntityId,
        delta: Delta,
        pickup_order: Option<&[ItemId]>,
    ) -> ActionResult<MovePlan> {
        if !delta.is_step() {
            return Err(ActionError::impossible("That is not a direction."));
        }
        let acting = self.actor(actor)?;
        if acting.is_petrified() {
            return Err(ActionError::impossible("You are turned to stone."));
        }
        let from = acting.pos;
        let to = from.offset(delta);
        let map = &self.state.map;
        if !map.in_bounds(to) || self.state.is_blocked(to) {
            return Err(ActionError::impossible("That way is blocked."));
        }

        let mut phase = false;
        if acting.is_player() {
            if !map.is_snakeable(to) {
                let can_phase = acting.has_status(StatusKind::Phasing)
                    && map.tile_at(to) == TileKind::Wall
                    && !map.is_boundary(to);
                if !can_phase {
                    return Err(ActionError::impossible("That way is blocked."));
                }
                phase = true;
            }
        } else if !map.is_walkable(to) {
            return Err(ActionError::impossible("That way is blocked."));
        }

        let pickups =
            if acting.is_player() { self.pickup_plan(to, pickup_order)? } else { Vec::new() };
        Ok(MovePlan { actor, from, to, phase, pickups })
    }

    /// One loose item is swallowed automatically. Several need an explicit order that
    /// names each of them exactly once.
    fn pickup_plan(&self, pos: Pos, order: Option<&[ItemId]>) -> ActionResult<Vec<ItemId>> {
        let loose = self.state.loose_items_at(pos);
        if loose.len() <= 1 {
            return Ok(loose);
        }
        let Some(order) = order else {
            return Err(ActionError::UnorderedPickup { pos, items: loose });
        };
        let wanted: BTreeSet<ItemId> = loose.iter().copied().collect();
        let given: BTreeSet<ItemId> = order.iter().copied().collect();
        if order.len() != loose.len() || given != wanted {
            return Err(ActionError::UnorderedPickup { pos, items: loose });
        }
        Ok(order.to_vec())
    }

    pub(super) fn apply_move(&mut self, plan: MovePlan) -> Result<(), GameError> {
        let actor = self.actor_mut(plan.actor)?;
        actor.pos = plan.to;
        if plan.phase {
            actor.statuses.retain(|status| status.kind != StatusKind::Phasing);
            self.push_log(LogEvent::Phased);
        }
        if plan.actor != self.state.player_id {
            return Ok(());
        }

        self.propagate_body(0, plan.from)?;
        self.constrict_adjacent();
        if !plan.pickups.is_empty() {
            self.swallow(&plan.pickups)?;
        }
        self.refresh_word_mode();
        self.refresh_player_fov();
        Ok(())
    }

    /// Locks down every ordinary enemy touching the body. Bosses shrug it off and
    /// decoys are not alive enough to squeeze.
    pub(in crate::game) fn constrict_adjacent(&mut self) {
        let cells = self.state.body_cells();
        for id in self.state.non_player_ids() {
            let Some(actor) = self.state.actors.get_mut(id) else {
                continue;
            };
            if !actor.is_enemy() || actor.is_boss {
                continue;
            }
            if !cells.iter().any(|cell| cell.is_adjacent(actor.pos)) {
                continue;
            }
            let previous = match actor.ai.take() {
                Some(AiMode::Constricted { previous }) => {
                    actor.ai = Some(AiMode::Constricted { previous });
                    continue;
                }
                Some(mode) => mode,
                None => continue,
            };
            actor.ai = Some(AiMode::Constricted { previous: Box::new(previous) });
            actor.intent.clear();
            let name = actor.name.clone();
            self.push_log(LogEvent::Constricted { name });
        }
    }
}
