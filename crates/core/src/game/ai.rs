//! Enemy decision making: target selection, intent planning, and intent execution.
//! This module exists to keep every non-player decision in one place, including the
//! constriction hold that runs before an enemy acts. It does not own turn ordering.

use super::*;
use crate::game::pathfinding::{PathOptions, find_path};
use crate::game::visibility::field_of_view;

impl Game {
    /// Cells held by blockers other than `except`; paths through them pay the crowd penalty.
    pub(super) fn crowded_cells(&self, except: EntityId) -> BTreeSet<Pos> {
        let mut cells: BTreeSet<Pos> = self
            .state
            .actors
            .iter()
            .filter(|(id, actor)| *id != except && actor.blocks && actor.is_alive())
            .map(|(_, actor)| actor.pos)
            .collect();
        cells.extend(self.state.items.values().filter(|item| item.blocks()).map(|item| item.pos));
        cells
    }

    fn path_options(&self) -> PathOptions {
        PathOptions { ignore_walls: false, crowd_penalty: self.config.crowd_penalty }
    }

    /// Chooses where a hostile actor is heading: a visible decoy first, then the body cell
    /// with the cheapest path, then the last place it saw one.
    pub(super) fn pick_target(&mut self, id: EntityId) -> Result<Option<Pos>, GameError> {
        let actor = self.actor(id)?;
        let origin = actor.pos;
        let Some(AiMode::Hostile { awake, last_target }) = actor.ai.clone() else {
            return Ok(None);
        };
        let sight = field_of_view(&self.state.map, origin, self.config.fov_radius);

        let decoy = self
            .state
            .non_player_ids()
            .into_iter()
            .filter_map(|other| self.state.actors.get(other))
            .filter(|other| other.kind == ActorKind::Decoy && sight.contains(other.pos))
            .map(|other| other.pos)
            .min_by_key(|pos| origin.chebyshev(*pos));

        let seen = decoy.or_else(|| {
            if !self.player_alive() {
                return None;
            }
            let crowded = self.crowded_cells(id);
            let options = self.path_options();
            let mut best: Option<(u32, Pos)> = None;
            for cell in self.state.body_cells() {
                if !sight.contains(cell) {
                    continue;
                }
                let Some(path) = find_path(&self.state.map, &crowded, origin, cell, options) else {
                    continue;
                };
                if best.is_none_or(|(cost, _)| path.cost < cost) {
                    best = Some((path.cost, cell));
                }
            }
            best.map(|(_, cell)| cell)
        });

        let (target, remembered) = match (seen, last_target) {
            (Some(pos), _) => (Some(pos), Some(pos)),
            (None, Some(pos)) if pos == origin => (None, None),
            (None, remembered) => (remembered, remembered),
        };
        let now_awake = awake || seen.is_some();
        if now_awake && !awake {
            let name = self.actor_name(id);
            self.push_log(LogEvent::Spotted { name });
        }
        self.actor_mut(id)?.ai = Some(AiMode::Hostile { awake: now_awake, last_target: remembered });
        Ok(target)
    }

    /// Builds the actor's queue for the coming turn without executing any of it.
    pub(super) fn plan_intent(&mut self, id: EntityId) -> Result<Vec<Intent>, GameError> {
        let actor = self.actor(id)?;
        if actor.is_petrified() || actor.has_status(StatusKind::PhasedOut) {
            return Ok(Vec::new());
        }
        let hunting = matches!(actor.ai, Some(AiMode::Hostile { .. }));
        let confused = matches!(actor.ai, Some(AiMode::Confused { .. }));
        if hunting {
            self.plan_hunt(id)
        } else if confused {
            let delta = Delta::ALL[self.state.rng.below(Delta::ALL.len())];
            Ok(vec![Intent::Step { delta }])
        } else {
            Ok(Vec::new())
        }
    }

    fn plan_hunt(&mut self, id: EntityId) -> Result<Vec<Intent>, GameError> {
        let Some(target) = self.pick_target(id)? else {
            return Ok(Vec::new());
        };
        let actor = self.actor(id)?;
        let from = actor.pos;
        if from.is_adjacent(target) {
            let delta = from.delta_to(target);
            return Ok(vec![if self.state.is_blocked(target) {
                Intent::Attack { delta }
            } else {
                Intent::Step { delta }
            }]);
        }
        let crowded = self.crowded_cells(id);
        let Some(path) = find_path(&self.state.map, &crowded, from, target, self.path_options())
        else {
            return Ok(Vec::new());
        };

        let mut intents = Vec::new();
        let mut cursor = from;
        for next in path.steps.into_iter().take(actor.move_speed as usize) {
            let delta = cursor.delta_to(next);
            if next == target && self.state.is_blocked(next) {
                intents.push(Intent::Attack { delta });
                break;
            }
            if next != target && !self.state.map.is_walkable(next) {
                break;
            }
            intents.push(Intent::Step { delta });
            cursor = next;
        }
        Ok(intents)
    }

    /// Runs one enemy's turn. With `use_cache` the actor executes the intent the player
    /// was shown; otherwise it plans fresh. Any refusal or melee ends the queue.
    pub(super) fn run_enemy(&mut self, id: EntityId, use_cache: bool) -> Result<(), GameError> {
        let Some(actor) = self.state.actors.get_mut(id) else {
            return Ok(());
        };
        let locked = actor.is_petrified()
            || actor.has_status(StatusKind::PhasedOut)
            || matches!(actor.ai, Some(AiMode::Constricted { .. } | AiMode::Statue) | None);
        if locked {
            actor.intent.clear();
            return Ok(());
        }
        let intents = if use_cache { actor.intent.clone() } else { self.plan_intent(id)? };

        for intent in intents {
            if !self.player_alive() {
                break;
            }
            match self.perform_action(id, &Action::Bump { delta: intent.delta() }) {
                Ok(Performed::Attacked) => break,
                Ok(_) => {}
                Err(ActionError::Impossible(reason)) => {
                    trace!(?id, %reason, "intent aborted");
                    break;
                }
                Err(ActionError::UnorderedPickup { .. }) => break,
                Err(ActionError::Invariant(err)) => return Err(err),
            }
        }

        self.count_down_confusion(id);
        if let Some(actor) = self.state.actors.get_mut(id) {
            actor.intent.clear();
        }
        Ok(())
    }

    fn count_down_confusion(&mut self, id: EntityId) {
        let Some(actor) = self.state.actors.get_mut(id) else {
            return;
        };
        if let Some(AiMode::Confused { turns, .. }) = &mut actor.ai {
            *turns = turns.saturating_sub(1);
            if *turns > 0 {
                return;
            }
        } else {
            return;
        }
        if let Some(AiMode::Confused { previous, .. }) = actor.ai.take() {
            actor.ai = Some(*previous);
        }
    }

    /// The constriction hold. Squeezing wears down base health and drags the displayed
    /// health with it; an enemy no longer touching the body slips free.
    pub(super) fn enemy_pre_turn(&mut self, id: EntityId) -> Result<(), GameError> {
        let Some(actor) = self.state.actors.get(id) else {
            return Ok(());
        };
        if !matches!(actor.ai, Some(AiMode::Constricted { .. })) {
            return Ok(());
        }
        let pos = actor.pos;
        let name = actor.name.clone();
        let held = self.player_alive() && self.state.body_cells().iter().any(|cell| cell.is_adjacent(pos));

        if held {
            let damage = 1 + (self.effective_stats(self.state.player_id).tail / 2).max(0);
            let actor = self.actor_mut(id)?;
            actor.health.base -= damage;
            actor.health.current = actor.health.current.min(actor.health.base);
            let dead = actor.health.is_dead();
            self.push_log(LogEvent::Squeezed { name, damage });
            if dead {
                self.kill_actor(id)?;
            }
        } else {
            let actor = self.actor_mut(id)?;
            if let Some(AiMode::Constricted { previous }) = actor.ai.take() {
                actor.ai = Some(*previous);
            }
            self.push_log(LogEvent::Released { name });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::content::EnemyKind;

    fn mode(game: &Game, id: EntityId) -> AiMode {
        game.state.actors[id].ai.clone().expect("actor is alive")
    }

    #[test]
    fn enemy_behind_a_wall_stays_asleep() {
        let mut game = arena_game();
        for y in 1..14 {
            game.state.map.set_tile(Pos::new(y, 13), TileKind::Wall);
        }
        let rat = add_enemy(&mut game, EnemyKind::Rat, Pos::new(7, 16));
        assert!(game.plan_intent(rat).expect("rat exists").is_empty());
        assert_eq!(mode(&game, rat), AiMode::Hostile { awake: false, last_target: None });
        assert!(!logged(&game, |event| matches!(event, LogEvent::Spotted { .. })));
    }

    #[test]
    fn spotting_the_player_wakes_once_and_walks_up_to_move_speed() {
        let mut game = arena_game();
        let bat = add_enemy(&mut game, EnemyKind::Bat, Pos::new(7, 15));
        let intents = game.plan_intent(bat).expect("bat exists");
        assert_eq!(intents, vec![Intent::Step { delta: Delta::WEST }; 2]);
        assert_eq!(
            mode(&game, bat),
            AiMode::Hostile { awake: true, last_target: Some(Pos::new(7, 10)) }
        );
        game.plan_intent(bat).expect("bat exists");
        let spotted = game
            .log
            .iter()
            .filter(|entry| matches!(entry.event, LogEvent::Spotted { .. }))
            .count();
        assert_eq!(spotted, 1);
    }

    #[test]
    fn adjacent_enemy_plans_a_single_attack() {
        let mut game = arena_game();
        let wolf = add_enemy(&mut game, EnemyKind::Wolf, Pos::new(6, 11));
        let intents = game.plan_intent(wolf).expect("wolf exists");
        assert_eq!(intents, vec![Intent::Attack { delta: Delta::new(1, -1) }]);
    }

    #[test]
    fn visible_decoy_draws_attention_from_the_player() {
        let mut game = arena_game();
        let rat = add_enemy(&mut game, EnemyKind::Rat, Pos::new(7, 14));
        let decoy = game.state.actors.insert(Actor::decoy(Pos::new(3, 14)));
        game.state.actors[decoy].id = decoy;
        let intents = game.plan_intent(rat).expect("rat exists");
        assert_eq!(intents, vec![Intent::Step { delta: Delta::NORTH }]);
    }

    #[test]
    fn hunters_go_for_the_cheapest_body_cell() {
        let mut game = arena_game();
        give_body(&mut game, &['a', 'b', 'c']);
        let rat = add_enemy(&mut game, EnemyKind::Rat, Pos::new(8, 7));
        let intents = game.plan_intent(rat).expect("rat exists");
        assert_eq!(intents, vec![Intent::Attack { delta: Delta::new(-1, 0) }]);
    }

    #[test]
    fn losing_sight_falls_back_to_the_last_seen_cell() {
        let mut game = arena_game();
        let rat = add_enemy(&mut game, EnemyKind::Rat, Pos::new(7, 14));
        game.state.actors[rat].ai =
            Some(AiMode::Hostile { awake: true, last_target: Some(Pos::new(3, 14)) });
        for x in 11..14 {
            for y in 1..14 {
                game.state.map.set_tile(Pos::new(y, x), TileKind::Wall);
            }
        }
        let intents = game.plan_intent(rat).expect("rat exists");
        assert_eq!(intents, vec![Intent::Step { delta: Delta::NORTH }]);

        game.state.actors[rat].pos = Pos::new(3, 14);
        assert!(game.plan_intent(rat).expect("rat exists").is_empty());
        assert_eq!(mode(&game, rat), AiMode::Hostile { awake: true, last_target: None });
    }

    #[test]
    fn petrified_and_phased_out_enemies_plan_nothing() {
        let mut game = arena_game();
        let rat = add_enemy(&mut game, EnemyKind::Rat, Pos::new(7, 12));
        game.apply_status(rat, StatusKind::Petrified, 2);
        assert!(game.plan_intent(rat).expect("rat exists").is_empty());
        game.state.actors[rat].statuses.clear();
        game.apply_status(rat, StatusKind::PhasedOut, 2);
        assert!(game.plan_intent(rat).expect("rat exists").is_empty());
    }

    #[test]
    fn confusion_walks_randomly_then_restores_the_old_mode() {
        let mut game = arena_game();
        let rat = add_enemy(&mut game, EnemyKind::Rat, Pos::new(3, 3));
        game.confuse(rat, 2);
        let start = game.state.actors[rat].pos;

        game.run_enemy(rat, false).expect("rat acts");
        assert!(matches!(mode(&game, rat), AiMode::Confused { turns: 1, .. }));
        assert!(game.state.actors[rat].pos.chebyshev(start) <= 1);

        game.run_enemy(rat, false).expect("rat acts");
        assert!(matches!(mode(&game, rat), AiMode::Hostile { .. }));
    }

    #[test]
    fn attacking_ends_the_queue() {
        let mut game = arena_game();
        let head = game.state.player_pos();
        let wolf = add_enemy(&mut game, EnemyKind::Wolf, Pos::new(head.y, head.x + 2));
        wake(&mut game, wolf);
        game.state.actors[wolf].intent = vec![
            Intent::Step { delta: Delta::WEST },
            Intent::Attack { delta: Delta::WEST },
        ];
        game.run_enemy(wolf, true).expect("wolf acts");
        assert_eq!(game.state.actors[wolf].pos, Pos::new(head.y, head.x + 1));
        assert!(!game.state.player().expect("player exists").is_alive());
        assert!(game.state.actors[wolf].intent.is_empty());
    }

    #[test]
    fn a_refused_intent_aborts_the_rest() {
        let mut game = arena_game();
        let bat = add_enemy(&mut game, EnemyKind::Bat, Pos::new(1, 1));
        wake(&mut game, bat);
        game.state.actors[bat].intent =
            vec![Intent::Step { delta: Delta::NORTH }, Intent::Step { delta: Delta::EAST }];
        game.run_enemy(bat, true).expect("bat acts");
        assert_eq!(game.state.actors[bat].pos, Pos::new(1, 1));
    }

    #[test]
    fn constriction_squeezes_base_health_and_caps_current() {
        let mut game = arena_game();
        let head = game.state.player_pos();
        let ogre = add_enemy(&mut game, EnemyKind::Ogre, Pos::new(head.y - 1, head.x));
        game.constrict_adjacent();
        game.state.actors[game.state.player_id].base_stats.tail = 2;

        game.enemy_pre_turn(ogre).expect("ogre exists");
        let health = game.state.actors[ogre].health;
        assert_eq!(health, Health { current: 4, base: 4 });
        assert!(logged(&game, |event| matches!(event, LogEvent::Squeezed { damage: 2, .. })));

        game.state.actors[ogre].health = Health { current: 1, base: 1 };
        game.enemy_pre_turn(ogre).expect("ogre exists");
        assert!(!game.state.actors.contains_key(ogre));
    }

    #[test]
    fn constriction_releases_when_the_body_moves_away() {
        let mut game = arena_game();
        let head = game.state.player_pos();
        let rat = add_enemy(&mut game, EnemyKind::Rat, Pos::new(head.y - 1, head.x));
        wake(&mut game, rat);
        game.constrict_adjacent();
        let player = game.state.player_id;
        game.state.actors[player].pos = Pos::new(head.y + 3, head.x);

        game.enemy_pre_turn(rat).expect("rat exists");
        assert_eq!(mode(&game, rat), AiMode::Hostile { awake: true, last_target: None });
        assert!(logged(&game, |event| matches!(event, LogEvent::Released { .. })));
    }

    #[test]
    fn constricted_enemies_do_not_act() {
        let mut game = arena_game();
        let head = game.state.player_pos();
        let rat = add_enemy(&mut game, EnemyKind::Rat, Pos::new(head.y - 1, head.x));
        wake(&mut game, rat);
        game.constrict_adjacent();
        game.run_enemy(rat, false).expect("rat holds still");
        assert!(game.state.player().expect("player exists").is_alive());
        assert_eq!(game.state.actors[rat].pos, Pos::new(head.y - 1, head.x));
    }
}
