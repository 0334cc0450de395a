//! Floor installation and descent.
//! This module exists to turn a generated floor into live state while carrying the
//! player, its body, and run-scoped data across. It does not own generation itself.

use super::*;
use crate::content::enemy_template;
use crate::mapgen::MAX_FLOORS;

impl Game {
    /// Replaces the current floor. Only the player and its attached body survive; the
    /// body arrives coiled on the start cell and unspools as the player moves off.
    pub(super) fn install_floor(&mut self, floor: &GeneratedFloor) -> Result<(), GameError> {
        let player_id = self.state.player_id;
        let body: BTreeSet<ItemId> = self.state.body().iter().copied().collect();
        self.state.actors.retain(|id, _| id == player_id);
        self.state.items.retain(|id, _| body.contains(&id));
        self.state.map = Map::from_tiles(floor.width, floor.height, floor.tiles.clone());
        self.state.stairs = floor.down_stairs;
        self.state.world.floor = floor.floor_index;
        self.state.intents_planned = false;

        let player = self.actor_mut(player_id)?;
        player.pos = floor.start;
        player.intent.clear();
        self.coil_body_at_head()?;

        for spawn in &floor.enemy_spawns {
            let id = self.state.actors.insert(Actor::enemy(enemy_template(spawn.kind), spawn.pos));
            self.state.actors[id].id = id;
        }
        for spawn in &floor.item_spawns {
            let id = self.state.items.insert(Item::loose(spawn.letter, spawn.pos));
            self.state.items[id].id = id;
        }

        self.refresh_player_fov();
        self.refresh_word_mode();
        debug!(
            floor = floor.floor_index,
            enemies = floor.enemy_spawns.len(),
            items = floor.item_spawns.len(),
            "floor installed"
        );
        Ok(())
    }

    pub(super) fn descend(&mut self) -> Result<(), GameError> {
        let next = self.state.world.floor + 1;
        if next > MAX_FLOORS {
            return Err(GameError::FloorOutOfRange(next));
        }
        let floor = mapgen::generate_floor(
            self.state.world.seed,
            next,
            &self.config,
            &self.state.world.identities,
        )?;
        self.install_floor(&floor)?;
        self.push_log(LogEvent::Descended { floor: next });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    fn run_on_stairs(seed: u64) -> Game {
        let mut game = Game::new(seed, GameConfig::easy(), builtin_dictionary()).expect("run starts");
        let stairs = game.state.stairs.expect("first floor has stairs");
        let player = game.state.player_id;
        game.state.actors[player].pos = stairs;
        game
    }

    #[test]
    fn descending_coils_body_on_new_start_and_clears_old_floor() {
        let mut game = run_on_stairs(21);
        give_body(&mut game, &['o', 'x']);
        let floor_one_enemies = game.state.non_player_ids();

        game.descend().expect("second floor generates");
        let expected = mapgen::generate_floor(
            21,
            STARTING_FLOOR_INDEX + 1,
            &game.config,
            &game.state.world.identities,
        )
        .expect("second floor generates");

        assert_eq!(game.state.world.floor, STARTING_FLOOR_INDEX + 1);
        assert_eq!(game.state.player_pos(), expected.start);
        assert_eq!(game.state.stairs, expected.down_stairs);
        assert!(body_positions(&game).iter().all(|pos| *pos == expected.start));
        assert!(
            game.state
                .body()
                .iter()
                .all(|id| game.state.items[*id].segment == SegmentState::Settling)
        );
        assert!(floor_one_enemies.iter().all(|id| !game.state.actors.contains_key(*id)));
        assert_eq!(game.state.non_player_ids().len(), expected.enemy_spawns.len());
        assert!(logged(&game, |event| matches!(event, LogEvent::Descended { floor: 2 })));
    }

    #[test]
    fn detaching_segments_are_left_behind() {
        let mut game = run_on_stairs(22);
        let ids = give_body(&mut game, &['a', 'b']);
        game.state.items[ids[1]].segment = SegmentState::Detaching;
        game.descend().expect("second floor generates");
        assert_eq!(game.state.body(), &[ids[0]]);
        assert!(!game.state.items.contains_key(ids[1]));
    }

    #[test]
    fn no_floor_below_the_last() {
        let mut game = arena_game();
        game.state.world.floor = MAX_FLOORS;
        assert!(matches!(game.descend(), Err(GameError::FloorOutOfRange(_))));
    }
}
