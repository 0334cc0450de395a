//! High-level map generation orchestration that composes rooms, vaults, mazes, and spawns.

use std::collections::BTreeSet;

use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::identity::IdentityRegistry;
use crate::tiles::TileKind;
use crate::types::Pos;

use super::grid::{farthest_walkable_tile_from_entry, set_tile};
use super::maze::build_maze;
use super::model::{EnemySpawn, GeneratedFloor};
use super::progression::{
    self, FINAL_BOSS, FloorLayout, MAX_FLOORS, STARTING_FLOOR_INDEX, room_profile,
};
use super::rooms::{PlacedRoom, RoomLayout, RoomRect, build_room_layout, carve_rooms};
use super::seed::floor_rng;
use super::spawns::{SpawnContext, generate_spawns};

/// Fewer rooms than this and the floor is regenerated from scratch.
const MIN_ROOMS: usize = 3;

pub struct MapGenerator<'a> {
    run_seed: u64,
    config: &'a GameConfig,
    identities: &'a IdentityRegistry,
}

impl<'a> MapGenerator<'a> {
    pub fn new(run_seed: u64, config: &'a GameConfig, identities: &'a IdentityRegistry) -> Self {
        Self { run_seed, config, identities }
    }

    pub fn generate(&self, floor_index: u8) -> Result<GeneratedFloor, GameError> {
        if !(STARTING_FLOOR_INDEX..=MAX_FLOORS).contains(&floor_index) {
            return Err(GameError::FloorOutOfRange(floor_index));
        }
        let floor = match progression::floor_layout(floor_index) {
            FloorLayout::Rooms => self.generate_rooms(floor_index),
            FloorLayout::Maze => self.generate_maze(floor_index, false),
            FloorLayout::BossMaze => self.generate_maze(floor_index, true),
        };
        debug!(
            floor_index,
            enemies = floor.enemy_spawns.len(),
            items = floor.item_spawns.len(),
            "generated floor"
        );
        Ok(floor)
    }

    fn generate_rooms(&self, floor_index: u8) -> GeneratedFloor {
        let profile = room_profile(floor_index);
        let retries = self.config.generation.max_floor_retries.max(1);
        let mut attempt = 0;
        loop {
            let mut rng = floor_rng(self.run_seed, floor_index, attempt);
            let layout = build_room_layout(
                &mut rng,
                self.config.map_width,
                self.config.map_height,
                &profile,
                &self.config.generation,
            );
            let sparse = layout.rooms.len() < MIN_ROOMS;
            if !sparse || attempt + 1 >= retries {
                if sparse {
                    warn!(
                        floor_index,
                        rooms = layout.rooms.len(),
                        "room generation exhausted, starting in the last room"
                    );
                }
                return self.finish_rooms(floor_index, layout, &mut rng, sparse);
            }
            debug!(floor_index, attempt, rooms = layout.rooms.len(), "sparse floor, regenerating");
            attempt += 1;
        }
    }

    fn finish_rooms(
        &self,
        floor_index: u8,
        mut layout: RoomLayout,
        rng: &mut ChaCha8Rng,
        fallback: bool,
    ) -> GeneratedFloor {
        let (width, height) = (self.config.map_width, self.config.map_height);
        if layout.rooms.is_empty() {
            layout.rooms.push(PlacedRoom { rect: central_room(width, height), door: None, vault: None });
        }

        let mut tiles = vec![TileKind::Wall; width * height];
        carve_rooms(&mut tiles, width, &layout);

        let non_vault = layout.non_vault_indices();
        let start_room = if fallback { non_vault.last() } else { non_vault.first() };
        let start = start_room.map(|&i| layout.rooms[i].rect.center()).unwrap_or_default();

        let mut stairs = layout
            .farthest_room_center(start)
            .unwrap_or_else(|| farthest_walkable_tile_from_entry(&tiles, width, height, start));
        if stairs == start {
            stairs = farthest_walkable_tile_from_entry(&tiles, width, height, start);
        }
        set_tile(&mut tiles, width, stairs, TileKind::DownStairs);

        let foyer: BTreeSet<Pos> = layout.foyer_cells().collect();
        self.populate(floor_index, rng, tiles, start, Some(stairs), &foyer, Vec::new())
    }

    fn generate_maze(&self, floor_index: u8, boss_maze: bool) -> GeneratedFloor {
        let (width, height) = (self.config.map_width, self.config.map_height);
        let mut rng = floor_rng(self.run_seed, floor_index, 0);
        let maze = build_maze(&mut rng, width, height, boss_maze);
        let mut tiles = maze.tiles;

        let mut boss = Vec::new();
        let stairs = if boss_maze {
            if let Some(far_end) = maze.far_end {
                boss.push(EnemySpawn { kind: FINAL_BOSS, pos: far_end });
            }
            None
        } else {
            let stairs = farthest_walkable_tile_from_entry(&tiles, width, height, maze.start);
            set_tile(&mut tiles, width, stairs, TileKind::DownStairs);
            Some(stairs)
        };

        self.populate(floor_index, &mut rng, tiles, maze.start, stairs, &BTreeSet::new(), boss)
    }

    #[allow(clippy::too_many_arguments)]
    fn populate(
        &self,
        floor_index: u8,
        rng: &mut ChaCha8Rng,
        tiles: Vec<TileKind>,
        start: Pos,
        down_stairs: Option<Pos>,
        foyer: &BTreeSet<Pos>,
        mut enemy_spawns: Vec<EnemySpawn>,
    ) -> GeneratedFloor {
        let (width, height) = (self.config.map_width, self.config.map_height);
        let mut occupied: BTreeSet<Pos> = enemy_spawns.iter().map(|spawn| spawn.pos).collect();
        occupied.insert(start);

        let context = SpawnContext {
            floor_index,
            width,
            height,
            tiles: &tiles,
            start,
            down_stairs,
            foyer,
            chunk_size: self.config.spawn_chunk_size,
            min_distance: self.config.min_spawn_distance,
            identities: self.identities,
        };
        let (chunk_enemies, item_spawns) = generate_spawns(rng, &context, &mut occupied);
        enemy_spawns.extend(chunk_enemies);

        GeneratedFloor {
            floor_index,
            width,
            height,
            tiles,
            start,
            down_stairs,
            enemy_spawns,
            item_spawns,
        }
    }
}

fn central_room(width: usize, height: usize) -> RoomRect {
    RoomRect { x: (width / 2) as i32 - 2, y: (height / 2) as i32 - 2, width: 5, height: 5 }
}
