//! Procedural map generation domain split into coherent submodules.

pub mod model;
pub mod progression;

mod generator;
mod grid;
mod maze;
mod rooms;
pub(crate) mod seed;
mod spawns;
mod vaults;

pub use generator::MapGenerator;
pub use model::{EnemySpawn, GeneratedFloor, ItemSpawn};
pub use progression::{
    FloorLayout, MAX_FLOORS, MAZE_FLOOR_INDEX, STARTING_FLOOR_INDEX, floor_layout, is_final_floor,
};
pub use seed::RunRng;

use crate::config::GameConfig;
use crate::error::GameError;
use crate::identity::IdentityRegistry;

pub fn generate_floor(
    run_seed: u64,
    floor_index: u8,
    config: &GameConfig,
    identities: &IdentityRegistry,
) -> Result<GeneratedFloor, GameError> {
    MapGenerator::new(run_seed, config, identities).generate(floor_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::generate_item_identities;

    #[test]
    fn generate_floor_matches_map_generator_output() {
        let config = GameConfig::default();
        let identities = generate_item_identities(123);

        let from_helper = generate_floor(123, 2, &config, &identities).expect("floor 2 exists");
        let from_generator =
            MapGenerator::new(123, &config, &identities).generate(2).expect("floor 2 exists");

        assert_eq!(from_helper, from_generator);
    }
}
