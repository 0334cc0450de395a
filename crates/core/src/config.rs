//! Run-wide tunables. Per-floor tables live in `mapgen::progression`.

use serde::{Deserialize, Serialize};

use crate::types::Difficulty;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationLimits {
    pub max_room_attempts: usize,
    pub max_floor_retries: usize,
}

impl Default for GenerationLimits {
    fn default() -> Self {
        Self { max_room_attempts: 5000, max_floor_retries: 8 }
    }
}

impl GenerationLimits {
    /// Smaller attempt budget for hand-built or stress layouts.
    pub fn for_testing() -> Self {
        Self { max_room_attempts: 1000, ..Self::default() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub map_width: usize,
    pub map_height: usize,
    pub fov_radius: i32,
    /// Extra path cost for stepping through a cell held by a blocker.
    pub crowd_penalty: u32,
    pub min_spawn_distance: u32,
    pub spawn_chunk_size: usize,
    /// Number of past turns kept for time reversal.
    pub rewind_window: usize,
    pub difficulty: Difficulty,
    pub generation: GenerationLimits,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            map_width: 60,
            map_height: 40,
            fov_radius: 8,
            crowd_penalty: 12,
            min_spawn_distance: 6,
            spawn_chunk_size: 6,
            rewind_window: 10,
            difficulty: Difficulty::Normal,
            generation: GenerationLimits::default(),
        }
    }
}

impl GameConfig {
    pub fn easy() -> Self {
        Self { difficulty: Difficulty::Easy, ..Self::default() }
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
