//! Per-floor generation tables: layout kind, room sizes, vault budget, spawn odds, and
//! enemy pools.

use crate::content::EnemyKind;

pub const MAX_FLOORS: u8 = 9;
pub const STARTING_FLOOR_INDEX: u8 = 1;
pub const MAZE_FLOOR_INDEX: u8 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloorLayout {
    Rooms,
    Maze,
    /// Ends at opposite map edges with the final boss at the far end.
    BossMaze,
}

pub fn floor_layout(floor_index: u8) -> FloorLayout {
    match floor_index {
        MAZE_FLOOR_INDEX => FloorLayout::Maze,
        MAX_FLOORS => FloorLayout::BossMaze,
        _ => FloorLayout::Rooms,
    }
}

pub fn is_final_floor(floor_index: u8) -> bool {
    floor_index == MAX_FLOORS
}

const ROOM_AREA_BY_FLOOR: [(usize, usize); MAX_FLOORS as usize] = [
    (30, 70),
    (30, 90),
    (36, 100),
    (36, 110),
    (30, 90),
    (40, 120),
    (40, 130),
    (48, 140),
    (40, 120),
];
const ROOM_TARGET_BY_FLOOR: [usize; MAX_FLOORS as usize] = [8, 10, 11, 12, 10, 13, 13, 14, 10];
const VAULT_CHANCE_BY_FLOOR: [u32; MAX_FLOORS as usize] = [0, 25, 30, 35, 0, 40, 45, 50, 0];
const VAULT_TARGET_BY_FLOOR: [usize; MAX_FLOORS as usize] = [0, 1, 1, 2, 0, 2, 2, 3, 0];
const MONSTER_CHANCE_BY_FLOOR: [u32; MAX_FLOORS as usize] = [12, 14, 16, 18, 20, 20, 22, 24, 18];
const ITEM_CHANCE_BY_FLOOR: [u32; MAX_FLOORS as usize] = [22, 20, 20, 18, 18, 18, 16, 16, 14];

const ENEMY_POOLS: [&[EnemyKind]; MAX_FLOORS as usize] = [
    &[EnemyKind::Rat, EnemyKind::Rat, EnemyKind::Bat],
    &[EnemyKind::Rat, EnemyKind::Bat, EnemyKind::Newt],
    &[EnemyKind::Bat, EnemyKind::Newt, EnemyKind::Beetle],
    &[EnemyKind::Newt, EnemyKind::Beetle, EnemyKind::Spider],
    &[EnemyKind::Beetle, EnemyKind::Spider, EnemyKind::Spider],
    &[EnemyKind::Spider, EnemyKind::Wolf, EnemyKind::Beetle],
    &[EnemyKind::Wolf, EnemyKind::Ogre, EnemyKind::Spider],
    &[EnemyKind::Wolf, EnemyKind::Ogre, EnemyKind::Wraith],
    &[EnemyKind::Ogre, EnemyKind::Wraith, EnemyKind::Golem],
];

const VAULT_POOLS: [&[EnemyKind]; MAX_FLOORS as usize] = [
    &[EnemyKind::Newt],
    &[EnemyKind::Beetle, EnemyKind::Spider],
    &[EnemyKind::Spider, EnemyKind::Wolf],
    &[EnemyKind::Wolf, EnemyKind::Ogre],
    &[EnemyKind::Wolf, EnemyKind::Ogre],
    &[EnemyKind::Ogre, EnemyKind::Wraith],
    &[EnemyKind::Wraith, EnemyKind::Golem],
    &[EnemyKind::Golem, EnemyKind::Wraith],
    &[EnemyKind::Golem],
];

pub const FINAL_BOSS: EnemyKind = EnemyKind::Wyrm;

/// Chance that a vault item roll yields a rare consonant rather than an uncommon one.
pub(super) const VAULT_RARE_ITEM_CHANCE: u32 = 35;
/// Chance that an item rolled outside vaults is a vowel.
pub(super) const VOWEL_ITEM_CHANCE: u32 = 85;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct RoomProfile {
    pub(super) min_area: usize,
    pub(super) max_area: usize,
    pub(super) target_rooms: usize,
    pub(super) vault_chance: u32,
    pub(super) vault_target: usize,
    /// Floor 1 chains every room onto the previous one.
    pub(super) linear_chain: bool,
}

pub(super) fn room_profile(floor_index: u8) -> RoomProfile {
    let slot = floor_slot(floor_index);
    let (min_area, max_area) = ROOM_AREA_BY_FLOOR[slot];
    RoomProfile {
        min_area,
        max_area,
        target_rooms: ROOM_TARGET_BY_FLOOR[slot],
        vault_chance: VAULT_CHANCE_BY_FLOOR[slot],
        vault_target: VAULT_TARGET_BY_FLOOR[slot],
        linear_chain: floor_index == STARTING_FLOOR_INDEX,
    }
}

pub(super) fn monster_chance(floor_index: u8) -> u32 {
    MONSTER_CHANCE_BY_FLOOR[floor_slot(floor_index)]
}

pub(super) fn item_chance(floor_index: u8) -> u32 {
    ITEM_CHANCE_BY_FLOOR[floor_slot(floor_index)]
}

pub(super) fn enemy_pool(floor_index: u8, in_vault: bool) -> &'static [EnemyKind] {
    let slot = floor_slot(floor_index);
    if in_vault { VAULT_POOLS[slot] } else { ENEMY_POOLS[slot] }
}

fn floor_slot(floor_index: u8) -> usize {
    let slot = floor_index.saturating_sub(STARTING_FLOOR_INDEX) as usize;
    slot.min(MAX_FLOORS as usize - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn special_floors_use_maze_layouts() {
        assert_eq!(floor_layout(1), FloorLayout::Rooms);
        assert_eq!(floor_layout(MAZE_FLOOR_INDEX), FloorLayout::Maze);
        assert_eq!(floor_layout(MAX_FLOORS), FloorLayout::BossMaze);
    }

    #[test]
    fn only_the_first_floor_chains_linearly() {
        assert!(room_profile(1).linear_chain);
        assert!(!room_profile(2).linear_chain);
    }

    #[test]
    fn room_bounds_allow_a_five_by_five_room() {
        for floor in STARTING_FLOOR_INDEX..=MAX_FLOORS {
            let profile = room_profile(floor);
            assert!(profile.min_area <= profile.max_area);
            assert!(profile.max_area >= 25, "floor {floor}");
        }
    }
}
