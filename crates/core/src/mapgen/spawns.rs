//! Enemy and item placement by spawn chunk. The map is cut into square chunks and each
//! chunk gets one monster roll and one item roll at a random cell inside it. A placement
//! that lands on an unusable cell is dropped; sparse floors are fine.

use std::collections::BTreeSet;

use rand_chacha::ChaCha8Rng;

use crate::content::{Rarity, VOWELS};
use crate::identity::IdentityRegistry;
use crate::tiles::TileKind;
use crate::types::Pos;

use super::grid::tile_at;
use super::model::{EnemySpawn, ItemSpawn};
use super::progression::{self, VAULT_RARE_ITEM_CHANCE, VOWEL_ITEM_CHANCE};
use super::seed::{chance, pick, roll};

pub(super) struct SpawnContext<'a> {
    pub(super) floor_index: u8,
    pub(super) width: usize,
    pub(super) height: usize,
    pub(super) tiles: &'a [TileKind],
    pub(super) start: Pos,
    pub(super) down_stairs: Option<Pos>,
    pub(super) foyer: &'a BTreeSet<Pos>,
    pub(super) chunk_size: usize,
    pub(super) min_distance: u32,
    pub(super) identities: &'a IdentityRegistry,
}

impl SpawnContext<'_> {
    fn is_open(&self, pos: Pos, occupied: &BTreeSet<Pos>) -> bool {
        tile_at(self.tiles, self.width, pos).is_walkable()
            && pos.chebyshev(self.start) >= self.min_distance
            && Some(pos) != self.down_stairs
            && !self.foyer.contains(&pos)
            && !occupied.contains(&pos)
    }

    fn in_vault(&self, pos: Pos) -> bool {
        tile_at(self.tiles, self.width, pos) == TileKind::VaultFloor
    }

    fn chunk_cell(&self, rng: &mut ChaCha8Rng, chunk_y: usize, chunk_x: usize) -> Pos {
        let size = self.chunk_size.max(1);
        let max_y = (chunk_y + size).min(self.height) - 1;
        let max_x = (chunk_x + size).min(self.width) - 1;
        Pos { y: roll(rng, chunk_y, max_y) as i32, x: roll(rng, chunk_x, max_x) as i32 }
    }
}

pub(super) fn generate_spawns(
    rng: &mut ChaCha8Rng,
    context: &SpawnContext<'_>,
    occupied: &mut BTreeSet<Pos>,
) -> (Vec<EnemySpawn>, Vec<ItemSpawn>) {
    let mut enemy_spawns = Vec::new();
    let mut item_spawns = Vec::new();
    let monster_chance = progression::monster_chance(context.floor_index);
    let item_chance = progression::item_chance(context.floor_index);
    let chunk = context.chunk_size.max(1);

    for chunk_y in (0..context.height).step_by(chunk) {
        for chunk_x in (0..context.width).step_by(chunk) {
            if chance(rng, monster_chance) {
                let pos = context.chunk_cell(rng, chunk_y, chunk_x);
                if context.is_open(pos, occupied) {
                    let pool = progression::enemy_pool(context.floor_index, context.in_vault(pos));
                    if let Some(&kind) = pick(rng, pool) {
                        occupied.insert(pos);
                        enemy_spawns.push(EnemySpawn { kind, pos });
                    }
                }
            }

            if chance(rng, item_chance) {
                let pos = context.chunk_cell(rng, chunk_y, chunk_x);
                if context.is_open(pos, occupied) {
                    let letter = pick_letter(rng, context.identities, context.in_vault(pos));
                    occupied.insert(pos);
                    item_spawns.push(ItemSpawn { letter, pos });
                }
            }
        }
    }

    (enemy_spawns, item_spawns)
}

/// Vault items are always consonants, sometimes rare ones. Elsewhere vowels dominate.
pub(super) fn pick_letter(rng: &mut ChaCha8Rng, identities: &IdentityRegistry, in_vault: bool) -> char {
    let rarity = if in_vault {
        if chance(rng, VAULT_RARE_ITEM_CHANCE) { Rarity::Rare } else { Rarity::Uncommon }
    } else if chance(rng, VOWEL_ITEM_CHANCE) {
        return pick(rng, &VOWELS).copied().unwrap_or('a');
    } else {
        Rarity::Common
    };
    let letters = identities.letters_of_rarity(rarity);
    match pick(rng, &letters) {
        Some(&letter) => letter,
        None => pick(rng, &VOWELS).copied().unwrap_or('a'),
    }
}
