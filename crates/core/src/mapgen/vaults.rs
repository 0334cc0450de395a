//! Vault planning and carving. A vault is a grown room with its own floor tile and a
//! barrier wall two cells in from its door. The barrier has a single gate the player's
//! body can slide through; the gate is offset from the door so nothing standing on the
//! threshold sees straight in. The strip between door and barrier is the foyer.

use rand_chacha::ChaCha8Rng;

use crate::tiles::TileKind;
use crate::types::Pos;

use super::grid::set_tile;
use super::rooms::{Door, RoomRect, Side};
use super::seed::roll;

/// Door-axis depth needed for foyer, barrier, and a usable interior.
const MIN_VAULT_DEPTH: i32 = 6;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct VaultPlan {
    pub(super) foyer: Vec<Pos>,
    pub(super) barrier: Vec<Pos>,
    pub(super) gate: Pos,
}

pub(super) fn is_vault_candidate(rect: RoomRect, door: Door) -> bool {
    rect.depth_from(door.side) >= MIN_VAULT_DEPTH
}

pub(super) fn plan_vault(rng: &mut ChaCha8Rng, rect: RoomRect, door: Door) -> VaultPlan {
    let (foyer, barrier): (Vec<Pos>, Vec<Pos>) = match door.side {
        Side::South => (
            (rect.x..=rect.right()).map(|x| Pos { y: rect.bottom(), x }).collect(),
            (rect.x..=rect.right()).map(|x| Pos { y: rect.bottom() - 1, x }).collect(),
        ),
        Side::North => (
            (rect.x..=rect.right()).map(|x| Pos { y: rect.y, x }).collect(),
            (rect.x..=rect.right()).map(|x| Pos { y: rect.y + 1, x }).collect(),
        ),
        Side::East => (
            (rect.y..=rect.bottom()).map(|y| Pos { y, x: rect.right() }).collect(),
            (rect.y..=rect.bottom()).map(|y| Pos { y, x: rect.right() - 1 }).collect(),
        ),
        Side::West => (
            (rect.y..=rect.bottom()).map(|y| Pos { y, x: rect.x }).collect(),
            (rect.y..=rect.bottom()).map(|y| Pos { y, x: rect.x + 1 }).collect(),
        ),
    };

    let offset_cells: Vec<Pos> = barrier
        .iter()
        .copied()
        .filter(|cell| match door.side {
            Side::North | Side::South => cell.x != door.pos.x,
            Side::East | Side::West => cell.y != door.pos.y,
        })
        .collect();
    let gate = offset_cells[roll(rng, 0, offset_cells.len() - 1)];

    VaultPlan { foyer, barrier, gate }
}

pub(super) fn carve_vault(tiles: &mut [TileKind], width: usize, rect: RoomRect, plan: &VaultPlan) {
    for cell in rect.cells() {
        set_tile(tiles, width, cell, TileKind::VaultFloor);
    }
    for &cell in &plan.barrier {
        set_tile(tiles, width, cell, TileKind::Wall);
    }
    set_tile(tiles, width, plan.gate, TileKind::VaultGate);
}
