//! Grid and tile-space primitives used by room growth, mazes, and spawning.

use std::collections::VecDeque;

use crate::tiles::TileKind;
use crate::types::{Delta, Pos};

pub(super) fn in_bounds(width: usize, height: usize, pos: Pos) -> bool {
    pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < width && (pos.y as usize) < height
}

pub(super) fn manhattan(a: Pos, b: Pos) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

pub(super) fn index(width: usize, pos: Pos) -> usize {
    (pos.y as usize) * width + (pos.x as usize)
}

pub(super) fn tile_at(tiles: &[TileKind], width: usize, pos: Pos) -> TileKind {
    tiles[index(width, pos)]
}

pub(super) fn set_tile(tiles: &mut [TileKind], width: usize, pos: Pos, tile: TileKind) {
    tiles[index(width, pos)] = tile;
}

/// Breadth-first step counts over walkable tiles; `u32::MAX` marks unreachable cells.
pub(super) fn walkable_distances(
    tiles: &[TileKind],
    width: usize,
    height: usize,
    origin: Pos,
) -> Vec<u32> {
    let mut distances = vec![u32::MAX; width * height];
    if !in_bounds(width, height, origin) {
        return distances;
    }
    distances[index(width, origin)] = 0;
    let mut queue = VecDeque::from([origin]);
    while let Some(current) = queue.pop_front() {
        let next_distance = distances[index(width, current)] + 1;
        for delta in Delta::CARDINALS {
            let next = current.offset(delta);
            if !in_bounds(width, height, next) || !tile_at(tiles, width, next).is_walkable() {
                continue;
            }
            let slot = &mut distances[index(width, next)];
            if *slot == u32::MAX {
                *slot = next_distance;
                queue.push_back(next);
            }
        }
    }
    distances
}

pub(super) fn farthest_walkable_tile_from_entry(
    tiles: &[TileKind],
    width: usize,
    height: usize,
    entry_tile: Pos,
) -> Pos {
    let distances = walkable_distances(tiles, width, height, entry_tile);
    let mut best = entry_tile;
    let mut best_distance = 0_u32;
    for y in 0..height {
        for x in 0..width {
            let pos = Pos { y: y as i32, x: x as i32 };
            let distance = distances[index(width, pos)];
            let open = matches!(tile_at(tiles, width, pos), TileKind::Floor | TileKind::Corridor { .. });
            if distance == u32::MAX || !open {
                continue;
            }
            if distance > best_distance
                || (distance == best_distance && (pos.y, pos.x) > (best.y, best.x))
            {
                best = pos;
                best_distance = distance;
            }
        }
    }
    best
}
