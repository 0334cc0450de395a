//! Maze floors: a grid of 5x5 cells wired into a spanning tree by a randomized
//! depth-first walk, with an occasional extra link back to a visited neighbour so the
//! maze has loops. Each cell renders as a one-tile-wide corridor through its center.

use rand_chacha::ChaCha8Rng;

use crate::tiles::{LINK_EAST, LINK_NORTH, LINK_SOUTH, LINK_WEST, TileKind};
use crate::types::Pos;

use super::seed::{chance, pick, roll};

pub(super) const MAZE_CELL: usize = 5;
const BRANCH_CHANCE: u32 = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct MazeLayout {
    pub(super) tiles: Vec<TileKind>,
    pub(super) start: Pos,
    /// Center of the east-edge exit cell on boss mazes.
    pub(super) far_end: Option<Pos>,
}

struct MazeGrid {
    rows: usize,
    cols: usize,
    links: Vec<u8>,
}

impl MazeGrid {
    fn cell(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    fn neighbours(&self, row: usize, col: usize) -> Vec<(usize, usize, u8, u8)> {
        let mut out = Vec::with_capacity(4);
        if row > 0 {
            out.push((row - 1, col, LINK_NORTH, LINK_SOUTH));
        }
        if col + 1 < self.cols {
            out.push((row, col + 1, LINK_EAST, LINK_WEST));
        }
        if row + 1 < self.rows {
            out.push((row + 1, col, LINK_SOUTH, LINK_NORTH));
        }
        if col > 0 {
            out.push((row, col - 1, LINK_WEST, LINK_EAST));
        }
        out
    }

    fn link(&mut self, from: (usize, usize), to: (usize, usize), bit: u8, back: u8) {
        let from_index = self.cell(from.0, from.1);
        let to_index = self.cell(to.0, to.1);
        self.links[from_index] |= bit;
        self.links[to_index] |= back;
    }
}

pub(super) fn build_maze(
    rng: &mut ChaCha8Rng,
    width: usize,
    height: usize,
    open_edges: bool,
) -> MazeLayout {
    let cols = (width / MAZE_CELL).max(1);
    let rows = (height / MAZE_CELL).max(1);
    let mut grid = MazeGrid { rows, cols, links: vec![0; rows * cols] };

    let start_cell =
        if open_edges { (roll(rng, 0, rows - 1), 0) } else { (roll(rng, 0, rows - 1), roll(rng, 0, cols - 1)) };
    carve_spanning_tree(rng, &mut grid, start_cell);

    let mut far_end = None;
    let mut start = cell_center(start_cell.0, start_cell.1);
    if open_edges {
        let end_cell = (roll(rng, 0, rows - 1), cols - 1);
        let start_index = grid.cell(start_cell.0, start_cell.1);
        let end_index = grid.cell(end_cell.0, end_cell.1);
        grid.links[start_index] |= LINK_WEST;
        grid.links[end_index] |= LINK_EAST;
        start = Pos { y: start.y, x: 0 };
        far_end = Some(cell_center(end_cell.0, end_cell.1));
    }

    let mut tiles = vec![TileKind::Wall; width * height];
    for row in 0..rows {
        for col in 0..cols {
            render_cell(&mut tiles, width, row, col, grid.links[grid.cell(row, col)]);
        }
    }

    MazeLayout { tiles, start, far_end }
}

fn carve_spanning_tree(rng: &mut ChaCha8Rng, grid: &mut MazeGrid, start: (usize, usize)) {
    let mut visited = vec![false; grid.rows * grid.cols];
    visited[grid.cell(start.0, start.1)] = true;
    let mut stack = vec![start];

    while let Some(&(row, col)) = stack.last() {
        let neighbours = grid.neighbours(row, col);
        let fresh: Vec<_> =
            neighbours.iter().copied().filter(|n| !visited[grid.cell(n.0, n.1)]).collect();

        if chance(rng, BRANCH_CHANCE) {
            let here = grid.links[grid.cell(row, col)];
            let loops: Vec<_> = neighbours
                .iter()
                .copied()
                .filter(|n| visited[grid.cell(n.0, n.1)] && here & n.2 == 0)
                .collect();
            if let Some(&(next_row, next_col, bit, back)) = pick(rng, &loops) {
                grid.link((row, col), (next_row, next_col), bit, back);
            }
        }

        match pick(rng, &fresh) {
            Some(&(next_row, next_col, bit, back)) => {
                grid.link((row, col), (next_row, next_col), bit, back);
                visited[grid.cell(next_row, next_col)] = true;
                stack.push((next_row, next_col));
            }
            None => {
                stack.pop();
            }
        }
    }
}

fn cell_center(row: usize, col: usize) -> Pos {
    Pos { y: (row * MAZE_CELL + MAZE_CELL / 2) as i32, x: (col * MAZE_CELL + MAZE_CELL / 2) as i32 }
}

fn render_cell(tiles: &mut [TileKind], width: usize, row: usize, col: usize, links: u8) {
    let center = cell_center(row, col);
    let mut put = |pos: Pos, tile: TileKind| {
        tiles[(pos.y as usize) * width + pos.x as usize] = tile;
    };
    put(center, TileKind::Corridor { links });

    let vertical = TileKind::Corridor { links: LINK_NORTH | LINK_SOUTH };
    let horizontal = TileKind::Corridor { links: LINK_EAST | LINK_WEST };
    let reach = (MAZE_CELL / 2) as i32;
    for step in 1..=reach {
        if links & LINK_NORTH != 0 {
            put(Pos { y: center.y - step, x: center.x }, vertical);
        }
        if links & LINK_SOUTH != 0 {
            put(Pos { y: center.y + step, x: center.x }, vertical);
        }
        if links & LINK_WEST != 0 {
            put(Pos { y: center.y, x: center.x - step }, horizontal);
        }
        if links & LINK_EAST != 0 {
            put(Pos { y: center.y, x: center.x + step }, horizontal);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::seed::floor_rng;

    fn walkable_count(layout: &MazeLayout) -> usize {
        layout.tiles.iter().filter(|tile| tile.is_walkable()).count()
    }

    #[test]
    fn every_maze_cell_center_is_a_corridor() {
        let layout = build_maze(&mut floor_rng(9, 5, 0), 60, 40, false);
        for row in 0..8 {
            for col in 0..12 {
                let center = cell_center(row, col);
                assert!(layout.tiles[(center.y as usize) * 60 + center.x as usize].is_walkable());
            }
        }
        assert!(layout.far_end.is_none());
    }

    #[test]
    fn closed_mazes_keep_a_solid_border() {
        let layout = build_maze(&mut floor_rng(10, 5, 0), 60, 40, false);
        for x in 0..60 {
            assert_eq!(layout.tiles[x], TileKind::Wall);
            assert_eq!(layout.tiles[39 * 60 + x], TileKind::Wall);
        }
    }

    #[test]
    fn boss_maze_opens_west_and_east_edges() {
        let layout = build_maze(&mut floor_rng(11, 9, 0), 60, 40, true);
        assert_eq!(layout.start.x, 0);
        assert!(layout.tiles[(layout.start.y as usize) * 60].is_walkable());
        let end = layout.far_end.expect("boss maze has an exit cell");
        assert!(layout.tiles[(end.y as usize) * 60 + 59].is_walkable());
        assert!(walkable_count(&layout) > 12 * 8);
    }
}
