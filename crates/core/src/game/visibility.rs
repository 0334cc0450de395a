//! Field-of-view and line-of-sight calculations.
//! This module exists to keep sight rules deterministic and shared by the player view and
//! enemy target acquisition. It does not own movement planning or targeting policy.

use super::*;

/// Cells seen from one origin; sized to the map it was computed on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct SightSet {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl SightSet {
    fn new(map: &Map) -> Self {
        let (width, height) = (map.internal_width, map.internal_height);
        Self { width, height, cells: vec![false; width * height] }
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        let in_bounds = pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.width
            && (pos.y as usize) < self.height;
        in_bounds.then(|| (pos.y as usize) * self.width + pos.x as usize)
    }

    fn mark(&mut self, pos: Pos, seen: bool) {
        if let Some(idx) = self.index(pos) {
            self.cells[idx] = seen;
        }
    }

    pub(super) fn contains(&self, pos: Pos) -> bool {
        self.index(pos).is_some_and(|idx| self.cells[idx])
    }

    pub(super) fn iter(&self) -> impl Iterator<Item = Pos> + '_ {
        self.cells.iter().enumerate().filter(|(_, seen)| **seen).map(|(idx, _)| Pos {
            y: (idx / self.width) as i32,
            x: (idx % self.width) as i32,
        })
    }
}

fn transform_octant(orig: Pos, x: i32, y: i32, oct: u8) -> Pos {
    match oct {
        0 => Pos { y: orig.y - y, x: orig.x + x },
        1 => Pos { y: orig.y - x, x: orig.x + y },
        2 => Pos { y: orig.y - x, x: orig.x - y },
        3 => Pos { y: orig.y - y, x: orig.x - x },
        4 => Pos { y: orig.y + y, x: orig.x - x },
        5 => Pos { y: orig.y + x, x: orig.x - y },
        6 => Pos { y: orig.y + x, x: orig.x + y },
        7 => Pos { y: orig.y + y, x: orig.x + x },
        _ => orig,
    }
}

/// Recursive shadowcasting over a circular radius, followed by a straight-line pass that
/// drops cells only reachable by peeking around wall corners.
pub(super) fn field_of_view(map: &Map, origin: Pos, range: i32) -> SightSet {
    let mut sight = SightSet::new(map);
    sight.mark(origin, true);
    let range = range.max(0);
    for octant in 0..8 {
        scan_octant(map, &mut sight, origin, range, 1, Slope::new(1, 1), Slope::new(0, 1), octant);
    }

    let cells: Vec<Pos> = sight.iter().filter(|pos| *pos != origin).collect();
    for pos in cells {
        if !has_direct_line_of_sight(map, origin, pos) {
            sight.mark(pos, false);
        }
    }
    sight
}

fn within_radius(origin: Pos, pos: Pos, range: i32) -> bool {
    let dy = pos.y - origin.y;
    let dx = pos.x - origin.x;
    dy * dy + dx * dx <= range * range + range
}

#[derive(Clone, Copy)]
struct Slope {
    y: i32,
    x: i32,
}

impl Slope {
    fn new(y: i32, x: i32) -> Self {
        Self { y, x }
    }

    fn greater_or_equal(&self, other: &Slope) -> bool {
        self.y * other.x >= other.y * self.x
    }

    fn greater_than(&self, other: &Slope) -> bool {
        self.y * other.x > other.y * self.x
    }
}

#[allow(clippy::too_many_arguments)]
fn scan_octant(
    map: &Map,
    sight: &mut SightSet,
    orig: Pos,
    range: i32,
    dist: i32,
    start: Slope,
    end: Slope,
    oct: u8,
) {
    if dist > range {
        return;
    }
    let mut blocked = false;
    let mut cur_start = start;
    for y in (0..=dist).rev() {
        let top = Slope::new(2 * y + 1, 2 * dist - 1);
        let bot = Slope::new(2 * y - 1, 2 * dist + 1);
        if cur_start.greater_or_equal(&bot) && top.greater_than(&end) {
            let p = transform_octant(orig, dist, y, oct);
            if within_radius(orig, p, range) {
                sight.mark(p, true);
            }
            if !map.is_transparent(p) {
                if !blocked {
                    scan_octant(map, sight, orig, range, dist + 1, cur_start, top, oct);
                    blocked = true;
                }
                cur_start = bot;
            } else if blocked {
                blocked = false;
            }
        }
    }
    if !blocked {
        scan_octant(map, sight, orig, range, dist + 1, cur_start, end, oct);
    }
}

pub(super) fn has_direct_line_of_sight(map: &Map, origin: Pos, target: Pos) -> bool {
    let dx = target.x - origin.x;
    let dy = target.y - origin.y;
    let sx = dx.signum();
    let sy = dy.signum();
    let total_dist_x = dx.abs();
    let total_dist_y = dy.abs();

    let mut x = origin.x;
    let mut y = origin.y;
    let mut current_step_x = 0;
    let mut current_step_y = 0;

    while current_step_x < total_dist_x || current_step_y < total_dist_y {
        let lhs = (1 + 2 * current_step_x) * total_dist_y;
        let rhs = (1 + 2 * current_step_y) * total_dist_x;

        if lhs == rhs {
            x += sx;
            y += sy;
            current_step_x += 1;
            current_step_y += 1;
        } else if lhs < rhs {
            x += sx;
            current_step_x += 1;
        } else {
            y += sy;
            current_step_y += 1;
        }

        if x == target.x && y == target.y {
            break;
        }
        if !map.is_transparent(Pos { y, x }) {
            return false;
        }
    }
    true
}

impl Game {
    /// Recomputes the player's sight and copies it into the map's visible/explored layers.
    pub(super) fn refresh_player_fov(&mut self) {
        let Some(player) = self.state.player() else {
            return;
        };
        let sight = field_of_view(&self.state.map, player.pos, self.config.fov_radius);
        self.state.map.clear_visible();
        for pos in sight.iter() {
            self.state.map.set_visible(pos, true);
        }
    }
}
