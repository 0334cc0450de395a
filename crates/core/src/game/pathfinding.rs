//! Deterministic movement primitives and shortest-path helpers.
//! This module exists so navigation rules are reusable by enemy planning, the threat
//! overlay, and spit range checks. It does not own targeting policy.

use super::*;

pub(super) const CARDINAL_COST: u32 = 3;
pub(super) const DIAGONAL_COST: u32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    f: u32,
    h: u32,
    y: i32,
    x: i32,
}

#[derive(Clone, Copy, Debug, Default)]
pub(super) struct PathOptions {
    /// Travel through any in-bounds cell, walls included.
    pub(super) ignore_walls: bool,
    /// Added when entering a cell listed as crowded.
    pub(super) crowd_penalty: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct PathResult {
    /// Cells after the start, ending on the goal.
    pub(super) steps: Vec<Pos>,
    pub(super) cost: u32,
}

pub(super) fn step_cost(from: Pos, to: Pos) -> u32 {
    if from.delta_to(to).is_diagonal() { DIAGONAL_COST } else { CARDINAL_COST }
}

/// Octile distance in step-cost units; never overestimates.
pub(super) fn heuristic(a: Pos, b: Pos) -> u32 {
    let dx = a.x.abs_diff(b.x);
    let dy = a.y.abs_diff(b.y);
    CARDINAL_COST * dx.max(dy) + (DIAGONAL_COST - CARDINAL_COST) * dx.min(dy)
}

/// A* over the eight king moves. The goal is always enterable so actors can path onto
/// the cell they mean to attack. Crowded cells stay passable at a penalty, which lets a
/// pack route around a blocker instead of queueing behind it.
pub(super) fn find_path(
    map: &Map,
    crowded: &BTreeSet<Pos>,
    start: Pos,
    goal: Pos,
    options: PathOptions,
) -> Option<PathResult> {
    if !map.in_bounds(start) || !map.in_bounds(goal) {
        return None;
    }
    if start == goal {
        return Some(PathResult { steps: Vec::new(), cost: 0 });
    }
    let mut open_set = BTreeSet::new();
    let mut g_score = BTreeMap::new();
    let mut came_from = BTreeMap::new();
    let h = heuristic(start, goal);
    open_set.insert(OpenNode { f: h, h, y: start.y, x: start.x });
    g_score.insert(start, 0_u32);
    while let Some(curr) = open_set.pop_first() {
        let p = Pos { y: curr.y, x: curr.x };
        let Some(&cur_g) = g_score.get(&p) else {
            continue;
        };
        if p == goal {
            let steps = reconstruct_path(&came_from, start, goal)?;
            return Some(PathResult { steps, cost: cur_g });
        }
        if curr.f > cur_g + curr.h {
            // Stale entry superseded by a cheaper route.
            continue;
        }
        for n in p.neighbors8() {
            if !map.in_bounds(n) {
                continue;
            }
            if n != goal && !options.ignore_walls && !map.is_walkable(n) {
                continue;
            }
            let mut tg = cur_g + step_cost(p, n);
            if n != goal && crowded.contains(&n) {
                tg += options.crowd_penalty;
            }
            if tg < g_score.get(&n).copied().unwrap_or(u32::MAX) {
                came_from.insert(n, p);
                g_score.insert(n, tg);
                let h = heuristic(n, goal);
                open_set.insert(OpenNode { f: tg + h, h, y: n.y, x: n.x });
            }
        }
    }
    None
}

fn reconstruct_path(came: &BTreeMap<Pos, Pos>, start: Pos, goal: Pos) -> Option<Vec<Pos>> {
    let mut p = goal;
    let mut result = vec![p];
    while p != start {
        p = *came.get(&p)?;
        result.push(p);
    }
    result.reverse();
    result.remove(0);
    Some(result)
}

/// Cells an actor could stand on after at most `steps` moves, never passing through
/// blocked cells.
pub(super) fn reachable_within(
    map: &Map,
    blocked: &BTreeSet<Pos>,
    start: Pos,
    steps: u32,
) -> BTreeSet<Pos> {
    let mut reached = BTreeSet::from([start]);
    let mut frontier = vec![start];
    for _ in 0..steps {
        let mut next = Vec::new();
        for pos in frontier {
            for n in pos.neighbors8() {
                if map.is_walkable(n) && !blocked.contains(&n) && reached.insert(n) {
                    next.push(n);
                }
            }
        }
        frontier = next;
    }
    reached
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn diagonal_moves_are_dearer_than_cardinal_ones() {
        let (map, origin) = open_room_fixture();
        let straight = find_path(&map, &BTreeSet::new(), origin, Pos { y: 5, x: 8 }, PathOptions::default())
            .expect("open room path");
        assert_eq!(straight.steps.len(), 3);
        assert_eq!(straight.cost, 3 * CARDINAL_COST);

        let diagonal = find_path(&map, &BTreeSet::new(), origin, Pos { y: 7, x: 7 }, PathOptions::default())
            .expect("open room path");
        assert_eq!(diagonal.steps.len(), 2);
        assert_eq!(diagonal.cost, 2 * DIAGONAL_COST);
    }

    #[test]
    fn path_bends_around_walls_and_fails_when_sealed() {
        let (mut map, origin) = wall_occlusion_fixture();
        let goal = Pos { y: 5, x: 8 };
        assert!(find_path(&map, &BTreeSet::new(), origin, goal, PathOptions::default()).is_none());

        map.set_tile(Pos { y: 5, x: 6 }, TileKind::Floor);
        let path = find_path(&map, &BTreeSet::new(), origin, goal, PathOptions::default())
            .expect("corridor reopened");
        assert_eq!(path.steps.last(), Some(&goal));
    }

    #[test]
    fn ignoring_walls_gives_straight_line_reach() {
        let (map, origin) = wall_occlusion_fixture();
        let options = PathOptions { ignore_walls: true, ..PathOptions::default() };
        let path = find_path(&map, &BTreeSet::new(), origin, Pos { y: 5, x: 8 }, options)
            .expect("walls ignored");
        assert_eq!(path.steps.len(), 5);
    }

    #[test]
    fn goal_cell_is_enterable_even_when_not_walkable() {
        let (mut map, origin) = open_room_fixture();
        let gate = Pos { y: 5, x: 7 };
        map.set_tile(gate, TileKind::VaultGate);
        let path = find_path(&map, &BTreeSet::new(), origin, gate, PathOptions::default())
            .expect("goal is always enterable");
        assert_eq!(path.steps, vec![Pos { y: 5, x: 6 }, gate]);
    }

    #[test]
    fn crowd_penalty_routes_around_a_blocker() {
        let (map, origin) = open_room_fixture();
        let goal = Pos { y: 5, x: 7 };
        let crowded = BTreeSet::from([Pos { y: 5, x: 6 }]);
        let options = PathOptions { crowd_penalty: 12, ..PathOptions::default() };
        let path = find_path(&map, &crowded, origin, goal, options).expect("detour exists");
        assert!(!path.steps.contains(&Pos { y: 5, x: 6 }));
        assert_eq!(path.cost, 2 * DIAGONAL_COST);
    }

    #[test]
    fn reachable_area_stops_at_blockers_and_walls() {
        let (map, origin) = wall_occlusion_fixture();
        let blocked = BTreeSet::from([Pos { y: 5, x: 2 }]);
        let area = reachable_within(&map, &blocked, origin, 3);
        assert!(area.contains(&Pos { y: 5, x: 5 }));
        assert!(!area.contains(&Pos { y: 5, x: 6 }));
        assert!(!area.contains(&Pos { y: 5, x: 1 }), "blocked cell seals the west arm");
    }
}
