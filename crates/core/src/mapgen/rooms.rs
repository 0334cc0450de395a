//! Organic room growth: every room starts as one cell outside a door in its parent's wall
//! and grows a row or column at a time until it reaches its target area or runs out of
//! space. Rooms keep a one-cell wall margin from each other and from the map edge.

use rand_chacha::ChaCha8Rng;
use tracing::trace;

use crate::config::GenerationLimits;
use crate::tiles::TileKind;
use crate::types::{Delta, Pos};

use super::grid::{index, in_bounds, manhattan, set_tile};
use super::progression::RoomProfile;
use super::seed::{chance, pick, roll};
use super::vaults::{VaultPlan, carve_vault, is_vault_candidate, plan_vault};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct RoomRect {
    pub(super) x: i32,
    pub(super) y: i32,
    pub(super) width: i32,
    pub(super) height: i32,
}

impl RoomRect {
    fn seed(pos: Pos) -> Self {
        Self { x: pos.x, y: pos.y, width: 1, height: 1 }
    }

    pub(super) fn right(self) -> i32 {
        self.x + self.width - 1
    }

    pub(super) fn bottom(self) -> i32 {
        self.y + self.height - 1
    }

    pub(super) fn area(self) -> usize {
        (self.width * self.height) as usize
    }

    pub(super) fn center(self) -> Pos {
        Pos { y: self.y + self.height / 2, x: self.x + self.width / 2 }
    }

    pub(super) fn contains(self, pos: Pos) -> bool {
        pos.x >= self.x && pos.x <= self.right() && pos.y >= self.y && pos.y <= self.bottom()
    }

    pub(super) fn cells(self) -> impl Iterator<Item = Pos> {
        (self.y..=self.bottom()).flat_map(move |y| (self.x..=self.right()).map(move |x| Pos { y, x }))
    }

    /// Cells a one-step extension toward `side` would add.
    fn strip(self, side: Side) -> Vec<Pos> {
        match side {
            Side::North => (self.x..=self.right()).map(|x| Pos { y: self.y - 1, x }).collect(),
            Side::South => (self.x..=self.right()).map(|x| Pos { y: self.bottom() + 1, x }).collect(),
            Side::West => (self.y..=self.bottom()).map(|y| Pos { y, x: self.x - 1 }).collect(),
            Side::East => (self.y..=self.bottom()).map(|y| Pos { y, x: self.right() + 1 }).collect(),
        }
    }

    fn extended(self, side: Side) -> Self {
        match side {
            Side::North => Self { y: self.y - 1, height: self.height + 1, ..self },
            Side::South => Self { height: self.height + 1, ..self },
            Side::West => Self { x: self.x - 1, width: self.width + 1, ..self },
            Side::East => Self { width: self.width + 1, ..self },
        }
    }

    /// Extent measured away from a door on `side`.
    pub(super) fn depth_from(self, side: Side) -> i32 {
        match side {
            Side::North | Side::South => self.height,
            Side::East | Side::West => self.width,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Side {
    North,
    East,
    South,
    West,
}

impl Side {
    const ALL: [Side; 4] = [Side::North, Side::East, Side::South, Side::West];

    pub(super) fn outward(self) -> Delta {
        match self {
            Side::North => Delta::NORTH,
            Side::East => Delta::EAST,
            Side::South => Delta::SOUTH,
            Side::West => Delta::WEST,
        }
    }

    fn opposite(self) -> Side {
        match self {
            Side::North => Side::South,
            Side::East => Side::West,
            Side::South => Side::North,
            Side::West => Side::East,
        }
    }
}

/// A door cell in the wall on `side` of the room that owns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct Door {
    pub(super) pos: Pos,
    pub(super) side: Side,
}

impl Door {
    /// A door on a wall corner would leave diagonal-only access.
    pub(super) fn is_inside_extent(self, rect: RoomRect) -> bool {
        match self.side {
            Side::North | Side::South => rect.x < self.pos.x && self.pos.x < rect.right(),
            Side::East | Side::West => rect.y < self.pos.y && self.pos.y < rect.bottom(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct PlacedRoom {
    pub(super) rect: RoomRect,
    pub(super) door: Option<Door>,
    pub(super) vault: Option<VaultPlan>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct RoomLayout {
    pub(super) rooms: Vec<PlacedRoom>,
    pub(super) attempts: usize,
}

impl RoomLayout {
    pub(super) fn non_vault_indices(&self) -> Vec<usize> {
        self.rooms.iter().enumerate().filter(|(_, r)| r.vault.is_none()).map(|(i, _)| i).collect()
    }

    pub(super) fn foyer_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        self.rooms.iter().filter_map(|room| room.vault.as_ref()).flat_map(|v| v.foyer.iter().copied())
    }

    /// Non-vault room whose center is farthest from `from`; later rooms win ties.
    pub(super) fn farthest_room_center(&self, from: Pos) -> Option<Pos> {
        self.non_vault_indices()
            .into_iter()
            .map(|i| self.rooms[i].rect.center())
            .filter(|center| *center != from)
            .max_by_key(|center| manhattan(*center, from))
    }
}

struct Claims {
    width: usize,
    height: usize,
    claimed: Vec<bool>,
    vault: Vec<bool>,
    doors: Vec<Pos>,
}

impl Claims {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            claimed: vec![false; width * height],
            vault: vec![false; width * height],
            doors: Vec::new(),
        }
    }

    /// Doors move in eight directions, so none may touch a vault interior diagonally.
    fn door_touches_vault(&self, door: Pos) -> bool {
        door.neighbors8().into_iter().any(|near| {
            in_bounds(self.width, self.height, near) && self.vault[index(self.width, near)]
        })
    }

    fn foreign_door_near(&self, rect: RoomRect, own_door: Pos) -> bool {
        self.doors.iter().any(|&door| {
            door != own_door && door.neighbors8().into_iter().any(|near| rect.contains(near))
        })
    }

    /// Interior cells stay off the outer ring and never touch another room's interior.
    fn can_claim(&self, pos: Pos) -> bool {
        if pos.x < 1
            || pos.y < 1
            || pos.x as usize >= self.width - 1
            || pos.y as usize >= self.height - 1
        {
            return false;
        }
        for dy in -1..=1 {
            for dx in -1..=1 {
                let near = Pos { y: pos.y + dy, x: pos.x + dx };
                if in_bounds(self.width, self.height, near) && self.claimed[index(self.width, near)]
                {
                    return false;
                }
            }
        }
        true
    }

    fn claim(&mut self, rect: RoomRect, door: Option<Door>, is_vault: bool) {
        for cell in rect.cells() {
            self.claimed[index(self.width, cell)] = true;
            if is_vault {
                self.vault[index(self.width, cell)] = true;
            }
        }
        if let Some(door) = door {
            self.doors.push(door.pos);
        }
    }
}

pub(super) fn build_room_layout(
    rng: &mut ChaCha8Rng,
    width: usize,
    height: usize,
    profile: &RoomProfile,
    limits: &GenerationLimits,
) -> RoomLayout {
    let mut claims = Claims::new(width, height);
    let mut rooms: Vec<PlacedRoom> = Vec::new();
    let mut vault_count = 0;
    let mut attempts = 0;

    while attempts < limits.max_room_attempts && rooms.len() < profile.target_rooms {
        attempts += 1;
        let target_area = roll(rng, profile.min_area, profile.max_area);

        if rooms.is_empty() {
            let seed = Pos {
                y: roll(rng, height / 4, height * 3 / 4) as i32,
                x: roll(rng, width / 4, width * 3 / 4) as i32,
            };
            if !claims.can_claim(seed) {
                continue;
            }
            let rect = grow_room(rng, &claims, seed, None, target_area);
            if rect.width >= 5 && rect.height >= 5 {
                claims.claim(rect, None, false);
                rooms.push(PlacedRoom { rect, door: None, vault: None });
            }
            continue;
        }

        let parents: Vec<usize> =
            rooms.iter().enumerate().filter(|(_, r)| r.vault.is_none()).map(|(i, _)| i).collect();
        let parent_index = if profile.linear_chain {
            parents.last().copied()
        } else {
            pick(rng, &parents).copied()
        };
        let Some(parent_index) = parent_index else {
            break;
        };
        let parent = rooms[parent_index].rect;

        let Some(&wall_side) = pick(rng, &Side::ALL) else {
            continue;
        };
        let door_pos = door_on_wall(rng, parent, wall_side);
        let seed = door_pos.offset(wall_side.outward());
        if !claims.can_claim(seed) || claims.door_touches_vault(door_pos) {
            continue;
        }

        let door = Door { pos: door_pos, side: wall_side.opposite() };
        let rect = grow_room(rng, &claims, seed, Some(door.side), target_area);
        if rect.width < 5 || rect.height < 5 || !door.is_inside_extent(rect) {
            trace!(?rect, "discarding undersized or corner-door room");
            continue;
        }

        let vault = if vault_count < profile.vault_target
            && is_vault_candidate(rect, door)
            && !claims.foreign_door_near(rect, door.pos)
            && chance(rng, profile.vault_chance)
        {
            vault_count += 1;
            Some(plan_vault(rng, rect, door))
        } else {
            None
        };

        claims.claim(rect, Some(door), vault.is_some());
        rooms.push(PlacedRoom { rect, door: Some(door), vault });
    }

    RoomLayout { rooms, attempts }
}

/// Picks a wall cell on `side` of `rect`, never a corner or a corner-adjacent cell.
fn door_on_wall(rng: &mut ChaCha8Rng, rect: RoomRect, side: Side) -> Pos {
    match side {
        Side::North | Side::South => {
            let x = roll(rng, (rect.x + 1) as usize, (rect.right() - 1) as usize) as i32;
            let y = if side == Side::North { rect.y - 1 } else { rect.bottom() + 1 };
            Pos { y, x }
        }
        Side::East | Side::West => {
            let y = roll(rng, (rect.y + 1) as usize, (rect.bottom() - 1) as usize) as i32;
            let x = if side == Side::West { rect.x - 1 } else { rect.right() + 1 };
            Pos { y, x }
        }
    }
}

fn grow_room(
    rng: &mut ChaCha8Rng,
    claims: &Claims,
    seed: Pos,
    fixed_side: Option<Side>,
    target_area: usize,
) -> RoomRect {
    let mut rect = RoomRect::seed(seed);
    while rect.area() < target_area {
        let growable: Vec<Side> = Side::ALL
            .into_iter()
            .filter(|side| Some(*side) != fixed_side)
            .filter(|side| rect.strip(*side).into_iter().all(|cell| claims.can_claim(cell)))
            .collect();
        let Some(&side) = pick(rng, &growable) else {
            break;
        };
        rect = rect.extended(side);
    }
    rect
}

pub(super) fn carve_rooms(tiles: &mut [TileKind], width: usize, layout: &RoomLayout) {
    for room in &layout.rooms {
        for cell in room.rect.cells() {
            set_tile(tiles, width, cell, TileKind::Floor);
        }
        if let Some(door) = room.door {
            set_tile(tiles, width, door.pos, TileKind::Door);
        }
        if let Some(vault) = &room.vault {
            carve_vault(tiles, width, room.rect, vault);
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::mapgen::progression::{MAX_FLOORS, room_profile};
    use crate::mapgen::seed::floor_rng;

    #[test]
    fn door_inside_extent_rejects_corner_alignment() {
        let rect = RoomRect { x: 5, y: 5, width: 5, height: 5 };
        let corner = Door { pos: Pos { y: 10, x: 5 }, side: Side::South };
        let middle = Door { pos: Pos { y: 10, x: 7 }, side: Side::South };
        assert!(!corner.is_inside_extent(rect));
        assert!(middle.is_inside_extent(rect));
    }

    #[test]
    fn first_floor_chains_each_room_onto_the_previous_one() {
        let profile = room_profile(1);
        let mut rng = floor_rng(42, 1, 0);
        let layout = build_room_layout(&mut rng, 60, 40, &profile, &GenerationLimits::default());
        for pair in layout.rooms.windows(2) {
            let Some(door) = pair[1].door else {
                panic!("only the first room is doorless");
            };
            let behind = door.pos.offset(door.side.outward());
            assert!(
                pair[0].rect.contains(behind),
                "door {door:?} should open into the previous room {:?}",
                pair[0].rect
            );
        }
    }

    #[test]
    fn attempts_respect_the_limit() {
        let profile = RoomProfile { target_rooms: usize::MAX, ..room_profile(3) };
        let mut rng = floor_rng(7, 3, 0);
        let limits = GenerationLimits::for_testing();
        let layout = build_room_layout(&mut rng, 60, 40, &profile, &limits);
        assert_eq!(layout.attempts, limits.max_room_attempts);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]
        #[test]
        fn grown_rooms_are_valid_and_disjoint(seed in any::<u64>(), floor in 1_u8..=MAX_FLOORS) {
            let profile = room_profile(floor);
            let mut rng = floor_rng(seed, floor, 0);
            let layout = build_room_layout(&mut rng, 60, 40, &profile, &GenerationLimits::default());
            for (i, room) in layout.rooms.iter().enumerate() {
                prop_assert!(room.rect.width >= 5 && room.rect.height >= 5, "{:?}", room.rect);
                if let Some(door) = room.door {
                    prop_assert!(door.is_inside_extent(room.rect), "{door:?} {:?}", room.rect);
                }
                for other in &layout.rooms[i + 1..] {
                    for cell in room.rect.cells() {
                        prop_assert!(!other.rect.contains(cell));
                    }
                }
            }
        }
    }
}
