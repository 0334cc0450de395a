use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::content::{EnemyKind, EnemyTemplate};
use crate::identity::IdentityRegistry;
use crate::mapgen::RunRng;
use crate::tiles::TileKind;
use crate::types::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorKind {
    Player,
    Enemy(EnemyKind),
    Decoy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RenderOrder {
    Corpse,
    Item,
    Actor,
}

/// Per-actor decision mode. `None` on the actor means dead.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiMode {
    PlayerControlled,
    Hostile { awake: bool, last_target: Option<Pos> },
    Constricted { previous: Box<AiMode> },
    Confused { turns: u32, previous: Box<AiMode> },
    Statue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Attack { delta: Delta },
    Step { delta: Delta },
}

impl Intent {
    pub fn delta(self) -> Delta {
        match self {
            Intent::Attack { delta } | Intent::Step { delta } => delta,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub kind: StatusKind,
    pub duration: u32,
}

/// Melee wears down `current`; constriction wears down `base` and caps `current` to it.
/// Either counter dropping below zero is death.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub current: i32,
    pub base: i32,
}

impl Health {
    pub fn new(value: i32) -> Self {
        Self { current: value, base: value }
    }

    pub fn is_dead(self) -> bool {
        self.current < 0 || self.base < 0
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Actor {
    pub id: EntityId,
    pub kind: ActorKind,
    pub name: String,
    pub pos: Pos,
    pub blocks: bool,
    pub render_order: RenderOrder,
    pub move_speed: u32,
    pub ai: Option<AiMode>,
    /// Body segments, head-adjacent first.
    pub inventory: Vec<ItemId>,
    pub statuses: Vec<Status>,
    pub base_stats: Stats,
    pub is_boss: bool,
    pub drop_tier: u8,
    pub health: Health,
    pub intent: Vec<Intent>,
}

impl Actor {
    pub fn player(pos: Pos) -> Self {
        Self {
            id: EntityId::default(),
            kind: ActorKind::Player,
            name: "basilisk".to_string(),
            pos,
            blocks: true,
            render_order: RenderOrder::Actor,
            move_speed: 1,
            ai: Some(AiMode::PlayerControlled),
            inventory: Vec::new(),
            statuses: Vec::new(),
            base_stats: Stats::default(),
            is_boss: false,
            drop_tier: 0,
            health: Health::new(0),
            intent: Vec::new(),
        }
    }

    pub fn enemy(template: &EnemyTemplate, pos: Pos) -> Self {
        Self {
            id: EntityId::default(),
            kind: ActorKind::Enemy(template.kind),
            name: template.name.to_string(),
            pos,
            blocks: true,
            render_order: RenderOrder::Actor,
            move_speed: template.move_speed,
            ai: Some(AiMode::Hostile { awake: false, last_target: None }),
            inventory: Vec::new(),
            statuses: Vec::new(),
            base_stats: Stats::default(),
            is_boss: template.is_boss,
            drop_tier: template.drop_tier,
            health: Health::new(template.health),
            intent: Vec::new(),
        }
    }

    pub fn decoy(pos: Pos) -> Self {
        Self {
            id: EntityId::default(),
            kind: ActorKind::Decoy,
            name: "decoy".to_string(),
            pos,
            blocks: true,
            render_order: RenderOrder::Actor,
            move_speed: 0,
            ai: Some(AiMode::Statue),
            inventory: Vec::new(),
            statuses: Vec::new(),
            base_stats: Stats::default(),
            is_boss: false,
            drop_tier: 0,
            health: Health::new(0),
            intent: Vec::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.ai.is_some()
    }

    pub fn is_player(&self) -> bool {
        self.kind == ActorKind::Player
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self.kind, ActorKind::Enemy(_))
    }

    /// Enemies show their remaining health as digits.
    pub fn glyph(&self) -> String {
        match self.kind {
            ActorKind::Player if self.is_alive() => "@".to_string(),
            ActorKind::Player => "%".to_string(),
            ActorKind::Enemy(_) => self.health.current.max(0).to_string(),
            ActorKind::Decoy => "&".to_string(),
        }
    }

    pub fn status(&self, kind: StatusKind) -> Option<&Status> {
        self.statuses.iter().find(|status| status.kind == kind)
    }

    pub fn has_status(&self, kind: StatusKind) -> bool {
        self.status(kind).is_some()
    }

    pub fn is_petrified(&self) -> bool {
        self.has_status(StatusKind::Petrified)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemOwner {
    Floor,
    Body(EntityId),
}

/// Body segment lifecycle. Only `Solid` segments block movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentState {
    Solid,
    /// Just swallowed and still stacked under another part of the body.
    Settling,
    /// Cut loose; drops out of the chain on the next move.
    Detaching,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub letter: char,
    pub pos: Pos,
    pub owner: ItemOwner,
    pub segment: SegmentState,
}

impl Item {
    pub fn loose(letter: char, pos: Pos) -> Self {
        Self {
            id: ItemId::default(),
            letter,
            pos,
            owner: ItemOwner::Floor,
            segment: SegmentState::Solid,
        }
    }

    pub fn blocks(&self) -> bool {
        matches!(self.owner, ItemOwner::Body(_)) && self.segment == SegmentState::Solid
    }

    pub fn is_loose(&self) -> bool {
        self.owner == ItemOwner::Floor
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Map {
    pub internal_width: usize,
    pub internal_height: usize,
    pub tiles: Vec<TileKind>,
    pub visible: Vec<bool>,
    pub explored: Vec<bool>,
    /// Cells revealed by clairvoyance rather than sight.
    pub mapped: Vec<bool>,
}

impl Map {
    /// Open floor with a wall border.
    pub fn new(width: usize, height: usize) -> Self {
        let mut tiles = vec![TileKind::Floor; width * height];
        for x in 0..width {
            tiles[x] = TileKind::Wall;
            tiles[(height - 1) * width + x] = TileKind::Wall;
        }
        for y in 0..height {
            tiles[y * width] = TileKind::Wall;
            tiles[y * width + (width - 1)] = TileKind::Wall;
        }
        Self::from_tiles(width, height, tiles)
    }

    pub fn from_tiles(width: usize, height: usize, tiles: Vec<TileKind>) -> Self {
        Self {
            internal_width: width,
            internal_height: height,
            tiles,
            visible: vec![false; width * height],
            explored: vec![false; width * height],
            mapped: vec![false; width * height],
        }
    }

    pub fn tile_at(&self, pos: Pos) -> TileKind {
        if !self.in_bounds(pos) {
            return TileKind::Wall;
        }
        self.tiles[self.index(pos)]
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.internal_width
            && (pos.y as usize) < self.internal_height
    }

    /// Outermost ring; phasing never crosses it.
    pub fn is_boundary(&self, pos: Pos) -> bool {
        !self.in_bounds(pos)
            || pos.x == 0
            || pos.y == 0
            || pos.x as usize == self.internal_width - 1
            || pos.y as usize == self.internal_height - 1
    }

    pub fn set_tile(&mut self, pos: Pos, tile: TileKind) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        self.tiles[idx] = tile;
    }

    pub fn is_walkable(&self, pos: Pos) -> bool {
        self.tile_at(pos).is_walkable()
    }

    pub fn is_snakeable(&self, pos: Pos) -> bool {
        self.tile_at(pos).is_snakeable()
    }

    pub fn is_transparent(&self, pos: Pos) -> bool {
        self.tile_at(pos).is_transparent()
    }

    pub fn clear_visible(&mut self) {
        self.visible.fill(false);
    }

    pub fn set_visible(&mut self, pos: Pos, visible: bool) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        self.visible[idx] = visible;
        if visible {
            self.explored[idx] = true;
        }
    }

    pub fn is_visible(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && self.visible[self.index(pos)]
    }

    pub fn is_explored(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && self.explored[self.index(pos)]
    }

    pub fn set_mapped(&mut self, pos: Pos) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        self.mapped[idx] = true;
    }

    pub fn is_mapped(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && self.mapped[self.index(pos)]
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.internal_height).flat_map(move |y| {
            (0..self.internal_width).map(move |x| Pos { y: y as i32, x: x as i32 })
        })
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.internal_width + (pos.x as usize)
    }
}

/// Run-scoped data that survives floor changes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct World {
    pub seed: u64,
    pub floor: u8,
    pub difficulty: Difficulty,
    pub identities: IdentityRegistry,
    pub turn: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    pub world: World,
    pub map: Map,
    pub actors: SlotMap<EntityId, Actor>,
    pub items: SlotMap<ItemId, Item>,
    pub player_id: EntityId,
    pub stairs: Option<Pos>,
    pub word_mode: bool,
    /// Enemy intents were planned at the end of the last turn and are shown to the player.
    pub intents_planned: bool,
    pub outcome: Option<RunOutcome>,
    pub rng: RunRng,
}

impl GameState {
    pub fn player(&self) -> Option<&Actor> {
        self.actors.get(self.player_id)
    }

    pub fn player_pos(&self) -> Pos {
        self.player().map(|player| player.pos).unwrap_or_default()
    }

    /// Living, blocking actor standing on `pos`.
    pub fn actor_at(&self, pos: Pos) -> Option<EntityId> {
        self.actors
            .iter()
            .find(|(_, actor)| actor.pos == pos && actor.blocks && actor.is_alive())
            .map(|(id, _)| id)
    }

    pub fn solid_segment_at(&self, pos: Pos) -> Option<ItemId> {
        self.items.iter().find(|(_, item)| item.pos == pos && item.blocks()).map(|(id, _)| id)
    }

    pub fn is_blocked(&self, pos: Pos) -> bool {
        self.actor_at(pos).is_some() || self.solid_segment_at(pos).is_some()
    }

    pub fn loose_items_at(&self, pos: Pos) -> Vec<ItemId> {
        self.items
            .iter()
            .filter(|(_, item)| item.pos == pos && item.is_loose())
            .map(|(id, _)| id)
            .collect()
    }

    pub fn body(&self) -> &[ItemId] {
        self.player().map(|player| player.inventory.as_slice()).unwrap_or(&[])
    }

    /// Head plus every segment still attached to it.
    pub fn body_cells(&self) -> Vec<Pos> {
        let mut cells = vec![self.player_pos()];
        cells.extend(
            self.body()
                .iter()
                .filter_map(|id| self.items.get(*id))
                .filter(|item| item.segment != SegmentState::Detaching)
                .map(|item| item.pos),
        );
        cells
    }

    /// Enemies and decoys in stable id order.
    pub fn non_player_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self
            .actors
            .iter()
            .filter(|(_, actor)| !actor.is_player() && actor.is_alive())
            .map(|(id, _)| id)
            .collect();
        ids.sort();
        ids
    }
}
