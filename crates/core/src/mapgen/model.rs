//! Public data models for generated floors, enemy spawns, and item spawns.

use crate::content::{EnemyKind, enemy_template};
use crate::tiles::TileKind;
use crate::types::Pos;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnemySpawn {
    pub kind: EnemyKind,
    pub pos: Pos,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemSpawn {
    pub letter: char,
    pub pos: Pos,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedFloor {
    pub floor_index: u8,
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<TileKind>,
    pub start: Pos,
    /// `None` on the final floor.
    pub down_stairs: Option<Pos>,
    pub enemy_spawns: Vec<EnemySpawn>,
    pub item_spawns: Vec<ItemSpawn>,
}

impl GeneratedFloor {
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.push(self.floor_index);
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        for tile in &self.tiles {
            bytes.push(match tile {
                TileKind::Wall => 0,
                TileKind::Floor => 1,
                TileKind::VaultFloor => 2,
                TileKind::VaultGate => 3,
                TileKind::Door => 4,
                TileKind::DownStairs => 5,
                TileKind::Corridor { links } => 0x10 | links,
            });
        }
        bytes.extend(self.start.y.to_le_bytes());
        bytes.extend(self.start.x.to_le_bytes());
        if let Some(stairs) = self.down_stairs {
            bytes.extend(stairs.y.to_le_bytes());
            bytes.extend(stairs.x.to_le_bytes());
        }

        bytes.extend((self.enemy_spawns.len() as u32).to_le_bytes());
        for spawn in &self.enemy_spawns {
            bytes.push(spawn.kind as u8);
            bytes.extend(spawn.pos.y.to_le_bytes());
            bytes.extend(spawn.pos.x.to_le_bytes());
        }

        bytes.extend((self.item_spawns.len() as u32).to_le_bytes());
        for spawn in &self.item_spawns {
            bytes.push(spawn.letter as u8);
            bytes.extend(spawn.pos.y.to_le_bytes());
            bytes.extend(spawn.pos.x.to_le_bytes());
        }

        bytes
    }

    pub fn tile_at(&self, pos: Pos) -> TileKind {
        if pos.x < 0 || pos.y < 0 {
            return TileKind::Wall;
        }
        let x = pos.x as usize;
        let y = pos.y as usize;
        if x >= self.width || y >= self.height {
            return TileKind::Wall;
        }
        self.tiles[y * self.width + x]
    }

    /// One text row per map row, spawns drawn over terrain.
    pub fn render_text(&self) -> String {
        let mut text = String::with_capacity((self.width + 1) * self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Pos { y: y as i32, x: x as i32 };
                let glyph = if pos == self.start {
                    '@'
                } else if let Some(spawn) = self.enemy_spawns.iter().find(|s| s.pos == pos) {
                    enemy_template(spawn.kind)
                        .health
                        .to_string()
                        .chars()
                        .next()
                        .unwrap_or('?')
                } else if let Some(spawn) = self.item_spawns.iter().find(|s| s.pos == pos) {
                    spawn.letter
                } else {
                    self.tile_at(pos).glyph()
                };
                text.push(glyph);
            }
            text.push('\n');
        }
        text
    }
}
