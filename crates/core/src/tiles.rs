//! Static terrain definitions. A map stores `TileKind` per cell; everything the
//! simulation asks about a cell (can enemies enter, can the body slide over it, does it
//! block sight) comes from the kind's `TileDef`.

use serde::{Deserialize, Serialize};

/// Bit flags for maze corridor links.
pub const LINK_NORTH: u8 = 1;
pub const LINK_EAST: u8 = 2;
pub const LINK_SOUTH: u8 = 4;
pub const LINK_WEST: u8 = 8;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Wall,
    Floor,
    VaultFloor,
    /// The single gap in a vault barrier. Only the player's body may pass.
    VaultGate,
    Door,
    DownStairs,
    Corridor { links: u8 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileDef {
    pub walkable: bool,
    pub snakeable: bool,
    pub transparent: bool,
    pub glyph: char,
    pub name: &'static str,
}

const WALL: TileDef =
    TileDef { walkable: false, snakeable: false, transparent: false, glyph: '#', name: "wall" };
const FLOOR: TileDef =
    TileDef { walkable: true, snakeable: true, transparent: true, glyph: '.', name: "floor" };
const VAULT_FLOOR: TileDef = TileDef {
    walkable: true,
    snakeable: true,
    transparent: true,
    glyph: ',',
    name: "vault floor",
};
const VAULT_GATE: TileDef = TileDef {
    walkable: false,
    snakeable: true,
    transparent: true,
    glyph: ':',
    name: "vault gate",
};
const DOOR: TileDef =
    TileDef { walkable: true, snakeable: true, transparent: true, glyph: '+', name: "doorway" };
const DOWN_STAIRS: TileDef =
    TileDef { walkable: true, snakeable: true, transparent: true, glyph: '>', name: "stairs" };

const CORRIDOR_GLYPHS: [char; 16] = [
    '·', '╵', '╶', '└', '╷', '│', '┌', '├', '╴', '┘', '─', '┴', '┐', '┤', '┬', '┼',
];

impl TileKind {
    pub fn def(self) -> TileDef {
        match self {
            TileKind::Wall => WALL,
            TileKind::Floor => FLOOR,
            TileKind::VaultFloor => VAULT_FLOOR,
            TileKind::VaultGate => VAULT_GATE,
            TileKind::Door => DOOR,
            TileKind::DownStairs => DOWN_STAIRS,
            TileKind::Corridor { links } => TileDef {
                walkable: true,
                snakeable: true,
                transparent: true,
                glyph: CORRIDOR_GLYPHS[usize::from(links & 0x0F)],
                name: "corridor",
            },
        }
    }

    pub fn is_walkable(self) -> bool {
        self.def().walkable
    }

    pub fn is_snakeable(self) -> bool {
        self.def().snakeable
    }

    pub fn is_transparent(self) -> bool {
        self.def().transparent
    }

    pub fn glyph(self) -> char {
        self.def().glyph
    }

    pub fn is_vault(self) -> bool {
        matches!(self, TileKind::VaultFloor | TileKind::VaultGate)
    }
}
