use std::fmt;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct EntityId;
    pub struct ItemId;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const fn new(y: i32, x: i32) -> Self {
        Self { y, x }
    }

    pub fn offset(self, delta: Delta) -> Self {
        Self { y: self.y + delta.dy, x: self.x + delta.dx }
    }

    pub fn delta_to(self, other: Pos) -> Delta {
        Delta { dy: other.y - self.y, dx: other.x - self.x }
    }

    /// King-move distance; diagonal steps count as one.
    pub fn chebyshev(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    pub fn is_adjacent(self, other: Pos) -> bool {
        self != other && self.chebyshev(other) == 1
    }

    pub fn neighbors8(self) -> [Pos; 8] {
        Delta::ALL.map(|delta| self.offset(delta))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Delta {
    pub dy: i32,
    pub dx: i32,
}

impl Delta {
    pub const ZERO: Delta = Delta { dy: 0, dx: 0 };
    pub const NORTH: Delta = Delta { dy: -1, dx: 0 };
    pub const SOUTH: Delta = Delta { dy: 1, dx: 0 };
    pub const EAST: Delta = Delta { dy: 0, dx: 1 };
    pub const WEST: Delta = Delta { dy: 0, dx: -1 };

    pub const CARDINALS: [Delta; 4] = [Self::NORTH, Self::EAST, Self::SOUTH, Self::WEST];

    pub const ALL: [Delta; 8] = [
        Self::NORTH,
        Delta { dy: -1, dx: 1 },
        Self::EAST,
        Delta { dy: 1, dx: 1 },
        Self::SOUTH,
        Delta { dy: 1, dx: -1 },
        Self::WEST,
        Delta { dy: -1, dx: -1 },
    ];

    pub const fn new(dy: i32, dx: i32) -> Self {
        Self { dy, dx }
    }

    pub fn is_diagonal(self) -> bool {
        self.dx != 0 && self.dy != 0
    }

    /// True for the eight king moves (not the zero delta).
    pub fn is_step(self) -> bool {
        self != Self::ZERO && self.dx.abs() <= 1 && self.dy.abs() <= 1
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stat {
    Bile,
    Mind,
    Tail,
    Tong,
}

impl Stat {
    pub const ALL: [Stat; 4] = [Stat::Bile, Stat::Mind, Stat::Tail, Stat::Tong];

    pub fn label(self) -> &'static str {
        match self {
            Stat::Bile => "BILE",
            Stat::Mind => "MIND",
            Stat::Tail => "TAIL",
            Stat::Tong => "TONG",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stats {
    pub bile: i32,
    pub mind: i32,
    pub tail: i32,
    pub tong: i32,
}

impl Stats {
    pub fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Bile => self.bile,
            Stat::Mind => self.mind,
            Stat::Tail => self.tail,
            Stat::Tong => self.tong,
        }
    }

    pub fn add(&mut self, stat: Stat, amount: i32) {
        match stat {
            Stat::Bile => self.bile += amount,
            Stat::Mind => self.mind += amount,
            Stat::Tail => self.tail += amount,
            Stat::Tong => self.tong += amount,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    Phasing,
    Petrified,
    PhasedOut,
    Boost(Stat),
    /// Summoned actors dissipate when this runs out.
    Ephemeral,
}

impl StatusKind {
    pub fn is_beneficial(self) -> bool {
        matches!(self, StatusKind::Phasing | StatusKind::Boost(_))
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusKind::Phasing => write!(f, "phasing"),
            StatusKind::Petrified => write!(f, "petrified"),
            StatusKind::PhasedOut => write!(f, "phased out"),
            StatusKind::Boost(stat) => write!(f, "{} boost", stat.label()),
            StatusKind::Ephemeral => write!(f, "ephemeral"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Normal,
    Easy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunOutcome {
    Victory,
    Defeat,
}

/// What the turn driver reports back to the input layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    Resolved { turn: u64 },
    Rejected { reason: String },
    NeedsPickupOrder { pos: Pos, items: Vec<ItemId> },
    Finished(RunOutcome),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogEvent {
    Impossible { reason: String },
    Spotted { name: String },
    PlayerBit { target: String, damage: i32 },
    SegmentBroken { attacker: String, letter: char },
    HeadBitten { attacker: String },
    Killed { name: String },
    Constricted { name: String },
    Released { name: String },
    Squeezed { name: String, damage: i32 },
    StatusApplied { target: String, status: StatusKind, duration: u32 },
    StatusExpired { target: String, status: StatusKind },
    PickedUp { letter: char },
    Digested { letter: char, name: String },
    Spat { letter: char, name: String },
    Identified { letter: char, name: String },
    Detached { count: usize },
    WordFormed { word: String },
    WordLost,
    Phased,
    Descended { floor: u8 },
    PlayerDied,
    Victory,
    Rewound { turns: usize },
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogEvent::Impossible { reason } => write!(f, "{reason}"),
            LogEvent::Spotted { name } => write!(f, "The {name} spots you!"),
            LogEvent::PlayerBit { target, damage } => {
                write!(f, "You bite the {target} for {damage}.")
            }
            LogEvent::SegmentBroken { attacker, letter } => {
                write!(f, "The {attacker} snaps off your '{letter}'!")
            }
            LogEvent::HeadBitten { attacker } => write!(f, "The {attacker} bites your head!"),
            LogEvent::Killed { name } => write!(f, "The {name} dies."),
            LogEvent::Constricted { name } => write!(f, "You coil around the {name}."),
            LogEvent::Released { name } => write!(f, "The {name} wriggles free."),
            LogEvent::Squeezed { name, damage } => {
                write!(f, "You squeeze the {name} for {damage}.")
            }
            LogEvent::StatusApplied { target, status, duration } => {
                write!(f, "The {target} is {status} ({duration}).")
            }
            LogEvent::StatusExpired { target, status } => {
                write!(f, "The {target} is no longer {status}.")
            }
            LogEvent::PickedUp { letter } => write!(f, "You swallow the '{letter}'."),
            LogEvent::Digested { letter, name } => write!(f, "You digest the '{letter}' ({name})."),
            LogEvent::Spat { letter, name } => write!(f, "You spit the '{letter}' ({name})."),
            LogEvent::Identified { letter, name } => write!(f, "'{letter}' is {name}."),
            LogEvent::Detached { count } => write!(f, "{count} segment(s) fall away."),
            LogEvent::WordFormed { word } => write!(f, "Your body spells '{word}'!"),
            LogEvent::WordLost => write!(f, "Your body no longer spells a word."),
            LogEvent::Phased => write!(f, "You slide through the stone."),
            LogEvent::Descended { floor } => write!(f, "You descend to floor {floor}."),
            LogEvent::PlayerDied => write!(f, "You die..."),
            LogEvent::Victory => write!(f, "The dungeon falls silent. You win!"),
            LogEvent::Rewound { turns } => write!(f, "Time unwinds {turns} turn(s)."),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub turn: u64,
    pub event: LogEvent,
}
