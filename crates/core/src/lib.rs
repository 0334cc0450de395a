pub mod config;
pub mod content;
pub mod dictionary;
pub mod error;
pub mod game;
pub mod identity;
pub mod journal;
pub mod mapgen;
pub mod replay;
pub mod state;
pub mod tiles;
pub mod types;

pub use config::{GameConfig, GenerationLimits};
pub use dictionary::{Dictionary, WordList};
pub use error::{ActionError, ActionResult, GameError};
pub use game::{Action, Game, LookInfo, Performed, Snapshot};
pub use journal::{InputJournal, InputPayload, InputRecord};
pub use replay::*;
pub use state::{Actor, GameState, Item, Map};
pub use tiles::TileKind;
pub use types::*;
