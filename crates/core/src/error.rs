//! Error taxonomy for the simulation core.
//! `ActionError` is what an action's validation step returns; only the `Invariant` arm is
//! fatal. `GameError` covers broken invariants and persistence failures.

use thiserror::Error;

use crate::types::{ItemId, Pos};

#[derive(Debug, Error)]
pub enum GameError {
    #[error("no identity registered for letter '{0}'")]
    MissingIdentity(char),

    #[error("acting entity is not on the map")]
    MissingActor,

    #[error("item is not tracked by the current floor")]
    MissingItem,

    #[error("no snapshot old enough to rewind to")]
    NothingToRewind,

    #[error("snapshot serialization failed: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("floor {0} is outside the dungeon")]
    FloorOutOfRange(u8),
}

#[derive(Debug, Error)]
pub enum ActionError {
    /// Expected, user-facing refusal. Nothing was mutated.
    #[error("{0}")]
    Impossible(String),

    /// Several loose items share the landing cell; the caller must supply an order.
    #[error("pick up order needed at {pos:?}")]
    UnorderedPickup { pos: Pos, items: Vec<ItemId> },

    #[error(transparent)]
    Invariant(#[from] GameError),
}

impl ActionError {
    pub fn impossible(reason: impl Into<String>) -> Self {
        Self::Impossible(reason.into())
    }
}

pub type ActionResult<T = ()> = Result<T, ActionError>;
