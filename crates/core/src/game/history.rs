//! Full-state snapshots and time reversal.
//! This module exists to keep the bounded rewind history and the serialized snapshot
//! form in one place. It does not own file storage.

use serde::{Deserialize, Serialize};

use super::*;

/// The complete simulation state after a resolved turn.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub turn: u64,
    pub state: GameState,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, GameError> {
        Ok(serde_json::from_str(text)?)
    }
}

impl Game {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot { turn: self.state.world.turn, state: self.state.clone() }
    }

    /// Records the current state, dropping the oldest entry past the rewind window.
    pub(super) fn push_snapshot(&mut self) {
        self.history.push_back(self.snapshot());
        while self.history.len() > self.config.rewind_window + 1 {
            self.history.pop_front();
        }
    }

    /// How many turns `rewind` can currently go back.
    pub fn rewind_depth(&self) -> usize {
        self.history.len().saturating_sub(1)
    }

    /// Replaces the whole state with the one from `turns` resolved turns ago. Later
    /// snapshots are discarded; the event log is kept.
    pub fn rewind(&mut self, turns: usize) -> Result<(), GameError> {
        if turns == 0 || turns > self.rewind_depth() {
            return Err(GameError::NothingToRewind);
        }
        let keep = self.history.len() - turns;
        self.history.truncate(keep);
        let snapshot = self.history.back().ok_or(GameError::NothingToRewind)?;
        self.state = snapshot.state.clone();
        debug!(turns, turn = self.state.world.turn, "rewound");
        self.push_log(LogEvent::Rewound { turns });
        Ok(())
    }

    /// Swaps in an arbitrary snapshot and restarts the history from it.
    pub fn restore(&mut self, snapshot: Snapshot) {
        debug!(turn = snapshot.turn, floor = snapshot.state.world.floor, "snapshot restored");
        self.state = snapshot.state;
        self.history.clear();
        self.push_snapshot();
    }
}
