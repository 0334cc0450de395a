//! Input journal: the accepted player inputs of a run, in order.

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::game::Action;

pub const JOURNAL_FORMAT_VERSION: u16 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputJournal {
    pub format_version: u16,
    pub build_id: String,
    pub seed: u64,
    pub inputs: Vec<InputRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    pub seq: u64,
    pub payload: InputPayload,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputPayload {
    Action(Action),
    Rewind { turns: usize },
}

impl InputJournal {
    pub fn new(seed: u64) -> Self {
        Self {
            format_version: JOURNAL_FORMAT_VERSION,
            build_id: env!("CARGO_PKG_VERSION").to_string(),
            seed,
            inputs: Vec::new(),
        }
    }

    fn next_seq(&self) -> u64 {
        self.inputs.len() as u64
    }

    pub fn append_action(&mut self, action: Action) {
        let seq = self.next_seq();
        self.inputs.push(InputRecord { seq, payload: InputPayload::Action(action) });
    }

    pub fn append_rewind(&mut self, turns: usize) {
        let seq = self.next_seq();
        self.inputs.push(InputRecord { seq, payload: InputPayload::Rewind { turns } });
    }

    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, GameError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Delta;

    #[test]
    fn records_are_numbered_in_append_order() {
        let mut journal = InputJournal::new(3);
        journal.append_action(Action::Wait);
        journal.append_rewind(1);
        journal.append_action(Action::Bump { delta: Delta::EAST });
        let seqs: Vec<u64> = journal.inputs.iter().map(|record| record.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
        assert_eq!(journal.inputs[1].payload, InputPayload::Rewind { turns: 1 });
    }

    #[test]
    fn journal_survives_json() {
        let mut journal = InputJournal::new(11);
        journal.append_action(Action::Move { delta: Delta::NORTH, pickup_order: None });
        journal.append_action(Action::TakeStairs);
        let text = journal.to_json().expect("journal serializes");
        assert_eq!(InputJournal::from_json(&text).expect("journal parses"), journal);
    }
}
