//! Re-simulating a run from its seed and input journal.

use thiserror::Error;
use tracing::debug;

use crate::config::GameConfig;
use crate::dictionary::Dictionary;
use crate::error::GameError;
use crate::game::Game;
use crate::journal::{InputJournal, InputPayload};
use crate::types::{RunOutcome, TurnOutcome};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error(transparent)]
    Game(#[from] GameError),

    /// A journaled action no longer resolves; the journal and the build disagree.
    #[error("input {seq} was refused on replay: {reason}")]
    Diverged { seq: u64, reason: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayResult {
    pub final_turn: u64,
    pub final_outcome: Option<RunOutcome>,
    pub final_snapshot_hash: u64,
}

pub fn replay_journal(
    config: GameConfig,
    journal: &InputJournal,
    dictionary: Box<dyn Dictionary>,
) -> Result<ReplayResult, ReplayError> {
    let mut game = Game::new(journal.seed, config, dictionary)?;
    for record in &journal.inputs {
        match &record.payload {
            InputPayload::Action(action) => match game.perform(action)? {
                TurnOutcome::Resolved { .. } | TurnOutcome::Finished(_) => {}
                TurnOutcome::Rejected { reason } => {
                    return Err(ReplayError::Diverged { seq: record.seq, reason });
                }
                TurnOutcome::NeedsPickupOrder { .. } => {
                    return Err(ReplayError::Diverged {
                        seq: record.seq,
                        reason: "pickup order missing".to_string(),
                    });
                }
            },
            InputPayload::Rewind { turns } => game.rewind(*turns)?,
        }
    }
    debug!(inputs = journal.inputs.len(), turn = game.turn(), "replay finished");
    Ok(ReplayResult {
        final_turn: game.turn(),
        final_outcome: game.outcome(),
        final_snapshot_hash: game.snapshot_hash(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::WordList;
    use crate::game::Action;
    use crate::types::Delta;

    fn dictionary() -> Box<dyn Dictionary> {
        Box::new(WordList::builtin())
    }

    /// Plays a fixed input script live, journaling whatever the engine accepted.
    fn play(seed: u64, script: &[Action]) -> (Game, InputJournal) {
        let mut game = Game::new(seed, GameConfig::default(), dictionary()).expect("run starts");
        let mut journal = InputJournal::new(seed);
        for action in script {
            let outcome = game.perform(action).expect("no invariant broke");
            if matches!(outcome, TurnOutcome::Resolved { .. } | TurnOutcome::Finished(_)) {
                journal.append_action(action.clone());
            }
        }
        (game, journal)
    }

    fn wander() -> Vec<Action> {
        let mut script = Vec::new();
        for (i, delta) in Delta::ALL.iter().cycle().take(40).enumerate() {
            script.push(if i % 5 == 4 { Action::Wait } else { Action::Bump { delta: *delta } });
        }
        script
    }

    #[test]
    fn replay_reaches_the_same_hash_as_live_play() {
        let (game, journal) = play(2024, &wander());
        let result = replay_journal(GameConfig::default(), &journal, dictionary())
            .expect("journal replays");
        assert_eq!(result.final_turn, game.turn());
        assert_eq!(result.final_outcome, game.outcome());
        assert_eq!(result.final_snapshot_hash, game.snapshot_hash());
    }

    #[test]
    fn rewinds_replay_too() {
        let (mut game, mut journal) = play(31, &[Action::Wait, Action::Wait, Action::Wait]);
        game.rewind(2).expect("two turns recorded");
        journal.append_rewind(2);
        let result = replay_journal(GameConfig::default(), &journal, dictionary())
            .expect("journal replays");
        assert_eq!(result.final_turn, game.turn());
        assert_eq!(result.final_snapshot_hash, game.snapshot_hash());
    }

    #[test]
    fn a_refused_input_reports_divergence() {
        let mut journal = InputJournal::new(8);
        journal.append_action(Action::TakeStairs);
        let err = replay_journal(GameConfig::default(), &journal, dictionary())
            .expect_err("the start cell is not the stairs");
        assert!(matches!(err, ReplayError::Diverged { seq: 0, .. }));
    }
}
