//! Leaving the floor by the down stairs.

use super::*;

impl Game {
    pub(super) fn validate_stairs(&self, actor: EntityId) -> ActionResult {
        let acting = self.actor(actor)?;
        if !acting.is_player() {
            return Err(ActionError::impossible("Only the basilisk can take the stairs."));
        }
        if self.state.stairs != Some(acting.pos) {
            return Err(ActionError::impossible("There are no stairs here."));
        }
        if self.state.world.difficulty == Difficulty::Normal && !self.state.word_mode {
            return Err(ActionError::impossible("The stairs only open for a body that spells a word."));
        }
        Ok(())
    }
}
