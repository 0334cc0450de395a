//! The player's letter-segment body: chain propagation, swallowing, breakage, and the
//! word the body spells.
//! This module exists to keep every rule about segment order and segment state together.
//! It does not own what a letter does when digested or spat.

use super::*;

/// Where a hit on the player's body landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum BodyHit {
    Head,
    Segment(ItemId),
}

impl Game {
    /// Pulls the chain along behind the head, starting at `from_index` with `vacated` as
    /// the first free cell. A detaching segment drops itself and everything behind it.
    pub(super) fn propagate_body(&mut self, from_index: usize, vacated: Pos) -> Result<(), GameError> {
        let player_id = self.state.player_id;
        let player = self.actor(player_id)?;
        if player.pos == vacated {
            return Ok(());
        }
        let body = player.inventory.clone();
        let mut vacated = vacated;

        for (index, id) in body.iter().enumerate().skip(from_index) {
            let item = self.item(*id)?;
            if item.segment == SegmentState::Detaching {
                self.drop_segments_from(index)?;
                break;
            }
            let target = vacated;
            if item.pos == target {
                break;
            }
            if self.blocked_outside_chain(target, &body) {
                trace!(?target, index, "body propagation halted by blocker");
                break;
            }
            vacated = item.pos;
            if let Some(item) = self.state.items.get_mut(*id) {
                item.pos = target;
            }
        }

        self.settle_uncovered_segments();
        Ok(())
    }

    /// A cell is blocked for the chain only by things that are not part of it.
    fn blocked_outside_chain(&self, pos: Pos, body: &[ItemId]) -> bool {
        if self.state.actor_at(pos).is_some_and(|id| id != self.state.player_id) {
            return true;
        }
        self.state.solid_segment_at(pos).is_some_and(|id| !body.contains(&id))
    }

    /// Settling segments that no longer share a cell with another part of the body
    /// harden into solid ones.
    fn settle_uncovered_segments(&mut self) {
        let head = self.state.player_pos();
        let body = self.state.body().to_vec();
        let cells: Vec<(ItemId, Pos, SegmentState)> = body
            .iter()
            .filter_map(|id| self.state.items.get(*id).map(|item| (*id, item.pos, item.segment)))
            .collect();

        for (id, pos, segment) in &cells {
            if *segment != SegmentState::Settling {
                continue;
            }
            let covered = *pos == head
                || cells.iter().any(|(other, other_pos, other_segment)| {
                    other != id && other_pos == pos && *other_segment != SegmentState::Detaching
                });
            if !covered && let Some(item) = self.state.items.get_mut(*id) {
                item.segment = SegmentState::Solid;
            }
        }
    }

    fn drop_segments_from(&mut self, index: usize) -> Result<(), GameError> {
        let player = self.actor_mut(self.state.player_id)?;
        if index >= player.inventory.len() {
            return Ok(());
        }
        let dropped = player.inventory.split_off(index);
        for id in &dropped {
            if let Some(item) = self.state.items.get_mut(*id) {
                item.owner = ItemOwner::Floor;
                item.segment = SegmentState::Solid;
            }
        }
        self.push_log(LogEvent::Detached { count: dropped.len() });
        Ok(())
    }

    /// Puts every segment behind `index` into the detaching state.
    fn detach_behind(&mut self, index: usize) {
        let body = self.state.body().to_vec();
        for id in body.iter().skip(index) {
            if let Some(item) = self.state.items.get_mut(*id) {
                item.segment = SegmentState::Detaching;
            }
        }
    }

    /// Swallows loose items from under the head, each landing head-adjacent.
    pub(super) fn swallow(&mut self, items: &[ItemId]) -> Result<(), GameError> {
        let player_id = self.state.player_id;
        let head = self.actor(player_id)?.pos;
        for id in items {
            let item = self.state.items.get_mut(*id).ok_or(GameError::MissingItem)?;
            item.owner = ItemOwner::Body(player_id);
            item.segment = SegmentState::Settling;
            item.pos = head;
            let letter = item.letter;
            self.actor_mut(player_id)?.inventory.insert(0, *id);
            self.push_log(LogEvent::PickedUp { letter });
        }
        Ok(())
    }

    /// Stacks the whole body under the head, e.g. after arriving on a new floor.
    pub(super) fn coil_body_at_head(&mut self) -> Result<(), GameError> {
        let player_id = self.state.player_id;
        let head = self.actor(player_id)?.pos;
        let body = self.actor(player_id)?.inventory.clone();
        let mut kept = Vec::with_capacity(body.len());
        for id in body {
            let Some(item) = self.state.items.get_mut(id) else {
                continue;
            };
            if item.segment == SegmentState::Detaching {
                self.state.items.remove(id);
                continue;
            }
            item.pos = head;
            item.segment = SegmentState::Settling;
            kept.push(id);
        }
        self.actor_mut(player_id)?.inventory = kept;
        Ok(())
    }

    /// Takes one segment out of the body and closes the gap behind it. The item stays in
    /// the arena as a loose letter for the caller to place or destroy.
    pub(super) fn take_segment(&mut self, id: ItemId) -> Result<Pos, GameError> {
        let player = self.actor_mut(self.state.player_id)?;
        let index =
            player.inventory.iter().position(|other| *other == id).ok_or(GameError::MissingItem)?;
        player.inventory.remove(index);
        let item = self.state.items.get_mut(id).ok_or(GameError::MissingItem)?;
        item.owner = ItemOwner::Floor;
        item.segment = SegmentState::Solid;
        let vacated = item.pos;
        self.propagate_body(index, vacated)?;
        Ok(vacated)
    }

    /// Resolves a hit on the body. Breaking a segment cuts everything behind it loose;
    /// a head hit costs the tail tip, or the run when nothing is left to lose.
    pub(super) fn wound_player(&mut self, attacker: EntityId, hit: BodyHit) -> Result<(), GameError> {
        let attacker_name = self.actor_name(attacker);
        let player_id = self.state.player_id;
        let victim = match hit {
            BodyHit::Segment(id) => Some(id),
            BodyHit::Head => {
                self.push_log(LogEvent::HeadBitten { attacker: attacker_name.clone() });
                self.attached_segments().last().copied()
            }
        };

        let Some(victim) = victim else {
            let player = self.actor_mut(player_id)?;
            player.ai = None;
            player.intent.clear();
            self.push_log(LogEvent::PlayerDied);
            return Ok(());
        };

        let player = self.actor_mut(player_id)?;
        let index =
            player.inventory.iter().position(|other| *other == victim).ok_or(GameError::MissingItem)?;
        player.inventory.remove(index);
        let item = self.state.items.remove(victim).ok_or(GameError::MissingItem)?;
        self.push_log(LogEvent::SegmentBroken { attacker: attacker_name, letter: item.letter });
        self.detach_behind(index);
        self.refresh_word_mode();
        Ok(())
    }

    /// Segments still joined to the head, head-adjacent first.
    pub(super) fn attached_segments(&self) -> Vec<ItemId> {
        self.state
            .body()
            .iter()
            .copied()
            .filter(|id| {
                self.state.items.get(*id).is_some_and(|item| item.segment != SegmentState::Detaching)
            })
            .collect()
    }

    pub(super) fn attached_letters(&self) -> Vec<char> {
        self.attached_segments()
            .iter()
            .filter_map(|id| self.state.items.get(*id).map(|item| item.letter))
            .collect()
    }

    /// The letters of the body read from the head backwards.
    pub fn word(&self) -> String {
        self.attached_letters().into_iter().collect()
    }

    pub(super) fn body_spells_word(&self) -> bool {
        let word = self.word();
        word.chars().count() >= 2 && self.dictionary.is_valid_word(&word)
    }

    /// Re-checks the body against the dictionary and logs transitions.
    pub(super) fn refresh_word_mode(&mut self) {
        let now = self.body_spells_word();
        if now == self.state.word_mode {
            return;
        }
        self.state.word_mode = now;
        if now {
            let word = self.word();
            debug!(%word, "word mode on");
            self.push_log(LogEvent::WordFormed { word });
        } else {
            debug!("word mode off");
            self.push_log(LogEvent::WordLost);
        }
    }

    /// Adds a vowel at the tail tip, stacked under the last segment.
    pub(super) fn grow_tail(&mut self, letter: char) -> Result<(), GameError> {
        let player_id = self.state.player_id;
        let tip = match self.attached_segments().last() {
            Some(id) => self.item(*id)?.pos,
            None => self.actor(player_id)?.pos,
        };
        let mut item = Item::loose(letter, tip);
        item.owner = ItemOwner::Body(player_id);
        item.segment = SegmentState::Settling;
        let id = self.state.items.insert(item);
        self.state.items[id].id = id;
        let body = self.state.body();
        let insert_at = body
            .iter()
            .position(|other| {
                self.state.items.get(*other).is_some_and(|i| i.segment == SegmentState::Detaching)
            })
            .unwrap_or(body.len());
        self.actor_mut(player_id)?.inventory.insert(insert_at, id);
        Ok(())
    }
}
