//! Stable snapshot hashing for deterministic verification.
//! This module exists to keep hashing concerns separate from simulation control code.
//! It does not own replay execution or snapshot storage.

use std::hash::Hasher;

use slotmap::Key;
use xxhash_rust::xxh3::Xxh3;

use super::*;

fn write_pos(hasher: &mut Xxh3, pos: Pos) {
    hasher.write_i32(pos.y);
    hasher.write_i32(pos.x);
}

fn write_ai(hasher: &mut Xxh3, mode: Option<&AiMode>) {
    match mode {
        None => hasher.write_u8(0),
        Some(AiMode::PlayerControlled) => hasher.write_u8(1),
        Some(AiMode::Hostile { awake, last_target }) => {
            hasher.write_u8(2);
            hasher.write_u8(u8::from(*awake));
            match last_target {
                Some(pos) => {
                    hasher.write_u8(1);
                    write_pos(hasher, *pos);
                }
                None => hasher.write_u8(0),
            }
        }
        Some(AiMode::Constricted { previous }) => {
            hasher.write_u8(3);
            write_ai(hasher, Some(previous.as_ref()));
        }
        Some(AiMode::Confused { turns, previous }) => {
            hasher.write_u8(4);
            hasher.write_u32(*turns);
            write_ai(hasher, Some(previous.as_ref()));
        }
        Some(AiMode::Statue) => hasher.write_u8(5),
    }
}

fn status_code(kind: StatusKind) -> u8 {
    match kind {
        StatusKind::Phasing => 0,
        StatusKind::Petrified => 1,
        StatusKind::PhasedOut => 2,
        StatusKind::Boost(Stat::Bile) => 3,
        StatusKind::Boost(Stat::Mind) => 4,
        StatusKind::Boost(Stat::Tail) => 5,
        StatusKind::Boost(Stat::Tong) => 6,
        StatusKind::Ephemeral => 7,
    }
}

impl Game {
    /// Fingerprint of everything that can influence future turns.
    pub fn snapshot_hash(&self) -> u64 {
        let state = &self.state;
        let mut hasher = Xxh3::new();
        hasher.write_u64(state.world.seed);
        hasher.write_u64(state.world.turn);
        hasher.write_u8(state.world.floor);
        hasher.write_u8(match state.world.difficulty {
            Difficulty::Normal => 0,
            Difficulty::Easy => 1,
        });
        hasher.write_u8(u8::from(state.word_mode));
        hasher.write_u8(u8::from(state.intents_planned));
        hasher.write_u8(match state.outcome {
            None => 0,
            Some(RunOutcome::Victory) => 1,
            Some(RunOutcome::Defeat) => 2,
        });
        hasher.write_u64(state.rng.draws());
        if let Some(stairs) = state.stairs {
            write_pos(&mut hasher, stairs);
        }

        for tile in &state.map.tiles {
            hasher.write_u32(u32::from(tile.glyph()));
        }
        for (letter, identity) in state.world.identities.letters() {
            hasher.write_u32(u32::from(letter));
            hasher.write_u8(u8::from(identity.identified));
        }

        let mut actors: Vec<&Actor> = state.actors.values().collect();
        actors.sort_by_key(|actor| actor.id);
        for actor in actors {
            hasher.write_u64(actor.id.data().as_ffi());
            write_pos(&mut hasher, actor.pos);
            hasher.write_i32(actor.health.current);
            hasher.write_i32(actor.health.base);
            write_ai(&mut hasher, actor.ai.as_ref());
            hasher.write_usize(actor.statuses.len());
            for status in &actor.statuses {
                hasher.write_u8(status_code(status.kind));
                hasher.write_u32(status.duration);
            }
            for item in &actor.inventory {
                hasher.write_u64(item.data().as_ffi());
            }
            for stat in Stat::ALL {
                hasher.write_i32(actor.base_stats.get(stat));
            }
            for intent in &actor.intent {
                let delta = intent.delta();
                hasher.write_i32(delta.dy);
                hasher.write_i32(delta.dx);
            }
        }

        let mut items: Vec<&Item> = state.items.values().collect();
        items.sort_by_key(|item| item.id);
        for item in items {
            hasher.write_u64(item.id.data().as_ffi());
            hasher.write_u32(u32::from(item.letter));
            write_pos(&mut hasher, item.pos);
            hasher.write_u8(match item.segment {
                SegmentState::Solid => 0,
                SegmentState::Settling => 1,
                SegmentState::Detaching => 2,
            });
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::content::EnemyKind;

    #[test]
    fn hash_tracks_positions_and_segment_state() {
        let mut game = arena_game();
        let ids = give_body(&mut game, &['a', 'b']);
        let before = game.snapshot_hash();
        assert_eq!(before, game.snapshot_hash());

        game.state.items[ids[1]].segment = SegmentState::Detaching;
        let detaching = game.snapshot_hash();
        assert_ne!(before, detaching);

        let player = game.state.player_id;
        game.state.actors[player].pos = Pos::new(3, 3);
        assert_ne!(detaching, game.snapshot_hash());
    }

    #[test]
    fn hash_separates_status_kinds_and_ai_memory() {
        let mut game = arena_game();
        let player = game.state.player_id;
        let rat = add_enemy(&mut game, EnemyKind::Rat, Pos::new(3, 3));
        game.state.actors[player].statuses = vec![Status { kind: StatusKind::Phasing, duration: 3 }];
        let phasing = game.snapshot_hash();
        game.state.actors[player].statuses = vec![Status { kind: StatusKind::Petrified, duration: 3 }];
        let petrified = game.snapshot_hash();
        assert_ne!(phasing, petrified);

        game.state.actors[rat].ai =
            Some(AiMode::Hostile { awake: false, last_target: Some(Pos::new(1, 1)) });
        let remembering = game.snapshot_hash();
        assert_ne!(petrified, remembering);

        let hostile = AiMode::Hostile { awake: true, last_target: None };
        game.state.actors[rat].ai = Some(AiMode::Constricted { previous: Box::new(hostile) });
        let held_hostile = game.snapshot_hash();
        let confused = AiMode::Confused { turns: 2, previous: Box::new(AiMode::Statue) };
        game.state.actors[rat].ai = Some(AiMode::Constricted { previous: Box::new(confused) });
        assert_ne!(held_hostile, game.snapshot_hash());
    }

    #[test]
    fn hash_ignores_the_event_log() {
        let mut game = arena_game();
        let before = game.snapshot_hash();
        game.push_log(LogEvent::WordLost);
        assert_eq!(before, game.snapshot_hash());
    }
}
