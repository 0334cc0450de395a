//! Shared test fixtures for the `game` submodule test suites.
//! This module exists to avoid repeating map, actor, and body setup across many tests.
//! It does not own production gameplay logic.

use super::*;
use crate::content::{EnemyKind, ITEM_TEMPLATES, enemy_template};
use crate::dictionary::WordList;
use crate::identity::IdentityKind;

pub(super) const ARENA_SEED: u64 = 99;

pub(super) fn builtin_dictionary() -> Box<dyn Dictionary> {
    Box::new(WordList::builtin())
}

pub(super) fn open_room_fixture() -> (Map, Pos) {
    (Map::new(10, 10), Pos { y: 5, x: 5 })
}

pub(super) fn wall_occlusion_fixture() -> (Map, Pos) {
    let mut map = Map::new(11, 11);
    for y in 1..10 {
        for x in 1..10 {
            map.set_tile(Pos { y, x }, TileKind::Wall);
        }
    }
    for x in 1..10 {
        map.set_tile(Pos { y: 5, x }, TileKind::Floor);
    }
    map.set_tile(Pos { y: 5, x: 6 }, TileKind::Wall);
    (map, Pos { y: 5, x: 3 })
}

/// Bare walled room with the player in the middle and nothing else on the floor.
pub(super) fn arena_state(width: usize, height: usize, player_pos: Pos) -> GameState {
    let mut actors = SlotMap::with_key();
    let player_id = actors.insert(Actor::player(player_pos));
    actors[player_id].id = player_id;
    GameState {
        world: World {
            seed: ARENA_SEED,
            floor: STARTING_FLOOR_INDEX,
            difficulty: Difficulty::Normal,
            identities: generate_item_identities(ARENA_SEED),
            turn: 0,
        },
        map: Map::new(width, height),
        actors,
        items: SlotMap::with_key(),
        player_id,
        stairs: None,
        word_mode: false,
        intents_planned: false,
        outcome: None,
        rng: RunRng::new(ARENA_SEED),
    }
}

pub(super) fn arena_game() -> Game {
    Game::from_state(GameConfig::default(), arena_state(20, 15, Pos { y: 7, x: 10 }), builtin_dictionary())
}

pub(super) fn add_enemy(game: &mut Game, kind: EnemyKind, pos: Pos) -> EntityId {
    let id = game.state.actors.insert(Actor::enemy(enemy_template(kind), pos));
    game.state.actors[id].id = id;
    id
}

pub(super) fn wake(game: &mut Game, id: EntityId) {
    game.state.actors[id].ai = Some(AiMode::Hostile { awake: true, last_target: None });
}

pub(super) fn drop_item(game: &mut Game, letter: char, pos: Pos) -> ItemId {
    let id = game.state.items.insert(Item::loose(letter, pos));
    game.state.items[id].id = id;
    id
}

/// Lays solid segments in a straight line west of the head, head-adjacent first.
pub(super) fn give_body(game: &mut Game, letters: &[char]) -> Vec<ItemId> {
    let player_id = game.state.player_id;
    let head = game.state.player_pos();
    let mut ids = Vec::new();
    for (offset, letter) in letters.iter().enumerate() {
        let pos = Pos { y: head.y, x: head.x - 1 - offset as i32 };
        let mut item = Item::loose(*letter, pos);
        item.owner = ItemOwner::Body(player_id);
        let id = game.state.items.insert(item);
        game.state.items[id].id = id;
        ids.push(id);
    }
    game.state.actors[player_id].inventory = ids.clone();
    ids
}

pub(super) fn body_positions(game: &Game) -> Vec<Pos> {
    game.state.body().iter().map(|id| game.state.items[*id].pos).collect()
}

fn consonant_matching(game: &Game, accept: impl Fn(usize) -> bool) -> char {
    game.state
        .world
        .identities
        .letters()
        .find_map(|(letter, identity)| match identity.kind {
            IdentityKind::Consonant { template } if accept(template) => Some(letter),
            _ => None,
        })
        .expect("registry maps every template to a consonant")
}

pub(super) fn identified_consonant(game: &mut Game) -> char {
    let letter = consonant_matching(game, |_| true);
    game.state.world.identities.identify(letter).expect("letter is registered");
    letter
}

pub(super) fn consonant_affinity(game: &Game, letter: char) -> Stat {
    game.state
        .world
        .identities
        .template(letter)
        .expect("letter is registered")
        .expect("consonants have templates")
        .affinity
}

pub(super) fn letter_with_spit(game: &Game, wanted: fn(SpitEffect) -> bool) -> char {
    consonant_matching(game, |template| wanted(ITEM_TEMPLATES[template].spit))
}

pub(super) fn letter_with_edible(game: &Game, wanted: fn(EdibleEffect) -> bool) -> char {
    consonant_matching(game, |template| wanted(ITEM_TEMPLATES[template].edible))
}

pub(super) fn logged(game: &Game, wanted: fn(&LogEvent) -> bool) -> bool {
    game.log.iter().any(|entry| wanted(&entry.event))
}
