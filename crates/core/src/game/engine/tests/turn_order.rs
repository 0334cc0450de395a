use super::support::*;
use crate::game::pathfinding::{PathOptions, find_path};

fn wall_off_east(game: &mut Game) {
    for y in 1..14 {
        game.state.map.set_tile(Pos::new(y, 13), TileKind::Wall);
    }
    game.refresh_player_fov();
}

#[test]
fn sleeping_enemies_without_sight_stay_asleep_through_a_move() {
    let mut game = arena_game();
    wall_off_east(&mut game);
    let first = add_enemy(&mut game, EnemyKind::Rat, Pos::new(3, 15));
    let second = add_enemy(&mut game, EnemyKind::Newt, Pos::new(10, 16));

    let outcome = game.perform(&Action::Bump { delta: Delta::WEST }).expect("turn resolves");

    assert_eq!(outcome, TurnOutcome::Resolved { turn: 1 });
    assert_eq!(game.turn(), 1);
    assert_eq!(game.state.player_pos(), Pos::new(7, 9));
    for (id, pos) in [(first, Pos::new(3, 15)), (second, Pos::new(10, 16))] {
        let actor = &game.state.actors[id];
        assert_eq!(actor.pos, pos);
        assert!(actor.intent.is_empty());
        assert_eq!(actor.ai, Some(AiMode::Hostile { awake: false, last_target: None }));
    }
}

#[test]
fn rejected_action_is_logged_and_consumes_no_turn() {
    let mut game = arena_game();
    game.state.map.set_tile(Pos::new(7, 11), TileKind::Wall);
    let before = game.snapshot_hash();

    let outcome = game.perform(&Action::Bump { delta: Delta::EAST }).expect("no invariant broke");

    assert!(matches!(outcome, TurnOutcome::Rejected { .. }));
    assert_eq!(game.turn(), 0);
    assert_eq!(game.snapshot_hash(), before);
    assert!(logged(&game, |event| matches!(event, LogEvent::Impossible { .. })));
}

#[test]
fn several_loose_items_ask_for_an_order_first() {
    let mut game = arena_game();
    let dest = Pos::new(7, 11);
    let first = drop_item(&mut game, 'a', dest);
    let second = drop_item(&mut game, 'e', dest);

    let outcome = game.perform(&Action::Bump { delta: Delta::EAST }).expect("no invariant broke");
    let TurnOutcome::NeedsPickupOrder { pos, mut items } = outcome else {
        panic!("expected a pickup order request, got {outcome:?}");
    };
    items.sort();
    let mut expected = vec![first, second];
    expected.sort();
    assert_eq!(pos, dest);
    assert_eq!(items, expected);
    assert_eq!(game.turn(), 0);
    assert_eq!(game.state.player_pos(), Pos::new(7, 10));

    let order = vec![second, first];
    let outcome = game
        .perform(&Action::Move { delta: Delta::EAST, pickup_order: Some(order) })
        .expect("turn resolves");
    assert_eq!(outcome, TurnOutcome::Resolved { turn: 1 });
    assert_eq!(game.state.body(), &[first, second]);
}

#[test]
fn every_enemy_acts_once_per_turn() {
    let mut game = arena_game();
    let rat = add_enemy(&mut game, EnemyKind::Rat, Pos::new(7, 16));
    let newt = add_enemy(&mut game, EnemyKind::Newt, Pos::new(7, 4));
    wake(&mut game, rat);
    wake(&mut game, newt);

    game.perform(&Action::Wait).expect("turn resolves");
    assert_eq!(game.state.actors[rat].pos, Pos::new(7, 15));
    assert_eq!(game.state.actors[newt].pos, Pos::new(7, 5));
    assert_eq!(game.turn(), 1);
    assert_eq!(game.rewind_depth(), 1);
}

#[test]
fn crowded_corridor_costs_the_second_enemy_extra() {
    let mut state = arena_state(20, 15, Pos::new(7, 3));
    state.map = Map::from_tiles(20, 15, vec![TileKind::Wall; 20 * 15]);
    for x in 1..19 {
        state.map.set_tile(Pos::new(7, x), TileKind::Floor);
    }
    for x in 5..16 {
        state.map.set_tile(Pos::new(9, x), TileKind::Floor);
    }
    state.map.set_tile(Pos::new(8, 5), TileKind::Floor);
    state.map.set_tile(Pos::new(8, 15), TileKind::Floor);
    let mut game = Game::from_state(GameConfig::default(), state, builtin_dictionary());
    let goal = game.state.player_pos();
    let back = add_enemy(&mut game, EnemyKind::Rat, Pos::new(7, 14));
    let options = PathOptions { ignore_walls: false, crowd_penalty: game.config.crowd_penalty };

    let empty = find_path(&game.state.map, &game.crowded_cells(back), Pos::new(7, 14), goal, options)
        .expect("corridor is open");
    let front = add_enemy(&mut game, EnemyKind::Rat, Pos::new(7, 12));
    let crowded =
        find_path(&game.state.map, &game.crowded_cells(back), Pos::new(7, 14), goal, options)
            .expect("corridor is still passable");

    assert_eq!(empty.cost, 33);
    assert!(crowded.cost > empty.cost);
    assert_ne!(crowded.steps, empty.steps);
    assert!(!crowded.steps.contains(&game.state.actors[front].pos));
}

#[test]
fn easy_runs_take_the_stairs_without_a_word() {
    let mut game = Game::new(5, GameConfig::easy(), builtin_dictionary()).expect("run starts");
    let stairs = game.state.stairs.expect("first floor has stairs");
    let player = game.state.player_id;
    game.state.actors[player].pos = stairs;

    let outcome = game.perform(&Action::TakeStairs).expect("second floor generates");
    assert_eq!(outcome, TurnOutcome::Resolved { turn: 1 });
    assert_eq!(game.state.world.floor, 2);
}

#[test]
fn normal_runs_need_a_word_to_descend() {
    let mut game = arena_game();
    let head = game.state.player_pos();
    game.state.map.set_tile(head, TileKind::DownStairs);
    game.state.stairs = Some(head);

    let outcome = game.perform(&Action::TakeStairs).expect("no invariant broke");
    assert!(matches!(outcome, TurnOutcome::Rejected { .. }));

    give_body(&mut game, &['a', 't']);
    game.refresh_word_mode();
    assert!(game.is_word_mode());
    let outcome = game.perform(&Action::TakeStairs).expect("second floor generates");
    assert!(matches!(outcome, TurnOutcome::Resolved { .. }));
    assert_eq!(game.state.world.floor, 2);
}
