use super::support::*;
use crate::mapgen::MAX_FLOORS;

#[test]
fn digit_health_counts_down_then_the_corpse_drops_a_letter() {
    let mut game = arena_game();
    give_body(&mut game, &['a', 'e', 'i']);
    let beetle = add_enemy(&mut game, EnemyKind::Beetle, Pos::new(7, 11));
    assert_eq!(game.state.actors[beetle].glyph(), "3");

    let strike = Action::Melee { delta: Delta::EAST, damage: 2 };
    game.perform(&strike).expect("turn resolves");
    let survivor = &game.state.actors[beetle];
    assert_eq!(survivor.glyph(), "1");
    assert!(survivor.is_alive());
    assert!(logged(&game, |event| matches!(event, LogEvent::HeadBitten { .. })));
    assert_eq!(game.state.body().len(), 2);

    game.perform(&strike).expect("turn resolves");
    assert!(!game.state.actors.contains_key(beetle));
    assert_eq!(game.state.loose_items_at(Pos::new(7, 11)).len(), 1);
    assert!(logged(&game, |event| matches!(event, LogEvent::Killed { .. })));
    assert_eq!(game.turn(), 2);
}

#[test]
fn melee_on_empty_ground_is_refused() {
    let mut game = arena_game();
    let outcome = game
        .perform(&Action::Melee { delta: Delta::NORTH, damage: 1 })
        .expect("no invariant broke");
    assert!(matches!(outcome, TurnOutcome::Rejected { .. }));
    assert_eq!(game.turn(), 0);
}

#[test]
fn blows_without_damage_are_refused() {
    let mut game = arena_game();
    let beetle = add_enemy(&mut game, EnemyKind::Beetle, Pos::new(7, 11));
    for damage in [0, -6] {
        let outcome = game
            .perform(&Action::Melee { delta: Delta::EAST, damage })
            .expect("no invariant broke");
        assert!(matches!(outcome, TurnOutcome::Rejected { .. }));
    }
    assert_eq!(game.state.actors[beetle].glyph(), "3");
    assert_eq!(game.state.actors[beetle].health, Health::new(3));
    assert_eq!(game.turn(), 0);
}

#[test]
fn a_bitten_head_with_no_body_ends_the_run() {
    let mut game = arena_game();
    add_enemy(&mut game, EnemyKind::Rat, Pos::new(6, 10));

    let outcome = game.perform(&Action::Wait).expect("turn resolves");
    assert_eq!(outcome, TurnOutcome::Finished(RunOutcome::Defeat));
    assert!(logged(&game, |event| matches!(event, LogEvent::PlayerDied)));
    assert_eq!(
        game.perform(&Action::Wait).expect("finished runs stay finished"),
        TurnOutcome::Finished(RunOutcome::Defeat)
    );
    assert_eq!(game.turn(), 1);
}

#[test]
fn killing_the_final_boss_wins() {
    let mut game = arena_game();
    game.state.world.floor = MAX_FLOORS;
    let wyrm = add_enemy(&mut game, EnemyKind::Wyrm, Pos::new(7, 11));
    game.state.actors[wyrm].health = Health::new(0);

    let outcome = game.perform(&Action::Bump { delta: Delta::EAST }).expect("turn resolves");
    assert_eq!(outcome, TurnOutcome::Finished(RunOutcome::Victory));
    assert!(game.state.loose_items_at(Pos::new(7, 11)).is_empty());
    assert!(logged(&game, |event| matches!(event, LogEvent::Victory)));
}

#[test]
fn moving_beside_an_enemy_constricts_and_squeezes_it() {
    let mut game = arena_game();
    let id = add_enemy(&mut game, EnemyKind::Newt, Pos::new(5, 11));

    game.perform(&Action::Bump { delta: Delta::NORTH }).expect("turn resolves");
    let newt = &game.state.actors[id];
    assert!(matches!(newt.ai, Some(AiMode::Constricted { .. })));
    assert_eq!(newt.health, Health { current: 1, base: 1 });
    assert_eq!(newt.pos, Pos::new(5, 11));

    game.perform(&Action::Wait).expect("turn resolves");
    assert_eq!(game.state.actors[id].health, Health { current: 0, base: 0 });
    game.perform(&Action::Wait).expect("turn resolves");
    assert!(!game.state.actors.contains_key(id));
    assert!(game.state.player().expect("player exists").is_alive());
}
