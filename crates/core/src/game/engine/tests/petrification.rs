use super::support::*;

fn petrify_player(game: &mut Game, turns: u32) {
    let player = game.state.player_id;
    game.apply_status(player, StatusKind::Petrified, turns);
}

#[test]
fn enemies_keep_acting_until_the_stone_wears_off() {
    let mut game = arena_game();
    let rat = add_enemy(&mut game, EnemyKind::Rat, Pos::new(7, 16));
    wake(&mut game, rat);
    petrify_player(&mut game, 3);

    let outcome = game.perform(&Action::Wait).expect("turns resolve");

    assert_eq!(outcome, TurnOutcome::Resolved { turn: 3 });
    assert_eq!(game.state.actors[rat].pos, Pos::new(7, 13));
    assert!(!game.state.player().expect("player exists").is_petrified());
    assert_eq!(game.rewind_depth(), 3);
    assert!(logged(&game, |event| matches!(
        event,
        LogEvent::StatusExpired { status: StatusKind::Petrified, .. }
    )));
}

#[test]
fn a_petrified_player_cannot_move() {
    let mut game = arena_game();
    petrify_player(&mut game, 2);
    let outcome = game.perform(&Action::Bump { delta: Delta::EAST }).expect("no invariant broke");
    assert!(matches!(outcome, TurnOutcome::Rejected { .. }));
    assert_eq!(game.turn(), 0);
}

#[test]
fn the_petrified_loop_is_capped() {
    let mut game = arena_game();
    petrify_player(&mut game, 500);
    game.perform(&Action::Wait).expect("turns resolve");
    assert_eq!(game.turn(), u64::from(MAX_PETRIFIED_CYCLES));
    assert!(game.state.player().expect("player exists").is_petrified());
}
