use super::support::*;

fn spell_at(game: &mut Game) -> Vec<ItemId> {
    let ids = give_body(game, &['a', 't']);
    game.refresh_word_mode();
    assert!(game.is_word_mode());
    ids
}

#[test]
fn word_mode_shows_intents_and_enemies_follow_them() {
    let mut game = arena_game();
    spell_at(&mut game);
    let rat = add_enemy(&mut game, EnemyKind::Rat, Pos::new(7, 14));

    game.perform(&Action::Wait).expect("turn resolves");
    assert_eq!(game.state.actors[rat].pos, Pos::new(7, 13));
    assert_eq!(
        game.intents(),
        vec![(rat, Pos::new(7, 13), vec![Intent::Step { delta: Delta::WEST }])]
    );
    assert!(game.threat_overlay().is_empty());

    // The shown plan is what runs, even when it no longer matches a fresh decision.
    game.state.actors[rat].intent = vec![Intent::Step { delta: Delta::NORTH }];
    game.perform(&Action::Wait).expect("turn resolves");
    assert_eq!(game.state.actors[rat].pos, Pos::new(6, 13));
}

#[test]
fn losing_the_word_hides_intents_again() {
    let mut game = arena_game();
    let ids = spell_at(&mut game);
    let rat = add_enemy(&mut game, EnemyKind::Rat, Pos::new(7, 15));
    game.perform(&Action::Wait).expect("turn resolves");
    assert!(!game.intents().is_empty());

    game.perform(&Action::Digest { item: ids[0] }).expect("turn resolves");
    assert!(!game.is_word_mode());
    assert!(game.intents().is_empty());
    assert!(game.state.actors[rat].intent.is_empty());
    assert!(!game.state.intents_planned);
    assert!(logged(&game, |event| matches!(event, LogEvent::WordLost)));
    assert!(game.threat_overlay().contains(&Pos::new(7, 12)));
}
