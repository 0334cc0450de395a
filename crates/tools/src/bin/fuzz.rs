use anyhow::{Result, bail};
use basilisk::{Action, Delta, Game, GameConfig, Pos, TurnOutcome, WordList, state::ItemOwner};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use std::collections::BTreeSet;
use std::io;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    inputs: u32,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn random_action(game: &Game, rng: &mut ChaCha8Rng) -> Action {
    let body = game.state().body().to_vec();
    match rng.next_u64() % 12 {
        0 => Action::Wait,
        1 if !body.is_empty() => Action::Digest { item: body[0] },
        2 if !body.is_empty() => {
            let head = game.state().player_pos();
            let delta = choose(rng, &Delta::ALL);
            let target = Pos::new(head.y + delta.dy * 2, head.x + delta.dx * 2);
            Action::Spit { item: body[0], target }
        }
        3 => Action::TakeStairs,
        _ => Action::Bump { delta: choose(rng, &Delta::ALL) },
    }
}

fn check_invariants(game: &Game) -> Result<()> {
    let state = game.state();
    let mut occupied = BTreeSet::new();
    for actor in state.actors.values().filter(|actor| actor.is_alive() && actor.blocks) {
        if !occupied.insert(actor.pos) {
            bail!("Invariant failed: two blockers share {:?}", actor.pos);
        }
        if actor.is_enemy() && !state.map.is_walkable(actor.pos) {
            bail!("Invariant failed: {} inside {:?}", actor.name, state.map.tile_at(actor.pos));
        }
        if actor.health.current > actor.health.base.max(0) {
            bail!("Invariant failed: {} above base health", actor.name);
        }
    }
    for id in state.body() {
        match state.items.get(*id) {
            Some(item) if item.owner == ItemOwner::Body(state.player_id) => {}
            _ => bail!("Invariant failed: body lists an item the player does not own"),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    println!("Starting fuzz harness on seed {} for max {} inputs...", args.seed, args.inputs);
    let mut game = Game::new(args.seed, GameConfig::easy(), Box::new(WordList::builtin()))?;
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut rejected = 0u32;

    for _ in 0..args.inputs {
        let action = random_action(&game, &mut rng);
        let outcome = match game.perform(&action)? {
            TurnOutcome::NeedsPickupOrder { items, .. } => match action {
                // Take the pile in whatever order it was listed.
                Action::Bump { delta } => {
                    game.perform(&Action::Move { delta, pickup_order: Some(items) })?
                }
                other => bail!("pickup order requested for {other:?}"),
            },
            other => other,
        };
        check_invariants(&game)?;
        match outcome {
            TurnOutcome::Finished(outcome) => {
                println!("Finished with outcome {:?} on turn {}", outcome, game.turn());
                break;
            }
            TurnOutcome::Rejected { .. } => rejected += 1,
            _ => {}
        }
    }

    println!(
        "Fuzzing completed: floor {}, turn {}, {} rejected inputs, hash {:016x}",
        game.state().world.floor,
        game.turn(),
        rejected,
        game.snapshot_hash()
    );
    Ok(())
}
