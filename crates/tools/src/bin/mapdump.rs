use anyhow::{Context, Result};
use basilisk::{GameConfig, identity::generate_item_identities, mapgen::generate_floor};
use clap::Parser;

#[derive(Parser)]
#[command(author, version, about = "Print a generated floor as text", long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1)]
    floor: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = GameConfig::default();
    let identities = generate_item_identities(args.seed);
    let floor = generate_floor(args.seed, args.floor, &config, &identities)
        .with_context(|| format!("Floor {} of seed {} failed to generate", args.floor, args.seed))?;

    println!("{}", floor.render_text());
    println!(
        "start {:?}  stairs {:?}  enemies {}  items {}",
        floor.start,
        floor.down_stairs,
        floor.enemy_spawns.len(),
        floor.item_spawns.len()
    );
    Ok(())
}
