use anyhow::{Context, Result};
use basilisk::{GameConfig, InputJournal, ReplayResult, WordList, replay_journal};
use clap::Parser;
use std::{fs, io};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the journal JSON file to replay
    #[arg(short, long)]
    journal: String,
    /// Optional run configuration JSON; defaults are used when absent
    #[arg(short, long)]
    config: Option<String>,
    /// Word list file, one word per line; the built-in list is used when absent
    #[arg(short, long)]
    words: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let journal_data = fs::read_to_string(&args.journal)
        .with_context(|| format!("Failed to read journal file: {}", args.journal))?;
    let journal =
        InputJournal::from_json(&journal_data).with_context(|| "Failed to parse journal JSON")?;

    let config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {path}"))?;
            GameConfig::from_json(&text).with_context(|| "Failed to parse config JSON")?
        }
        None => GameConfig::default(),
    };
    let words = match &args.words {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read word list: {path}"))?;
            WordList::from_text(&text)
        }
        None => WordList::builtin(),
    };

    info!(seed = journal.seed, inputs = journal.inputs.len(), "replaying journal");
    let result: ReplayResult = replay_journal(config, &journal, Box::new(words))
        .with_context(|| format!("Replay of seed {} failed", journal.seed))?;

    println!("Replay complete.");
    println!("Final Turn: {}", result.final_turn);
    println!("Outcome: {:?}", result.final_outcome);
    println!("Snapshot Hash: {:016x}", result.final_snapshot_hash);

    Ok(())
}
