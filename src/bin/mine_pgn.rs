use clap::Parser;
use valuenet::config::load_json;
use valuenet::pgn::{balance_classes, mine_file, PgnFilter};
use valuenet::samples::write_shards;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "valuenet-mine-pgn", about = "Turn a PGN archive into labelled sample shards")]
struct Args {
    /// PGN file(s) to read, in order
    #[arg(required = true)]
    pgn: Vec<PathBuf>,
    #[arg(long, default_value = "out/pgn_shards")]
    out: PathBuf,
    /// JSON game/position filter
    #[arg(long)]
    filter: Option<PathBuf>,
    #[arg(long)]
    min_elo: Option<u32>,
    #[arg(long)]
    max_samples: Option<usize>,
    #[arg(long, default_value_t = false)]
    no_balance: bool,
    #[arg(long, default_value_t = 100_000)]
    max_records_per_shard: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let a = Args::parse();
    let mut filter: PgnFilter = match &a.filter {
        Some(path) => load_json(path)?,
        None => PgnFilter::default(),
    };
    if let Some(v) = a.min_elo { filter.min_elo = v; }

    let mut samples = Vec::new();
    for path in &a.pgn {
        let left = a.max_samples.map(|m| m.saturating_sub(samples.len()));
        if left == Some(0) { break; }
        let (mined, _) = mine_file(path, &filter, left)?;
        samples.extend(mined);
    }
    if !a.no_balance {
        let removed = balance_classes(&mut samples);
        eprintln!("Balanced classes: dropped {} samples", removed);
    }
    let shards = write_shards(&samples, &a.out, a.max_records_per_shard)?;
    eprintln!("Wrote {} samples to {} shards in {}", samples.len(), shards.len(), a.out.display());
    Ok(())
}
