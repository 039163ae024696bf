use clap::Parser;
use valuenet::config::{load_json, SelfPlayConfig};
use valuenet::search::LeafEval;
use valuenet::selfplay::SelfPlayLoop;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "valuenet-selfplay", about = "Train a value network from randomized self-play")]
struct Args {
    /// JSON config; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    depth: Option<u32>,
    #[arg(long)]
    search_probability: Option<f64>,
    #[arg(long, value_enum)]
    leaf_eval: Option<LeafEval>,
    #[arg(long)]
    max_plies: Option<usize>,
    #[arg(long)]
    batch_threshold: Option<usize>,
    /// Stop after this many training cycles
    #[arg(long)]
    cycles: Option<usize>,
    #[arg(long)]
    checkpoint: Option<PathBuf>,
    #[arg(long, default_value_t = false)]
    resume: bool,
    #[arg(long)]
    samples_dir: Option<PathBuf>,
    #[arg(long)]
    start_fen: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let a = Args::parse();
    let mut cfg: SelfPlayConfig = match &a.config {
        Some(path) => load_json(path)?,
        None => SelfPlayConfig::default(),
    };
    if let Some(v) = a.seed { cfg.params.seed = v; }
    if let Some(v) = a.depth { cfg.params.search_depth = v; }
    if let Some(v) = a.search_probability { cfg.params.search_probability = v; }
    if let Some(v) = a.leaf_eval { cfg.params.leaf_eval = v; }
    if a.max_plies.is_some() { cfg.params.max_plies = a.max_plies; }
    if let Some(v) = a.batch_threshold { cfg.batch_threshold = v; }
    if a.cycles.is_some() { cfg.max_cycles = a.cycles; }
    if let Some(v) = a.checkpoint { cfg.checkpoint = v; }
    if a.resume { cfg.resume = true; }
    if a.samples_dir.is_some() { cfg.samples_dir = a.samples_dir; }
    if a.start_fen.is_some() { cfg.start_fen = a.start_fen; }

    eprintln!("Self-play (depth={}, p_search={:.3}, leaf={:?}, threshold={}) -> {}",
        cfg.params.search_depth, cfg.params.search_probability, cfg.params.leaf_eval, cfg.batch_threshold, cfg.checkpoint.display());
    let mut sp = SelfPlayLoop::new(cfg)?;
    let stats = sp.run()?;
    eprintln!("Done: {} games ({} decisive, {} drawn, {} abandoned), {} samples, {} cycles",
        stats.games, stats.decisive, stats.drawn, stats.abandoned, stats.samples, stats.cycles);
    Ok(())
}
