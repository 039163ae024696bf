use clap::Parser;
use valuenet::config::{load_json, TrainConfig};
use valuenet::eval::{checkpoint, ValueNet, PGN_WIDTHS};
use valuenet::samples::read_shards_dir;
use valuenet::train::Trainer;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "valuenet-train", about = "Train a value network on sample shards")]
struct Args {
    /// Directory of sample shards
    #[arg(long)]
    data: PathBuf,
    #[arg(long, default_value = "out/pgn_model.ckpt")]
    checkpoint: PathBuf,
    /// Continue from an existing checkpoint instead of a fresh network
    #[arg(long)]
    init: Option<PathBuf>,
    /// JSON training config; defaults to the PGN preset
    #[arg(long)]
    config: Option<PathBuf>,
    /// Hidden and output widths, comma separated (input width is fixed)
    #[arg(long, value_delimiter = ',')]
    widths: Option<Vec<usize>>,
    #[arg(long)]
    epochs: Option<usize>,
    #[arg(long)]
    lr: Option<f32>,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Write the training report as JSON
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let a = Args::parse();
    let mut cfg: TrainConfig = match &a.config {
        Some(path) => load_json(path)?,
        None => TrainConfig::pgn(),
    };
    if let Some(v) = a.epochs { cfg.epochs = v; }
    if let Some(v) = a.lr { cfg.lr = v; }

    let samples = read_shards_dir(&a.data)?;
    let mut net = match (&a.init, &a.widths) {
        (Some(path), _) => checkpoint::load(path)?,
        (None, Some(hidden)) => {
            let mut widths = vec![PGN_WIDTHS[0]];
            widths.extend(hidden);
            ValueNet::new(&widths, a.seed)?
        }
        (None, None) => ValueNet::pgn(a.seed),
    };
    eprintln!("Training {:?} on {} samples (lr={}, epochs={})", net.widths(), samples.len(), cfg.lr, cfg.epochs);
    let report = Trainer::new(cfg, &a.checkpoint).fit(&mut net, &samples)?;
    eprintln!("Best validation loss {:.6} after {} epochs; checkpoint {}", report.best_val_loss, report.epochs_run, a.checkpoint.display());
    if let Some(path) = &a.report {
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
    }
    Ok(())
}
