use clap::Parser;
use valuenet::eval::checkpoint;
use valuenet::export::{export_weights, DEFAULT_PRECISION};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "valuenet-export", about = "Write a checkpoint as a plain-text weight file")]
struct Args {
    checkpoint: PathBuf,
    #[arg(long, default_value = "model_files/model.csv")]
    out: PathBuf,
    #[arg(long, default_value_t = DEFAULT_PRECISION)]
    precision: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let a = Args::parse();
    let net = checkpoint::load(&a.checkpoint)?;
    export_weights(&net, &a.out, a.precision)?;
    eprintln!("Exported {:?} ({} parameters) to {}", net.widths(), net.param_count(), a.out.display());
    Ok(())
}
