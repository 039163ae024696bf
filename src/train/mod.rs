pub mod adam;
pub mod early_stop;

use crate::config::TrainConfig;
use crate::eval::{checkpoint, ValueNet};
use crate::samples::LabeledSample;
use adam::Adam;
use anyhow::{bail, Context, Result};
use early_stop::EarlyStopping;
use log::info;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Serialize)]
pub struct TrainReport {
    pub train_losses: Vec<f32>,
    pub val_losses: Vec<f32>,
    pub best_val_loss: f32,
    pub epochs_run: usize,
    pub stopped_early: bool,
    pub train_samples: usize,
    pub val_samples: usize,
}

/// Fits a value network with MSE + Adam, keeps the best epoch on disk and
/// reloads it when done.
pub struct Trainer {
    config: TrainConfig,
    checkpoint: PathBuf,
}

impl Trainer {
    pub fn new<P: AsRef<Path>>(config: TrainConfig, checkpoint: P) -> Self {
        Self { config, checkpoint: checkpoint.as_ref().to_path_buf() }
    }

    pub fn config(&self) -> &TrainConfig { &self.config }

    pub fn checkpoint(&self) -> &Path { &self.checkpoint }

    pub fn fit(&self, net: &mut ValueNet, samples: &[LabeledSample]) -> Result<TrainReport> {
        if samples.len() < 2 { bail!("need at least 2 samples to train, got {}", samples.len()); }
        let (train, val) = split_samples(samples, self.config.test_fraction, self.config.split_seed);
        let mut adam = Adam::new(net, self.config.lr);
        let mut early = EarlyStopping::new(&self.checkpoint, self.config.patience, self.config.delta);
        let mut report = TrainReport { train_samples: train.len(), val_samples: val.len(), ..Default::default() };
        for epoch in 0..self.config.epochs {
            let train_loss = train_epoch(net, &mut adam, &train, self.config.batch_size);
            let val_loss = mse(net, &val);
            info!("epoch {epoch}: train loss {train_loss:.6}, validation loss {val_loss:.6}");
            report.train_losses.push(train_loss);
            report.val_losses.push(val_loss);
            report.epochs_run = epoch + 1;
            early.step(val_loss, net)?;
            if early.early_stop {
                info!("early stop after {} epochs", epoch + 1);
                report.stopped_early = true;
                break;
            }
        }
        report.best_val_loss = early.val_loss_min;
        *net = checkpoint::load(&self.checkpoint)
            .with_context(|| format!("reload best checkpoint {}", self.checkpoint.display()))?;
        Ok(report)
    }
}

/// Shuffled split holding out `ceil(test_fraction * n)` samples for validation,
/// keeping at least one on each side.
pub fn split_samples(samples: &[LabeledSample], test_fraction: f32, seed: u64) -> (Vec<&LabeledSample>, Vec<&LabeledSample>) {
    let mut refs: Vec<&LabeledSample> = samples.iter().collect();
    let mut rng = SmallRng::seed_from_u64(seed);
    refs.shuffle(&mut rng);
    let n = refs.len();
    let n_val = ((test_fraction.clamp(0.0, 1.0) * n as f32).ceil() as usize).max(1).min(n.saturating_sub(1));
    let train = refs.split_off(n_val);
    (train, refs)
}

pub fn mse(net: &ValueNet, samples: &[&LabeledSample]) -> f32 {
    if samples.is_empty() { return 0.0; }
    let total: f32 = samples.iter().map(|s| {
        let d = net.forward(s.features.as_slice()) - s.target();
        d * d
    }).sum();
    total / samples.len() as f32
}

fn train_epoch(net: &mut ValueNet, adam: &mut Adam, train: &[&LabeledSample], batch_size: usize) -> f32 {
    if train.is_empty() { return 0.0; }
    let mut total = 0.0f32;
    for batch in train.chunks(batch_size.max(1)) {
        let mut grads = net.zero_grads();
        for s in batch {
            total += net.accumulate_gradients(s.features.as_slice(), s.target(), &mut grads);
        }
        adam.step(net, &grads, 1.0 / batch.len() as f32);
    }
    total / train.len() as f32
}
